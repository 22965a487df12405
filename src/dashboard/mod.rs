//! Dashboard module
//!
//! Aggregates the selected month or year into totals, a per-category
//! breakdown and the most recent transactions, and turns the result into
//! chart data.

mod aggregation;
mod charts;
mod handlers;

pub use aggregation::{
    AggregationResult, CategoryBreakdown, CategoryTotals, RECENT_LIMIT, aggregate,
};
pub use charts::{
    CategoryPoint, ChartSeries, DashboardChart, FINANCIAL_LABELS, FinancialSeries,
    build_dashboard_charts, chart_series,
};
pub use handlers::{DashboardResponse, DashboardState, get_dashboard_endpoint};
