//! Dashboard HTTP handler.
//!
//! Only the month and year of the filter apply to the dashboard. The type and
//! category selections narrow the transaction list, not the totals.

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::IntoResponse,
};
use serde::Serialize;

use crate::{
    AppState, Error,
    dashboard::{
        aggregation::AggregationResult,
        charts::{ChartSeries, DashboardChart, build_dashboard_charts, chart_series},
    },
    filter::{FilterQuery, resolve_filter},
    ledger::load_dashboard,
    request::{RequestTrackers, generation_headers},
    session::Session,
    transaction::SQLiteTransactionStore,
};

/// The state needed for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The store holding every user's transactions.
    pub store: SQLiteTransactionStore,
    /// Orders each user's dashboard requests.
    pub request_trackers: RequestTrackers,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.transaction_store.clone(),
            request_trackers: state.request_trackers.clone(),
        }
    }
}

/// The dashboard totals together with the chart data derived from them.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Totals, per-category breakdown and recent transactions.
    #[serde(flatten)]
    pub summary: AggregationResult,
    /// Chart-ready series.
    pub series: ChartSeries,
    /// ECharts options for each chart.
    pub charts: [DashboardChart; 2],
}

impl From<AggregationResult> for DashboardResponse {
    fn from(summary: AggregationResult) -> Self {
        let series = chart_series(&summary);
        let charts = build_dashboard_charts(&series);

        Self {
            summary,
            series,
            charts,
        }
    }
}

/// A route handler for the dashboard of the selected month or year.
///
/// Anonymous requests get the zero dashboard. Signed-in requests carry their
/// generation in the `x-request-generation` header so the client can drop
/// responses to superseded requests.
pub async fn get_dashboard_endpoint(
    State(state): State<DashboardState>,
    session: Option<Session>,
    Query(query): Query<FilterQuery>,
) -> Result<impl IntoResponse, Error> {
    let token = session
        .as_ref()
        .map(|session| state.request_trackers.issue(session));
    let filter = resolve_filter(query.month.as_deref(), query.year.as_deref(), None, None);

    let summary = load_dashboard(session.as_ref(), &state.store, &filter)
        .await
        .inspect_err(|error| tracing::error!("could not load the dashboard: {error}"))?;

    let superseded = token
        .as_ref()
        .is_some_and(|token| !state.request_trackers.is_current(token));
    if superseded {
        tracing::debug!("dashboard request was superseded by a newer one");
    }

    let response: DashboardResponse = summary.into();

    Ok((generation_headers(token.as_ref()), Json(response)))
}
