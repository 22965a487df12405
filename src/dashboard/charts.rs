//! Chart-ready series and ECharts configuration for the dashboard.
//!
//! Two charts are produced:
//! - **Financial chart**: a bar chart of total income against total expenses
//! - **Category chart**: a doughnut of expenses per category
//!
//! The category chart only shows expenses, even though income is also
//! tracked per category.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::{Bar, Pie},
};
use serde::Serialize;

use crate::dashboard::aggregation::AggregationResult;

/// The labels of the two points in [FinancialSeries].
pub const FINANCIAL_LABELS: [&str; 2] = ["income", "expense"];

/// Total income and total expenses as a two-point series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSeries {
    /// Always [FINANCIAL_LABELS].
    pub labels: [&'static str; 2],
    /// `[total_income, total_expense]`.
    pub values: [f64; 2],
}

/// The expense sub-total of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPoint {
    /// The category name.
    pub category: String,
    /// The sum of expenses in the category.
    pub expense: f64,
}

/// The data behind both dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Income against expenses.
    pub financial: FinancialSeries,
    /// Expenses per category, in the breakdown's first-seen order.
    pub category: Vec<CategoryPoint>,
}

/// Project an [AggregationResult] into chart series.
///
/// Income sub-totals per category are left out of the category series.
pub fn chart_series(result: &AggregationResult) -> ChartSeries {
    ChartSeries {
        financial: FinancialSeries {
            labels: FINANCIAL_LABELS,
            values: [result.total_income, result.total_expense],
        },
        category: result
            .by_category
            .iter()
            .map(|totals| CategoryPoint {
                category: totals.category.clone(),
                expense: totals.expense,
            })
            .collect(),
    }
}

/// A dashboard chart with its HTML container ID and ECharts configuration.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Build the ECharts configuration for both dashboard charts.
pub fn build_dashboard_charts(series: &ChartSeries) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "financial-chart",
            options: financial_chart(&series.financial).to_string(),
        },
        DashboardChart {
            id: "category-chart",
            options: category_chart(&series.category).to_string(),
        },
    ]
}

fn financial_chart(series: &FinancialSeries) -> Chart {
    let labels = vec!["Receitas".to_owned(), "Despesas".to_owned()];

    Chart::new()
        .title(Title::new().text("Receitas x Despesas"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter())
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Valor (R$)").data(series.values.to_vec()))
}

fn category_chart(points: &[CategoryPoint]) -> Chart {
    let data: Vec<(f64, &str)> = points
        .iter()
        .map(|point| (point.expense, point.category.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Despesas por categoria"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().left("center").top("bottom"))
        .series(
            Pie::new()
                .name("Despesas")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('pt-BR', {
              style: 'currency',
              currency: 'BRL'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

#[cfg(test)]
mod tests {
    use time::{OffsetDateTime, macros::date};

    use crate::{
        dashboard::{
            aggregation::aggregate,
            charts::{FINANCIAL_LABELS, build_dashboard_charts, chart_series},
        },
        transaction::{TransactionRecord, TransactionType},
    };

    fn create_test_transaction(
        transaction_type: TransactionType,
        category: &str,
        value: f64,
    ) -> TransactionRecord {
        TransactionRecord {
            id: 1,
            transaction_type,
            value,
            category: category.to_owned(),
            date: date!(2024 - 02 - 05),
            note: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn financial_series_is_income_then_expense() {
        let result = aggregate(&[
            create_test_transaction(TransactionType::Income, "Salário", 1000.0),
            create_test_transaction(TransactionType::Expense, "Lazer", 200.0),
        ]);

        let series = chart_series(&result);

        assert_eq!(series.financial.labels, FINANCIAL_LABELS);
        assert_eq!(series.financial.values, [1000.0, 200.0]);
    }

    #[test]
    fn category_series_only_contains_expenses() {
        let result = aggregate(&[
            create_test_transaction(TransactionType::Income, "Outros", 500.0),
            create_test_transaction(TransactionType::Expense, "Outros", 30.0),
            create_test_transaction(TransactionType::Income, "Salário", 1000.0),
        ]);

        let series = chart_series(&result);

        let points: Vec<(&str, f64)> = series
            .category
            .iter()
            .map(|point| (point.category.as_str(), point.expense))
            .collect();
        assert_eq!(points, vec![("Outros", 30.0), ("Salário", 0.0)]);
    }

    #[test]
    fn empty_result_gives_zero_series() {
        let series = chart_series(&aggregate(&[]));

        assert_eq!(series.financial.values, [0.0, 0.0]);
        assert!(series.category.is_empty());
    }

    #[test]
    fn chart_options_name_the_data() {
        let result = aggregate(&[create_test_transaction(
            TransactionType::Expense,
            "Moradia",
            900.0,
        )]);

        let [financial, category] = build_dashboard_charts(&chart_series(&result));

        assert_eq!(financial.id, "financial-chart");
        assert!(financial.options.contains("Receitas"));
        assert_eq!(category.id, "category-chart");
        assert!(category.options.contains("Moradia"));
    }
}
