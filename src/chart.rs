//! Chart generation and rendering for the dashboard.
//!
//! The dashboard shows one interactive ECharts visualization: a stacked bar
//! chart of expenses per day, one bar segment per category. The chart is
//! generated as JSON configuration for the ECharts library and rendered with
//! an HTML container and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus, JsFunction,
        Tooltip, Trigger,
    },
    series::bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    aggregation::{DaySummary, category_order},
    expense::Expense,
    html::HeadElement,
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub struct ExpenseChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

impl ExpenseChart {
    /// Build the daily expenses chart from the filtered expense list and its
    /// per-day buckets.
    pub fn new(expenses: &[Expense], days: &[DaySummary]) -> Self {
        Self {
            id: "expenses-chart",
            options: expenses_chart(expenses, days).to_string(),
        }
    }
}

/// Renders the HTML container for a dashboard chart.
pub fn chart_view(chart: &ExpenseChart) -> Markup {
    html!(
        section
            id="charts"
            class="chart-section"
        {
            div
                id=(chart.id)
                class="chart-container"
            {}
        }
    )
}

/// Generates JavaScript initialization code for a dashboard chart.
///
/// The script initializes the ECharts instance once the DOM is ready and
/// keeps it sized to its container on window resize.
pub fn chart_script(chart: &ExpenseChart) -> HeadElement {
    let script_content = format!(
        r#"(function() {{
            const chartDom = document.getElementById("{}");
            const chart = echarts.init(chartDom);
            const option = {};
            chart.setOption(option);

            window.addEventListener('resize', chart.resize);
        }})();"#,
        chart.id, chart.options
    );

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

fn expenses_chart(expenses: &[Expense], days: &[DaySummary]) -> Chart {
    let labels: Vec<String> = days.iter().map(|day| day.date.to_string()).collect();
    let categories = category_order(expenses);

    let mut chart = Chart::new()
        .title(Title::new().text("Daily Expenses").left(20).top("1%"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().left(200).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(60)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        );

    for category in categories {
        let data: Vec<f64> = days
            .iter()
            .map(|day| day.amount_for(&category).unwrap_or(0.0))
            .collect();

        chart = chart.series(
            bar::Bar::new()
                .name(category)
                .stack("Expenses")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(data),
        );
    }

    chart
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod chart_tests {
    use time::macros::date;

    use crate::{
        aggregation::aggregate,
        chart::{ExpenseChart, chart_script, chart_view},
        expense::Expense,
        html::HeadElement,
    };

    fn sample_expenses() -> Vec<Expense> {
        vec![
            Expense {
                id: 1,
                date: date!(2024 - 03 - 01),
                description: "Coffee".to_owned(),
                category: "Food".to_owned(),
                amount: 4.5,
            },
            Expense {
                id: 2,
                date: date!(2024 - 03 - 02),
                description: "Bus".to_owned(),
                category: "Transport".to_owned(),
                amount: 2.8,
            },
        ]
    }

    #[test]
    fn chart_options_contain_one_series_per_category() {
        let expenses = sample_expenses();
        let summary = aggregate(&expenses, None);

        let chart = ExpenseChart::new(&summary.filtered, &summary.days);

        assert!(chart.options.contains("\"Food\""));
        assert!(chart.options.contains("\"Transport\""));
        assert!(chart.options.contains("\"stack\""));
        assert!(chart.options.contains("\"Expenses\""));
    }

    #[test]
    fn chart_options_label_days_with_iso_dates() {
        let expenses = sample_expenses();
        let summary = aggregate(&expenses, None);

        let chart = ExpenseChart::new(&summary.filtered, &summary.days);

        assert!(chart.options.contains("2024-03-01"));
        assert!(chart.options.contains("2024-03-02"));
    }

    #[test]
    fn chart_view_renders_the_container_div() {
        let expenses = sample_expenses();
        let summary = aggregate(&expenses, None);
        let chart = ExpenseChart::new(&summary.filtered, &summary.days);

        let markup = chart_view(&chart).into_string();

        assert!(markup.contains("id=\"expenses-chart\""));
    }

    #[test]
    fn chart_script_embeds_the_options() {
        let expenses = sample_expenses();
        let summary = aggregate(&expenses, None);
        let chart = ExpenseChart::new(&summary.filtered, &summary.days);

        match chart_script(&chart) {
            HeadElement::ScriptSource(script) => {
                assert!(script.0.contains("echarts.init"));
                assert!(script.0.contains(&chart.options));
            }
            _ => panic!("expected an inline script"),
        }
    }
}
