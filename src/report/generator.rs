//! Markdown and JSON dashboard generation.
//!
//! This module renders a `Dashboard` as a Markdown document (tables plus
//! text bar charts) or as pretty-printed JSON.

use crate::dashboard::Dashboard;
use crate::models::{AggregateRow, DatasetSummary, MetricSnapshot};
use crate::report::format::{bar, format_currency, format_percent, format_signed_percent, max_abs};
use crate::report::terminal::selected_list;
use anyhow::Result;
use std::fmt::Display;

/// Generate a complete Markdown dashboard.
pub fn generate_markdown_report(dashboard: &Dashboard, chart_width: usize) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Sales Dashboard\n\n");

    output.push_str(&generate_dataset_section(&dashboard.dataset, dashboard));
    output.push_str(&generate_raw_section(dashboard));

    output.push_str(&generate_aggregate_section(
        "Sales by Category",
        "Category",
        &dashboard.by_category,
        chart_width,
    ));
    output.push_str(&generate_aggregate_section(
        "Sales by Month",
        "Month",
        &dashboard.by_month,
        chart_width,
    ));

    output.push_str(&generate_selection_section(dashboard));
    output.push_str(&generate_aggregate_section(
        &format!("Sales by Sub_Category ({})", dashboard.selection.category()),
        "Sub_Category",
        &dashboard.by_sub_category,
        chart_width,
    ));
    output.push_str(&generate_metrics_section(&dashboard.metrics));

    // Footer
    output.push_str("---\n\n");
    output.push_str(&format!(
        "*Generated by salesdash on {}*\n",
        dashboard.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

/// Generate the dataset metadata section.
fn generate_dataset_section(dataset: &DatasetSummary, dashboard: &Dashboard) -> String {
    let mut section = String::new();

    section.push_str("## Dataset\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", dataset.source));
    section.push_str(&format!("- **Rows:** {}\n", dataset.rows));
    if let (Some(first), Some(last)) = (dataset.first_order, dataset.last_order) {
        section.push_str(&format!("- **Order Dates:** {} to {}\n", first, last));
    }
    section.push_str(&format!("- **Categories:** {}\n", dashboard.categories.len()));
    section.push('\n');

    section
}

/// Generate the raw data preview.
fn generate_raw_section(dashboard: &Dashboard) -> String {
    let mut section = String::new();

    section.push_str("## Input Data\n\n");
    section.push_str("| Order_Date | Category | Sub_Category | Sales | Profit |\n");
    section.push_str("|:---|:---|:---|---:|---:|\n");

    for record in &dashboard.raw_preview {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            record.order_date,
            escape_cell(&record.category),
            escape_cell(&record.sub_category),
            format_currency(record.sales),
            format_currency(record.profit)
        ));
    }

    if dashboard.raw_preview.len() < dashboard.dataset.rows {
        section.push_str(&format!(
            "\n*Showing {} of {} rows.*\n",
            dashboard.raw_preview.len(),
            dashboard.dataset.rows
        ));
    }
    section.push('\n');

    section
}

/// Generate an aggregate table with a bar chart column.
fn generate_aggregate_section<K: Display>(
    title: &str,
    key_name: &str,
    rows: &[AggregateRow<K>],
    chart_width: usize,
) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", title));

    if rows.is_empty() {
        section.push_str("No records match the current selection.\n\n");
        return section;
    }

    section.push_str(&format!("| {} | Sales | Profit | Orders | Chart |\n", key_name));
    section.push_str("|:---|---:|---:|---:|:---|\n");

    let max = max_abs(rows.iter().map(|r| r.sales));
    for row in rows {
        section.push_str(&format!(
            "| {} | {} | {} | {} | `{}` |\n",
            escape_cell(&row.key.to_string()),
            format_currency(row.sales),
            format_currency(row.profit),
            row.orders,
            bar(row.sales, max, chart_width)
        ));
    }
    section.push('\n');

    section
}

/// Generate the selector state section.
fn generate_selection_section(dashboard: &Dashboard) -> String {
    let mut section = String::new();

    section.push_str("## Selection\n\n");
    section.push_str(&format!(
        "- **Category:** {} (options: {})\n",
        dashboard.selection.category(),
        dashboard.categories.join(", ")
    ));
    section.push_str(&format!(
        "- **Sub-Categories:** {} (options: {})\n\n",
        selected_list(dashboard.selection.subcategories()),
        dashboard.subcategory_options.join(", ")
    ));

    section
}

/// Generate the key metrics section.
fn generate_metrics_section(metrics: &MetricSnapshot) -> String {
    let mut section = String::new();

    section.push_str("## Key Metrics for Selected Sub-Categories\n\n");
    section.push_str("| Total Sales | Total Profit | Profit Margin (%) | Delta vs. Overall |\n");
    section.push_str("|---:|---:|---:|---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        format_currency(metrics.total_sales),
        format_currency(metrics.total_profit),
        format_percent(metrics.profit_margin),
        format_signed_percent(metrics.margin_delta)
    ));
    section.push_str(&format!(
        "Overall profit margin across all categories: {}\n\n",
        format_percent(metrics.overall_margin)
    ));

    section
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Generate a JSON dashboard.
pub fn generate_json_report(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Selection;
    use crate::dashboard::DashboardOptions;
    use crate::loader::load_records;

    const SAMPLE_CSV: &str = include_str!("../../fixtures/superstore_sample.csv");

    fn create_test_dashboard() -> Dashboard {
        let records = load_records(SAMPLE_CSV.as_bytes()).unwrap();
        let selection = Selection::for_category(&records, "Furniture")
            .unwrap()
            .with_subcategories(&records, &["Tables".to_string(), "Chairs".to_string()])
            .unwrap();
        Dashboard::build("sample.csv", &records, &selection, &DashboardOptions { raw_rows: 4 })
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_dashboard(), 10);

        assert!(markdown.contains("# Sales Dashboard"));
        assert!(markdown.contains("## Input Data"));
        assert!(markdown.contains("*Showing 4 of 9 rows.*"));
        assert!(markdown.contains("## Sales by Category"));
        assert!(markdown.contains("## Sales by Month"));
        assert!(markdown.contains("## Sales by Sub_Category (Furniture)"));
        assert!(markdown.contains("- **Sub-Categories:** Chairs, Tables"));
        assert!(markdown.contains("| Furniture | $2,000.34 | -$107.37 | 4 |"));
    }

    #[test]
    fn test_generate_metrics_section() {
        let dashboard = create_test_dashboard();
        let section = generate_metrics_section(&dashboard.metrics);

        // Chairs 731.94 / 219.582 + Tables 957.5775 / -383.031
        assert!(section.contains("$1,689.52"));
        assert!(section.contains("-$163.45"));
        assert!(section.contains("-9.67%"));
        assert!(section.contains("Overall profit margin across all categories: 0.02%"));
    }

    #[test]
    fn test_empty_aggregate_section() {
        let rows: Vec<AggregateRow<String>> = Vec::new();
        let section = generate_aggregate_section("Sales by Sub_Category (Furniture)", "Sub_Category", &rows, 10);
        assert!(section.contains("No records match the current selection."));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_dashboard()).unwrap();

        assert!(json.contains("\"by_category\""));
        assert!(json.contains("\"by_month\""));
        assert!(json.contains("\"2014-06\""));
        assert!(json.contains("\"subcategory_options\""));
        assert!(json.contains("\"margin_delta\""));
    }
}
