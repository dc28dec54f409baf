//! Terminal dashboard rendering.
//!
//! Draws the dashboard as a sequence of comfy-table tables. Charts become a
//! bar column next to the aggregated values.

use crate::dashboard::Dashboard;
use crate::models::AggregateRow;
use crate::report::format::{bar, format_currency, format_percent, format_signed_percent, max_abs};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use rust_decimal::Decimal;
use std::fmt::Display;

/// Render the complete dashboard for a terminal.
pub fn render_terminal(dashboard: &Dashboard, chart_width: usize) -> String {
    let mut output = String::new();

    output.push_str("Sales Dashboard\n");
    output.push_str("===============\n\n");
    output.push_str(&format!(
        "Source: {} ({} rows{})\n\n",
        dashboard.dataset.source,
        dashboard.dataset.rows,
        match (dashboard.dataset.first_order, dashboard.dataset.last_order) {
            (Some(first), Some(last)) => format!(", {} to {}", first, last),
            _ => String::new(),
        }
    ));

    output.push_str(&section("Input Data", &raw_table(dashboard)));
    if dashboard.raw_preview.len() < dashboard.dataset.rows {
        output.push_str(&format!(
            "Showing {} of {} rows.\n\n",
            dashboard.raw_preview.len(),
            dashboard.dataset.rows
        ));
    }

    output.push_str(&section(
        "Sales by Category",
        &aggregate_table("Category", &dashboard.by_category, chart_width),
    ));
    output.push_str(&section(
        "Sales by Month",
        &aggregate_table("Month", &dashboard.by_month, chart_width),
    ));

    output.push_str(&format!(
        "Category: {}   (options: {})\n",
        dashboard.selection.category(),
        dashboard.categories.join(", ")
    ));
    output.push_str(&format!(
        "Sub-Categories: {}   (options: {})\n\n",
        selected_list(dashboard.selection.subcategories()),
        dashboard.subcategory_options.join(", ")
    ));

    output.push_str(&section(
        &format!("Sales by Sub_Category ({})", dashboard.selection.category()),
        &aggregate_table("Sub_Category", &dashboard.by_sub_category, chart_width),
    ));
    output.push_str(&section("Key Metrics for Selected Sub-Categories", &metrics_table(dashboard)));

    output
}

fn section(title: &str, table: &Table) -> String {
    format!("{}\n{}\n\n", title, table)
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn money_cell(value: Decimal) -> Cell {
    Cell::new(format_currency(value)).set_alignment(CellAlignment::Right)
}

fn raw_table(dashboard: &Dashboard) -> Table {
    let mut table = new_table(vec!["Order_Date", "Category", "Sub_Category", "Sales", "Profit"]);

    for record in &dashboard.raw_preview {
        table.add_row(vec![
            Cell::new(record.order_date),
            Cell::new(&record.category),
            Cell::new(&record.sub_category),
            money_cell(record.sales),
            money_cell(record.profit),
        ]);
    }

    table
}

fn aggregate_table<K: Display>(key_name: &str, rows: &[AggregateRow<K>], chart_width: usize) -> Table {
    let mut table = new_table(vec![key_name, "Sales", "Profit", "Orders", "Sales chart"]);
    let max = max_abs(rows.iter().map(|r| r.sales));

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.key),
            money_cell(row.sales),
            money_cell(row.profit),
            Cell::new(row.orders).set_alignment(CellAlignment::Right),
            Cell::new(bar(row.sales, max, chart_width)),
        ]);
    }

    if rows.is_empty() {
        table.add_row(vec!["(no data)", "", "", "", ""]);
    }

    table
}

fn metrics_table(dashboard: &Dashboard) -> Table {
    let metrics = &dashboard.metrics;
    let mut table = new_table(vec!["Total Sales", "Total Profit", "Profit Margin (%)", "vs. Overall"]);

    table.add_row(vec![
        money_cell(metrics.total_sales),
        money_cell(metrics.total_profit),
        Cell::new(format_percent(metrics.profit_margin)).set_alignment(CellAlignment::Right),
        Cell::new(format!(
            "{} (overall {})",
            format_signed_percent(metrics.margin_delta),
            format_percent(metrics.overall_margin)
        ))
        .set_alignment(CellAlignment::Right),
    ]);

    table
}

pub(crate) fn selected_list(subcategories: &[String]) -> String {
    if subcategories.is_empty() {
        "(none)".to_string()
    } else {
        subcategories.join(", ")
    }
}
