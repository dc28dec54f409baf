//! Dashboard assembly.
//!
//! Runs aggregate → filter → metrics for one selection and collects every
//! output the renderers need into an immutable `Dashboard`.

use crate::analysis::{
    by_category, by_month, by_sub_category, compute_metrics, distinct_categories,
    filter_records, subcategories_in, Selection,
};
use crate::models::{AggregateRow, DatasetSummary, MetricSnapshot, Month, SalesRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// Knobs for building a dashboard.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Number of raw records to include in the preview table; `0` keeps every record.
    pub raw_rows: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self { raw_rows: 20 }
    }
}

/// Everything shown for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    /// When the dashboard was computed.
    pub generated_at: DateTime<Utc>,
    /// Facts about the loaded dataset.
    pub dataset: DatasetSummary,
    /// Leading records of the raw table.
    pub raw_preview: Vec<SalesRecord>,
    /// Sales/profit per category over the whole dataset.
    pub by_category: Vec<AggregateRow<String>>,
    /// Sales/profit per calendar month over the whole dataset.
    pub by_month: Vec<AggregateRow<Month>>,
    /// Category selector options.
    pub categories: Vec<String>,
    /// Sub-category selector options for the selected category.
    pub subcategory_options: Vec<String>,
    /// The active selection.
    pub selection: Selection,
    /// Sales/profit per selected sub-category.
    pub by_sub_category: Vec<AggregateRow<String>>,
    /// Headline metrics for the selection.
    pub metrics: MetricSnapshot,
}

impl Dashboard {
    /// Builds the dashboard for `selection` over `records`.
    pub fn build(
        source: &str,
        records: &[SalesRecord],
        selection: &Selection,
        options: &DashboardOptions,
    ) -> Self {
        let selected = filter_records(records, selection);
        let preview_rows = match options.raw_rows {
            0 => records.len(),
            n => n,
        };
        debug!(
            "Selection {} / {:?} matched {} of {} records",
            selection.category(),
            selection.subcategories(),
            selected.len(),
            records.len()
        );

        Self {
            generated_at: Utc::now(),
            dataset: DatasetSummary::from_records(source, records),
            raw_preview: records.iter().take(preview_rows).cloned().collect(),
            by_category: by_category(records),
            by_month: by_month(records),
            categories: distinct_categories(records),
            subcategory_options: subcategories_in(records, selection.category()),
            selection: selection.clone(),
            by_sub_category: by_sub_category(selected.iter().copied()),
            metrics: compute_metrics(selected, records),
        }
    }
}

/// Every category with the sub-categories that occur under it.
pub fn category_tree(records: &[SalesRecord]) -> Vec<(String, Vec<String>)> {
    distinct_categories(records)
        .into_iter()
        .map(|category| {
            let subs = subcategories_in(records, &category);
            (category, subs)
        })
        .collect()
}
