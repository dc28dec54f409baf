//! Record filtering and option discovery.
//!
//! Filters borrow from the source slice and never modify it.

use crate::analysis::selection::Selection;
use crate::models::SalesRecord;

/// Records belonging to `category`.
pub fn filter_by_category<'a>(records: &'a [SalesRecord], category: &str) -> Vec<&'a SalesRecord> {
    records.iter().filter(|r| r.category == category).collect()
}

/// Records matching the selected category and one of the selected sub-categories.
///
/// An empty sub-category selection matches nothing.
pub fn filter_records<'a>(records: &'a [SalesRecord], selection: &Selection) -> Vec<&'a SalesRecord> {
    records.iter().filter(|r| selection.matches(r)).collect()
}

/// Distinct categories in first-appearance order.
pub fn distinct_categories(records: &[SalesRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.category.as_str()))
}

/// Distinct sub-categories occurring under `category`, in first-appearance order.
pub fn subcategories_in(records: &[SalesRecord], category: &str) -> Vec<String> {
    distinct(
        filter_by_category(records, category)
            .into_iter()
            .map(|r| r.sub_category.as_str()),
    )
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}
