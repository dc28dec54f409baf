//! Analysis pipeline stages.
//!
//! Aggregation, filtering, selection and metric calculation. Every stage is
//! a pure function over borrowed records.

pub mod aggregator;
pub mod filter;
pub mod metrics;
pub mod selection;

pub use aggregator::{by_category, by_month, by_sub_category};
pub use filter::{distinct_categories, filter_records, subcategories_in};
pub use metrics::compute_metrics;
pub use selection::Selection;
