//! Data models for the sales dashboard.
//!
//! This module contains the core data structures shared by the loader,
//! the analysis pipeline and the report renderers.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single row of the sales dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Date the order was placed.
    pub order_date: NaiveDate,
    /// Top-level product category.
    pub category: String,
    /// Product sub-category (belongs to exactly one category).
    pub sub_category: String,
    /// Sales amount.
    pub sales: Decimal,
    /// Profit amount (may be negative).
    pub profit: Decimal,
}

impl SalesRecord {
    /// Returns the calendar month the order falls in.
    pub fn month(&self) -> Month {
        Month::from_date(self.order_date)
    }
}

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    /// Creates a month key; `month` is 1-based.
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Returns the month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// Returns the following calendar month.
    pub fn succ(self) -> Self {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for Month {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// One grouped-and-summed row keyed by category, sub-category or month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateRow<K> {
    /// Group key.
    pub key: K,
    /// Sum of `Sales` over the group.
    pub sales: Decimal,
    /// Sum of `Profit` over the group.
    pub profit: Decimal,
    /// Number of records in the group.
    pub orders: usize,
}

impl<K> AggregateRow<K> {
    /// Creates an empty row for `key`.
    pub fn empty(key: K) -> Self {
        Self {
            key,
            sales: Decimal::ZERO,
            profit: Decimal::ZERO,
            orders: 0,
        }
    }

    /// Adds a record's measures to this row, saturating at the decimal range.
    pub fn add(&mut self, record: &SalesRecord) {
        self.sales = self.sales.saturating_add(record.sales);
        self.profit = self.profit.saturating_add(record.profit);
        self.orders += 1;
    }
}

/// Headline metrics for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricSnapshot {
    /// Sum of `Sales` over the selected records.
    pub total_sales: Decimal,
    /// Sum of `Profit` over the selected records.
    pub total_profit: Decimal,
    /// Profit margin (%) of the selection; zero when there are no sales.
    pub profit_margin: Decimal,
    /// Profit margin (%) of the whole dataset.
    pub overall_margin: Decimal,
    /// `profit_margin - overall_margin`.
    pub margin_delta: Decimal,
}

/// Basic facts about the loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    /// Where the data came from.
    pub source: String,
    /// Number of records loaded.
    pub rows: usize,
    /// Earliest order date, if any.
    pub first_order: Option<NaiveDate>,
    /// Latest order date, if any.
    pub last_order: Option<NaiveDate>,
}

impl DatasetSummary {
    /// Summarizes a record set.
    pub fn from_records(source: impl Into<String>, records: &[SalesRecord]) -> Self {
        Self {
            source: source.into(),
            rows: records.len(),
            first_order: records.iter().map(|r| r.order_date).min(),
            last_order: records.iter().map(|r| r.order_date).max(),
        }
    }
}
