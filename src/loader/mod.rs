//! CSV dataset loader.
//!
//! Reads a Superstore-style sales CSV into immutable `SalesRecord`s.
//! Required columns: `Order_Date`, `Category`, `Sub_Category`, `Sales`, `Profit`.
//! Any other columns are ignored.

use crate::models::SalesRecord;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Columns the dataset must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = ["Order_Date", "Category", "Sub_Category", "Sales", "Profit"];

/// Accepted date layouts, tried in order. Two-digit years come before
/// four-digit ones since `%Y` would happily read "16" as year 16.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

/// Errors raised while loading a dataset.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to open dataset '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read CSV header: {0}")]
    Header(#[source] csv::Error),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("CSV parse error at line {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("{column} values overflow the decimal range at line {line}")]
    Overflow { line: u64, column: &'static str },
}

/// One CSV row as it appears on disk.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(rename = "Order_Date", deserialize_with = "deserialize_date")]
    order_date: NaiveDate,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Sub_Category")]
    sub_category: String,
    #[serde(rename = "Sales", deserialize_with = "deserialize_decimal")]
    sales: Decimal,
    #[serde(rename = "Profit", deserialize_with = "deserialize_decimal")]
    profit: Decimal,
}

impl From<CsvRecord> for SalesRecord {
    fn from(row: CsvRecord) -> Self {
        Self {
            order_date: row.order_date,
            category: row.category,
            sub_category: row.sub_category,
            sales: row.sales,
            profit: row.profit,
        }
    }
}

/// Load sales records from any CSV reader.
///
/// The absolute `Sales` and `Profit` sums must fit in a `Decimal`, so every
/// aggregate over the returned records is representable.
pub fn load_records<R: Read>(reader: R) -> Result<Vec<SalesRecord>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(LoadError::Header)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column));
        }
    }
    debug!("CSV header: {:?}", headers);

    let mut records = Vec::new();
    let mut raw = csv::StringRecord::new();
    let mut sales_bound = Decimal::ZERO;
    let mut profit_bound = Decimal::ZERO;
    let mut row_count: u64 = 0;

    while csv_reader
        .read_record(&mut raw)
        .map_err(|source| LoadError::Row {
            line: source
                .position()
                .map(|p| p.line())
                .unwrap_or(row_count + 2),
            source,
        })?
    {
        row_count += 1;
        let line = raw.position().map(|p| p.line()).unwrap_or(row_count + 1);

        let row: CsvRecord = raw
            .deserialize(Some(&headers))
            .map_err(|source| LoadError::Row { line, source })?;

        sales_bound = sales_bound
            .checked_add(row.sales.abs())
            .ok_or(LoadError::Overflow { line, column: "Sales" })?;
        profit_bound = profit_bound
            .checked_add(row.profit.abs())
            .ok_or(LoadError::Overflow { line, column: "Profit" })?;

        records.push(SalesRecord::from(row));
    }

    Ok(records)
}

/// Load sales records from a CSV file on disk.
pub fn load_file(path: &Path) -> Result<Vec<SalesRecord>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let records = load_records(file)?;
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse a date in any of the accepted layouts.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a decimal, tolerating a `$` sign and thousands separators.
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '$')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_date(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("expected a calendar date, got '{}'", s)))
}

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_decimal(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("expected a decimal number, got '{}'", s)))
}
