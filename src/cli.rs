//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Salesdash - sales analytics dashboard for CSV datasets
///
/// Shows the raw data, sales by category and by month, and a drill-down
/// into one category's sub-categories with total sales, total profit and
/// profit margin compared against the whole dataset.
///
/// Examples:
///   salesdash --data Superstore_Sales_utf8.csv
///   salesdash --category Furniture --subcategories Chairs,Tables
///   salesdash --category Technology --format markdown --output dashboard.md
///   salesdash --list-categories
///   salesdash --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// CSV dataset to analyze
    ///
    /// Must contain the columns Order_Date, Category, Sub_Category, Sales and Profit.
    /// Default: from config or Superstore_Sales_utf8.csv.
    #[arg(short, long, value_name = "FILE", env = "SALESDASH_DATA")]
    pub data: Option<PathBuf>,

    /// Category to drill into
    ///
    /// Defaults to the first category in the dataset.
    #[arg(short, long, value_name = "NAME")]
    pub category: Option<String>,

    /// Sub-categories to include (comma-separated)
    ///
    /// Must belong to the selected category. Defaults to all of them.
    /// Example: --subcategories Chairs,Tables
    #[arg(short, long, value_name = "LIST", value_delimiter = ',')]
    pub subcategories: Option<Vec<String>>,

    /// Select no sub-categories (the drill-down shows an empty result)
    #[arg(long, conflicts_with = "subcategories")]
    pub no_subcategories: bool,

    /// Output format (text, markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the dashboard to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of raw rows to show in the input data table (0 shows every row)
    #[arg(long, value_name = "COUNT")]
    pub raw_rows: Option<usize>,

    /// Width of the text bar charts in cells
    #[arg(long, value_name = "CELLS")]
    pub chart_width: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .salesdash.toml in the current directory
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// List every category with its sub-categories and exit
    #[arg(long)]
    pub list_categories: bool,

    /// Fail if the selected profit margin (%) is below this value
    ///
    /// Useful for scheduled checks. Exit code 2 when the margin is lower.
    #[arg(long, value_name = "PCT", allow_negative_numbers = true)]
    pub min_margin: Option<Decimal>,

    /// Generate a default .salesdash.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Terminal tables (default)
    #[default]
    Text,
    /// Markdown document
    Markdown,
    /// JSON document
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.chart_width == Some(0) {
            return Err("Chart width must be at least 1".to_string());
        }

        if let Some(ref subs) = self.subcategories {
            if subs.iter().any(|s| s.trim().is_empty()) {
                return Err("Sub-category names must not be empty".to_string());
            }
        }

        // Validate dataset path if provided
        if let Some(ref data) = self.data {
            if !data.exists() {
                return Err(format!("Dataset does not exist: {}", data.display()));
            }
            if !data.is_file() {
                return Err(format!("Dataset is not a file: {}", data.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// The sub-category selection requested on the command line, if any.
    pub fn requested_subcategories(&self) -> Option<Vec<String>> {
        if self.no_subcategories {
            Some(Vec::new())
        } else {
            self.subcategories
                .as_ref()
                .map(|subs| subs.iter().map(|s| s.trim().to_string()).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            data: None,
            category: None,
            subcategories: None,
            no_subcategories: false,
            format: None,
            output: None,
            raw_rows: None,
            chart_width: None,
            config: None,
            verbose: false,
            quiet: false,
            list_categories: false,
            min_margin: None,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_selection_flags() {
        let args = Args::try_parse_from([
            "salesdash",
            "--category",
            "Furniture",
            "--subcategories",
            "Chairs,Tables",
            "--format",
            "markdown",
            "--min-margin",
            "-5.5",
        ])
        .unwrap();

        assert_eq!(args.category.as_deref(), Some("Furniture"));
        assert_eq!(
            args.subcategories,
            Some(vec!["Chairs".to_string(), "Tables".to_string()])
        );
        assert_eq!(args.format, Some(OutputFormat::Markdown));
        assert_eq!(args.min_margin, Some(Decimal::new(-55, 1)));
    }

    #[test]
    fn test_subcategory_flags_conflict() {
        let result = Args::try_parse_from([
            "salesdash",
            "--subcategories",
            "Chairs",
            "--no-subcategories",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_requested_subcategories() {
        let mut args = make_args();
        assert_eq!(args.requested_subcategories(), None);

        args.subcategories = Some(vec![" Chairs ".to_string()]);
        assert_eq!(args.requested_subcategories(), Some(vec!["Chairs".to_string()]));

        args.subcategories = None;
        args.no_subcategories = true;
        assert_eq!(args.requested_subcategories(), Some(Vec::new()));
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_dataset() {
        let mut args = make_args();
        args.data = Some(PathBuf::from("/nonexistent/sales.csv"));
        assert!(args.validate().is_err());

        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_chart_width() {
        let mut args = make_args();
        args.chart_width = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
