//! Salesdash - Sales Analytics Dashboard
//!
//! A CLI tool that loads a sales CSV, aggregates it by category and by
//! month, and drills into one category's sub-categories with headline
//! metrics compared against the whole dataset.
//!
//! Exit codes:
//!   0 - Success (margin at or above --min-margin, or no --min-margin set)
//!   1 - Runtime error (dataset, config, selection, etc.)
//!   2 - Selected profit margin below --min-margin

mod analysis;
mod cli;
mod config;
mod dashboard;
mod loader;
mod models;
mod report;

use analysis::Selection;
use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use dashboard::{category_tree, Dashboard, DashboardOptions};
use models::SalesRecord;
use report::format::{format_percent, format_signed_percent};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration first so `general.verbose` can raise the log level
    let config = match load_config(&args) {
        Ok(mut config) => {
            config.merge_with_args(&args);
            config
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(config.log_level(&args));

    info!("Salesdash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    match run_dashboard(&args, config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Dashboard failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .salesdash.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", DEFAULT_CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to set the dataset path, default selection and report format.");
    Ok(())
}

/// Initialize logging at `level`.
///
/// Logs go to stderr so the rendered dashboard can be piped from stdout.
/// `RUST_LOG` takes precedence when set.
fn init_logging(level: tracing::Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the load → aggregate → filter → metrics → render pipeline once.
/// Returns the exit code (0 or 2).
fn run_dashboard(args: &Args, config: Config) -> Result<i32> {
    let start_time = Instant::now();

    // Step 1: Load the dataset
    let data_path = PathBuf::from(&config.data.path);
    let records = loader::load_file(&data_path)
        .with_context(|| format!("Failed to load dataset {}", data_path.display()))?;

    if records.is_empty() {
        warn!("Dataset {} contains no records", data_path.display());
    }

    if args.list_categories {
        return handle_list_categories(&records);
    }

    // Step 2: Resolve the selection against the loaded data
    let selection = Selection::resolve(
        &records,
        config.selection.category.as_deref(),
        config.selection.subcategories.as_deref(),
    )
    .context("Invalid selection")?;
    info!(
        "Selected category '{}' with {} sub-categories",
        selection.category(),
        selection.subcategories().len()
    );

    // Step 3: Build the dashboard
    let options = DashboardOptions {
        raw_rows: config.report.raw_rows,
    };
    let dashboard = Dashboard::build(&config.data.path, &records, &selection, &options);

    // Step 4: Render and write
    let output = match config.report.format {
        OutputFormat::Text => report::render_terminal(&dashboard, config.report.chart_width),
        OutputFormat::Markdown => {
            report::generate_markdown_report(&dashboard, config.report.chart_width)
        }
        OutputFormat::Json => report::generate_json_report(&dashboard)?,
    };

    match config.report.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write dashboard to {}", path))?;
            info!("Dashboard saved to: {}", path);
        }
        None => print!("{}", output),
    }

    info!(
        "Margin {} ({} vs. overall {}) in {:.2}s",
        format_percent(dashboard.metrics.profit_margin),
        format_signed_percent(dashboard.metrics.margin_delta),
        format_percent(dashboard.metrics.overall_margin),
        start_time.elapsed().as_secs_f64()
    );

    // Check --min-margin threshold
    let exit_code = margin_exit_code(dashboard.metrics.profit_margin, config.general.min_margin);
    if exit_code == 2 {
        eprintln!(
            "\n⛔ Profit margin {} is below the minimum of {}. Failing (exit code 2).",
            format_percent(dashboard.metrics.profit_margin),
            format_percent(config.general.min_margin.unwrap_or_default())
        );
    }

    Ok(exit_code)
}

/// Exit code for the `--min-margin` check: 2 when `margin` is below the minimum.
fn margin_exit_code(margin: Decimal, min_margin: Option<Decimal>) -> i32 {
    match min_margin {
        Some(min_margin) if margin < min_margin => 2,
        _ => 0,
    }
}

/// Handle --list-categories: print the category tree and exit.
fn handle_list_categories(records: &[SalesRecord]) -> Result<i32> {
    let tree = category_tree(records);

    if tree.is_empty() {
        println!("No categories found.");
        return Ok(0);
    }

    for (category, subcategories) in tree {
        println!("{}", category);
        for sub in subcategories {
            println!("  - {}", sub);
        }
    }

    Ok(0)
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is initialized, so problems go straight to stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Ignoring {}: {:#}", DEFAULT_CONFIG_FILE, e);
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_margin_exit_code_without_threshold() {
        assert_eq!(margin_exit_code(dec!(-50), None), 0);
    }

    #[test]
    fn test_margin_exit_code_below_threshold() {
        assert_eq!(margin_exit_code(dec!(-9.67), Some(dec!(5))), 2);
        assert_eq!(margin_exit_code(dec!(-20), Some(dec!(-5.5))), 2);
    }

    #[test]
    fn test_margin_exit_code_at_or_above_threshold() {
        assert_eq!(margin_exit_code(dec!(5), Some(dec!(5))), 0);
        assert_eq!(margin_exit_code(dec!(6.67), Some(dec!(5))), 0);
        assert_eq!(margin_exit_code(Decimal::ZERO, Some(dec!(-1))), 0);
    }
}
