//! Employee Report - CSV import, per-department statistics & charts
//!
//! Loads employee records from a CSV file into a SQLite table, reads them
//! back, prints statistics per department and renders a score histogram
//! plus two scatter plots.
//!
//! Exit codes:
//!   0 - Report completed
//!   1 - Connection failure or any other fatal error

mod charts;
mod cli;
mod config;
mod data;
mod gui;
mod report;
mod stats;
mod store;

use anyhow::{Context, Result};
use charts::{ChartSet, DisplayMode, StaticChartRenderer};
use cli::Args;
use config::{ChartConfig, Config, DEFAULT_CONFIG_FILE};
use data::{DataLoader, EmployeeRecord};
use stats::StatsCalculator;
use std::io::Write;
use std::path::Path;
use store::{RecordStore, StoreError};
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse_args();

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    init_logging(&args);
    info!("Employee Report v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args) {
        if let Some(StoreError::Connect(cause)) = e.downcast_ref::<StoreError>() {
            error!("Connection failed: {}", cause);
            eprintln!("Could not connect: {}", cause);
        } else {
            error!("Report failed: {:#}", e);
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

/// Handle --init-config: write a default configuration file.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);
    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
    }

    let content = Config::default_toml()?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings; `RUST_LOG` wins.
fn init_logging(args: &Args) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(args.log_level()).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Run the whole report: import, aggregate, print, draw.
fn run(args: Args) -> Result<()> {
    let mut config = Config::load_or_default(args.config.as_deref())?;
    config.merge_with_args(&args);
    debug!("Configuration: {:?}", config);

    // Step 1: Read the input file
    let input = &config.input.path;
    let mut loader = DataLoader::new();
    loader
        .load_csv(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    println!("CSV columns: {:?}", loader.get_columns());
    let rows = loader.raw_rows()?;
    info!(rows = loader.get_row_count(), path = %input.display(), "Input loaded");

    // Step 2: Provision the table and import
    let mut store = RecordStore::connect(&config.database.path)?;
    println!("Connection established");

    store.provision()?;
    println!("Table created");

    let inserted = store.bulk_insert(&rows, config.database.import_mode)?;
    println!("Imported {} rows", inserted);
    debug!(stored = store.count()?, "Rows in table after import");

    // Step 3: Read everything back and aggregate
    let records: Vec<EmployeeRecord> = store
        .fetch_all()?
        .into_iter()
        .map(|stored| stored.record)
        .collect();
    let department_report = StatsCalculator::aggregate(&records);
    info!(
        departments = department_report.len(),
        records = department_report.total_count(),
        "Statistics computed"
    );
    if department_report.is_empty() {
        warn!("No records in the table, the report is empty");
    } else {
        debug!("Departments: {:?}", department_report.departments());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::write_report(&mut out, &department_report, config.report.format)?;
    out.flush()?;
    drop(out);

    // Step 4: Charts
    render_charts(&records, &config.charts)?;

    store.close()?;
    Ok(())
}

/// Present the three report charts according to the display mode.
fn render_charts(records: &[EmployeeRecord], settings: &ChartConfig) -> Result<()> {
    let charts = ChartSet::build(records);

    match settings.mode {
        DisplayMode::Window => {
            let size = [settings.width as f32, settings.height as f32];
            for chart in charts {
                info!(chart = chart.name(), "Showing chart, close the window to continue");
                gui::show_blocking(chart, size)?;
            }
        }
        DisplayMode::Export => {
            let paths = StaticChartRenderer::export_all(
                &charts,
                &settings.output_dir,
                (settings.width, settings.height),
            )?;
            for path in paths {
                println!("Chart written to {}", path.display());
                if settings.open_exported {
                    if let Err(e) = open::that(&path) {
                        warn!(path = %path.display(), "Could not open chart: {}", e);
                    }
                }
            }
        }
        DisplayMode::Disabled => info!("Chart rendering disabled"),
    }

    Ok(())
}
