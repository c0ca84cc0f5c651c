//! Command-line interface argument parsing.

use crate::charts::DisplayMode;
use crate::report::ReportFormat;
use crate::store::ImportMode;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

/// Employee performance report
///
/// Imports employee records from a CSV file into a SQLite table, prints
/// per-department statistics and draws a score histogram plus two scatter
/// plots.
///
/// Examples:
///   employee_report --input MOCK_DATA.csv
///   employee_report --charts export --output-dir charts
///   employee_report --charts none --format json
///   employee_report --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// CSV file with the employee records
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// SQLite database file
    #[arg(short, long, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Commit behaviour of the import
    #[arg(long, value_name = "MODE")]
    pub import_mode: Option<ImportMode>,

    /// How charts are presented
    #[arg(long, value_name = "MODE")]
    pub charts: Option<DisplayMode>,

    /// Directory for exported chart images
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Statistics report format
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for employee_report.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default employee_report.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log level implied by the verbosity flags.
    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::ERROR
        } else {
            Level::INFO
        }
    }
}
