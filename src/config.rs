//! Configuration file handling.
//!
//! Settings come from `employee_report.toml` (or `--config`), with
//! command-line flags taking precedence.

use crate::charts::DisplayMode;
use crate::cli::Args;
use crate::report::ReportFormat;
use crate::store::ImportMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "employee_report.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub charts: ChartConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

/// Input file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// CSV file with the employee records.
    #[serde(default = "default_input_path")]
    pub path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
        }
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("MOCK_DATA.csv")
}

/// Relational store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    /// Whether a failed import keeps the rows written before the failure.
    #[serde(default)]
    pub import_mode: ImportMode,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            import_mode: ImportMode::default(),
        }
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from("companydata.db")
}

/// Chart presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default)]
    pub mode: DisplayMode,

    /// Directory for exported PNG files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    /// Open exported images with the system viewer.
    #[serde(default)]
    pub open_exported: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::default(),
            output_dir: default_output_dir(),
            width: default_width(),
            height: default_height(),
            open_exported: false,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("charts")
}

fn default_width() -> u32 {
    1024
}

fn default_height() -> u32 {
    768
}

/// Console report settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: ReportFormat,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load the explicit config file, or the default one when it exists,
    /// or fall back to built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given explicitly on the command line override the file.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref input) = args.input {
            self.input.path = input.clone();
        }
        if let Some(ref database) = args.database {
            self.database.path = database.clone();
        }
        if let Some(mode) = args.import_mode {
            self.database.import_mode = mode;
        }
        if let Some(mode) = args.charts {
            self.charts.mode = mode;
        }
        if let Some(ref dir) = args.output_dir {
            self.charts.output_dir = dir.clone();
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Config::default()).context("Failed to serialize default config")
    }
}
