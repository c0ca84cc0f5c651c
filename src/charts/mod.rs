//! Charts module - Chart data and rendering

mod plotter;
mod renderer;
mod series;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use plotter::ChartPlotter;
pub use renderer::{ChartError, StaticChartRenderer};
pub use series::{series_rgb, Chart, ChartSet, HistogramChart, ScatterChart};

/// How the report charts are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Open each chart in a window and wait until it is closed.
    #[default]
    Window,
    /// Write each chart as a PNG file.
    Export,
    /// Skip chart rendering.
    #[serde(rename = "none")]
    #[value(name = "none")]
    Disabled,
}
