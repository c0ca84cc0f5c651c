//! Static Chart Renderer
//! Exports report charts as PNG images with plotters.

use crate::charts::{series_rgb, Chart, HistogramChart, ScatterChart};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to draw chart: {0}")]
    Draw(String),
    #[error("Chart window failed: {0}")]
    Window(String),
}

fn draw_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Draw(e.to_string())
}

fn rgb(index: usize) -> RGBColor {
    let (r, g, b) = series_rgb(index);
    RGBColor(r, g, b)
}

/// Pad a value range so points do not sit on the frame.
fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if lo == hi {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// PNG path of a chart inside `dir`.
    pub fn output_path(dir: &Path, chart: &Chart) -> PathBuf {
        dir.join(format!("{}.png", chart.name()))
    }

    /// Write every chart into `dir`, creating it if needed.
    pub fn export_all(
        charts: &[Chart],
        dir: &Path,
        size: (u32, u32),
    ) -> Result<Vec<PathBuf>, ChartError> {
        std::fs::create_dir_all(dir).map_err(|source| ChartError::OutputDir {
            path: dir.to_path_buf(),
            source,
        })?;

        charts
            .iter()
            .map(|chart| {
                let path = Self::output_path(dir, chart);
                Self::render_png(chart, &path, size)?;
                info!(path = %path.display(), "Chart exported");
                Ok(path)
            })
            .collect()
    }

    /// Render one chart to a PNG file.
    pub fn render_png(chart: &Chart, path: &Path, size: (u32, u32)) -> Result<(), ChartError> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        match chart {
            Chart::Histogram(h) => Self::draw_histogram(&root, h)?,
            Chart::Scatter(s) => Self::draw_scatter(&root, s)?,
        }

        root.present().map_err(draw_err)
    }

    fn draw_histogram(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        chart: &HistogramChart,
    ) -> Result<(), ChartError> {
        let (x_min, x_max) = chart.x_range().unwrap_or((0.0, 1.0));
        let y_max = (chart.max_count().max(1) as f64) * 1.1;

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max)
            .map_err(draw_err)?;

        ctx.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .draw()
            .map_err(draw_err)?;

        for (i, series) in chart.series.iter().enumerate() {
            let color = rgb(i);
            ctx.draw_series(series.bins.iter().map(|bin| {
                Rectangle::new(
                    [(bin.start, 0.0), (bin.end, bin.count as f64)],
                    color.mix(0.5).filled(),
                )
            }))
            .map_err(draw_err)?
            .label(series.label.as_str())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.mix(0.5).filled())
            });
        }

        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_err)
    }

    fn draw_scatter(
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        chart: &ScatterChart,
    ) -> Result<(), ChartError> {
        let ((x0, x1), (y0, y1)) = chart.bounds().unwrap_or(((0.0, 1.0), (0.0, 1.0)));
        let (x_min, x_max) = padded(x0, x1);
        let (y_min, y_max) = padded(y0, y1);

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(draw_err)?;

        ctx.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .draw()
            .map_err(draw_err)?;

        let color = rgb(0);
        ctx.draw_series(
            chart
                .points
                .iter()
                .map(|p| Circle::new((p[0], p[1]), 3, color.filled())),
        )
        .map_err(draw_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartSet;

    #[test]
    fn test_output_paths_follow_chart_names() {
        let charts = ChartSet::build(&[]);
        let dir = Path::new("out");
        let paths: Vec<PathBuf> = charts
            .iter()
            .map(|c| StaticChartRenderer::output_path(dir, c))
            .collect();
        assert_eq!(
            paths,
            vec![
                dir.join("performance_histogram.png"),
                dir.join("years_vs_performance.png"),
                dir.join("salary_vs_performance.png"),
            ]
        );
    }

    #[test]
    fn test_padded_ranges() {
        assert_eq!(padded(5.0, 5.0), (4.0, 6.0));
        let (lo, hi) = padded(0.0, 100.0);
        assert!(lo < 0.0 && hi > 100.0);
    }
}
