//! Chart Plotter Module
//! Draws report charts interactively using egui_plot.

use crate::charts::{series_rgb, Chart, HistogramChart, ScatterChart};
use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

/// Opacity of overlaid histogram bars.
const HISTOGRAM_ALPHA: f32 = 0.5;

/// Draws charts into an egui `Ui`.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for the n-th series.
    pub fn series_color(index: usize) -> Color32 {
        let (r, g, b) = series_rgb(index);
        Color32::from_rgb(r, g, b)
    }

    /// Draw any chart, filling the available space.
    pub fn draw(ui: &mut egui::Ui, chart: &Chart) {
        match chart {
            Chart::Histogram(h) => Self::draw_histogram(ui, h),
            Chart::Scatter(s) => Self::draw_scatter(ui, s),
        }
    }

    /// Overlaid, semi-transparent histograms with one legend entry per
    /// department.
    pub fn draw_histogram(ui: &mut egui::Ui, chart: &HistogramChart) {
        Plot::new(chart.name)
            .legend(Legend::default())
            .x_axis_label(chart.x_label.as_str())
            .y_axis_label(chart.y_label.as_str())
            .include_y(0.0)
            .show(ui, |plot_ui| {
                for (i, series) in chart.series.iter().enumerate() {
                    let color = Self::series_color(i);
                    let bars: Vec<Bar> = series
                        .bins
                        .iter()
                        .map(|bin| {
                            Bar::new(bin.center(), bin.count as f64)
                                .width(bin.width())
                                .fill(color.gamma_multiply(HISTOGRAM_ALPHA))
                        })
                        .collect();

                    plot_ui.bar_chart(
                        BarChart::new(bars)
                            .color(color.gamma_multiply(HISTOGRAM_ALPHA))
                            .name(&series.label),
                    );
                }
            });
    }

    /// Scatter plot of every record.
    pub fn draw_scatter(ui: &mut egui::Ui, chart: &ScatterChart) {
        Plot::new(chart.name)
            .x_axis_label(chart.x_label.as_str())
            .y_axis_label(chart.y_label.as_str())
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(chart.points.iter().copied()))
                        .radius(3.0)
                        .color(Self::series_color(0)),
                );
            });
    }
}
