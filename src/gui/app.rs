//! Chart Window
//! Native window showing a single report chart; returns when closed.

use crate::charts::{Chart, ChartError, ChartPlotter};
use egui::RichText;
use tracing::debug;

/// Window application for one chart.
pub struct ChartWindowApp {
    chart: Chart,
}

impl ChartWindowApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, chart: Chart) -> Self {
        Self { chart }
    }
}

impl eframe::App for ChartWindowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(self.chart.title()).strong().size(16.0));
            });
            ui.add_space(6.0);
            ChartPlotter::draw(ui, &self.chart);
        });
    }
}

/// Open `chart` in a native window and block until the user closes it.
pub fn show_blocking(chart: Chart, size: [f32; 2]) -> Result<(), ChartError> {
    let title = chart.title().to_string();
    debug!(chart = chart.name(), "Opening chart window");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(size)
            .with_title(title.as_str()),
        // several windows are opened one after another in the same process
        run_and_return: true,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(ChartWindowApp::new(cc, chart)))),
    )
    .map_err(|e| ChartError::Window(e.to_string()))
}
