//! Chart rendering for the selected capture.

use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoints};

use crate::app::CurveViewerApp;
use crate::render::build_scene;

impl CurveViewerApp {
    /// Render the curves of the selected capture on fixed axes
    pub fn render_chart(&mut self, ui: &mut egui::Ui) {
        let Some(file) = self.selected() else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new("Open a capture to display curves")
                        .size(20.0)
                        .color(egui::Color32::GRAY),
                );
            });
            return;
        };

        let scene = build_scene(&file.dataset, &file.name, &self.config);
        let [x_min, x_max] = scene.x_range;
        let [y_min, y_max] = scene.y_range;

        ui.label(egui::RichText::new(&scene.title).strong());

        // Labelled traces go in highest gate value first and the legend keeps
        // that order. Unlabelled traces follow in file order.
        let mut order: Vec<usize> = scene.legend.iter().map(|e| e.trace_index).collect();
        order.extend(
            scene
                .polylines
                .iter()
                .filter(|l| l.label.is_none())
                .map(|l| l.trace_index),
        );

        let mut plot = Plot::new("curve_chart")
            .x_axis_label("Voltage [V]")
            .y_axis_label("Current [A]")
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false);
        if !scene.legend.is_empty() {
            plot = plot.legend(Legend::default().follow_insertion_order(true));
        }

        plot.show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, y_min], [x_max, y_max]));

            for index in order {
                let polyline = &scene.polylines[index];
                let points: PlotPoints = polyline.points.iter().copied().collect();
                let name = polyline.label.clone().unwrap_or_default();
                let color = polyline.color;
                plot_ui.line(
                    Line::new(name, points)
                        .color(egui::Color32::from_rgb(color[0], color[1], color[2]))
                        .width(1.5),
                );
            }
        });
    }
}
