//! Sidebar UI rendering - files panel, view options and export buttons.

use eframe::egui;

use crate::app::CurveViewerApp;
use crate::export::ImageFormat;
use crate::state::{LoadingState, CAPTURE_EXTENSIONS};

impl CurveViewerApp {
    /// Render the left sidebar with file list and view options
    pub fn render_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.heading("Captures");
        ui.separator();

        // Show loading indicator
        if let LoadingState::Loading(filename) = &self.loading_state {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(format!("Loading {}...", filename));
            });
            ui.separator();
        }

        let mut file_to_remove: Option<usize> = None;
        for (i, file) in self.files.iter().enumerate() {
            let is_selected = self.selected_file == Some(i);

            ui.horizontal(|ui| {
                if ui.selectable_label(is_selected, &file.name).clicked() {
                    self.selected_file = Some(i);
                }
                if ui.small_button("x").clicked() {
                    file_to_remove = Some(i);
                }
            });

            ui.indent(format!("file_indent_{}", i), |ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "{} traces | {} samples | {}",
                        file.dataset.traces.len(),
                        file.dataset.sample_count(),
                        file.dataset.bias.symbol()
                    ))
                    .small()
                    .color(egui::Color32::GRAY),
                );
            });
        }

        if let Some(index) = file_to_remove {
            self.remove_file(index);
        }

        ui.add_space(10.0);

        let is_loading = self.is_loading();
        ui.add_enabled_ui(!is_loading, |ui| {
            if ui.button("+ Open Capture").clicked() {
                if let Some(paths) = rfd::FileDialog::new()
                    .add_filter("Curve Tracer Captures", CAPTURE_EXTENSIONS)
                    .add_filter("All Files", &["*"])
                    .pick_files()
                {
                    self.open_files(paths);
                }
            }
        });

        ui.add_space(10.0);
        ui.separator();
        ui.label(egui::RichText::new("View").strong());
        ui.checkbox(&mut self.config.colorblind, "Colorblind palette");

        ui.add_space(10.0);
        ui.separator();
        ui.label(egui::RichText::new("Export").strong());
        let has_selection = self.selected().is_some();
        ui.add_enabled_ui(has_selection, |ui| {
            ui.horizontal_wrapped(|ui| {
                if ui.button("CSV").clicked() {
                    self.export_selected_csv();
                }
                for format in [ImageFormat::Png, ImageFormat::Pdf] {
                    if ui.button(format.extension().to_uppercase()).clicked() {
                        self.export_selected_image(format);
                    }
                }
            });
        });
    }
}
