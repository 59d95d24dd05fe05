//! Export actions triggered from the viewer (CSV, PNG, PDF).

use crate::app::CurveViewerApp;
use crate::export::{csv, image, ImageFormat};
use crate::render::{build_scene, RenderConfig};
use crate::state::{EXPORT_HEIGHT, EXPORT_WIDTH};

impl CurveViewerApp {
    /// Export the selected capture's curves as CSV
    pub fn export_selected_csv(&mut self) {
        let Some(file) = self.selected() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(format!("{}.csv", file.stem()))
            .save_file()
        else {
            return;
        };

        match csv::write_csv(&file.dataset, &path) {
            Ok(_) => self.show_toast_success("Curves exported as CSV"),
            Err(e) => self.show_toast_error(&format!("Export failed: {}", e)),
        }
    }

    /// Export the selected capture's chart as an image or PDF
    pub fn export_selected_image(&mut self, format: ImageFormat) {
        let Some(file) = self.selected() else {
            return;
        };
        let extension = format.extension();
        let Some(path) = rfd::FileDialog::new()
            .add_filter(extension.to_uppercase(), &[extension])
            .set_file_name(format!("{}.{}", file.stem(), extension))
            .save_file()
        else {
            return;
        };

        // Exports use a fixed size rather than the window size
        let config = RenderConfig {
            visible: false,
            width: EXPORT_WIDTH,
            height: EXPORT_HEIGHT,
            colorblind: self.config.colorblind,
        };
        let scene = build_scene(&file.dataset, &file.name, &config);

        match image::save_image(&scene, format, &path) {
            Ok(_) => self.show_toast_success(&format!(
                "Chart exported as {}",
                extension.to_uppercase()
            )),
            Err(e) => self.show_toast_error(&format!("Export failed: {}", e)),
        }
    }
}
