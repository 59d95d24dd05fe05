//! Toast notification system for user feedback.

use eframe::egui;

use crate::app::CurveViewerApp;

/// Toasts disappear after this many seconds
const TOAST_SECONDS: u64 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastType {
    Success,
    Warning,
    Error,
}

impl ToastType {
    pub fn color(&self) -> [u8; 3] {
        match self {
            ToastType::Success => [113, 120, 78],
            ToastType::Warning => [253, 193, 73],
            ToastType::Error => [135, 30, 28],
        }
    }

    pub fn text_color(&self) -> [u8; 3] {
        match self {
            ToastType::Warning => [30, 30, 30],
            _ => [255, 255, 255],
        }
    }
}

impl CurveViewerApp {
    /// Render toast notifications in the bottom right corner
    pub fn render_toast(&mut self, ctx: &egui::Context) {
        if let Some((message, time, toast_type)) = &self.toast_message {
            if time.elapsed().as_secs() < TOAST_SECONDS {
                let margin = 20.0;
                let bg_color = toast_type.color();
                let text_color = toast_type.text_color();

                egui::Area::new(egui::Id::new("toast"))
                    .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-margin, -margin))
                    .order(egui::Order::Foreground)
                    .show(ctx, |ui| {
                        egui::Frame::NONE
                            .fill(egui::Color32::from_rgb(
                                bg_color[0],
                                bg_color[1],
                                bg_color[2],
                            ))
                            .inner_margin(egui::Margin::symmetric(16, 12))
                            .show(ui, |ui| {
                                ui.label(
                                    egui::RichText::new(message)
                                        .color(egui::Color32::from_rgb(
                                            text_color[0],
                                            text_color[1],
                                            text_color[2],
                                        ))
                                        .size(14.0),
                                );
                            });
                    });
            } else {
                self.toast_message = None;
            }
        }
    }
}
