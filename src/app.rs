//! Interactive viewer for decoded captures.

use eframe::egui;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::Instant;

use crate::parsers::CurveTracer;
use crate::render::RenderConfig;
use crate::state::{display_name, LoadResult, LoadedFile, LoadingState};
use crate::ui::toast::ToastType;

/// Main application state
pub struct CurveViewerApp {
    /// Decoded captures
    pub(crate) files: Vec<LoadedFile>,
    /// Capture shown in the chart
    pub(crate) selected_file: Option<usize>,
    /// Toast messages for user feedback
    pub(crate) toast_message: Option<(String, Instant, ToastType)>,
    /// Channel for receiving decoded files from background threads
    load_receiver: Option<Receiver<LoadResult>>,
    pub(crate) loading_state: LoadingState,
    /// Files still waiting to be decoded
    pending: VecDeque<PathBuf>,
    pub(crate) config: RenderConfig,
}

impl CurveViewerApp {
    pub fn new(files: Vec<LoadedFile>, config: RenderConfig) -> Self {
        let selected_file = if files.is_empty() { None } else { Some(0) };
        Self {
            files,
            selected_file,
            toast_message: None,
            load_receiver: None,
            loading_state: LoadingState::Idle,
            pending: VecDeque::new(),
            config,
        }
    }

    /// Queue files for background decoding
    pub fn open_files(&mut self, paths: Vec<PathBuf>) {
        self.pending.extend(paths);
        if matches!(self.loading_state, LoadingState::Idle) {
            self.start_next_load();
        }
    }

    fn start_next_load(&mut self) {
        while let Some(path) = self.pending.pop_front() {
            // Check for duplicate
            if self.files.iter().any(|f| f.path == path) {
                self.show_toast_warning("File already loaded");
                continue;
            }

            self.loading_state = LoadingState::Loading(display_name(&path));

            let (sender, receiver): (Sender<LoadResult>, Receiver<LoadResult>) = channel();
            self.load_receiver = Some(receiver);

            // Spawn background thread for loading
            thread::spawn(move || {
                let result = Self::load_file_sync(path);
                let _ = sender.send(result);
            });
            return;
        }
        self.loading_state = LoadingState::Idle;
    }

    /// Synchronously decode a file (runs in background thread)
    fn load_file_sync(path: PathBuf) -> LoadResult {
        match CurveTracer::load(&path) {
            Ok(dataset) => LoadResult::Success(Box::new(LoadedFile::new(path, dataset))),
            Err(e) => LoadResult::Error(format!("{}: {}", display_name(&path), e)),
        }
    }

    /// Check for completed background loads
    fn check_loading_complete(&mut self) {
        let Some(receiver) = &self.load_receiver else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };

        match result {
            LoadResult::Success(file) => {
                tracing::info!("Loaded {} ({} traces)", file.name, file.dataset.traces.len());
                self.files.push(*file);
                self.selected_file = Some(self.files.len() - 1);
                self.show_toast_success("File loaded successfully");
            }
            LoadResult::Error(e) => {
                tracing::warn!("{}", e);
                self.show_toast_error(&e);
            }
        }
        self.load_receiver = None;
        self.start_next_load();
    }

    /// Remove a loaded file
    pub(crate) fn remove_file(&mut self, index: usize) {
        if index >= self.files.len() {
            return;
        }
        self.files.remove(index);

        if let Some(selected) = self.selected_file {
            if selected == index {
                self.selected_file = if self.files.is_empty() { None } else { Some(0) };
            } else if selected > index {
                self.selected_file = Some(selected - 1);
            }
        }
    }

    pub(crate) fn selected(&self) -> Option<&LoadedFile> {
        self.selected_file.and_then(|i| self.files.get(i))
    }

    pub(crate) fn is_loading(&self) -> bool {
        matches!(self.loading_state, LoadingState::Loading(_))
    }

    fn show_toast(&mut self, message: &str, toast_type: ToastType) {
        self.toast_message = Some((message.to_string(), Instant::now(), toast_type));
    }

    pub(crate) fn show_toast_success(&mut self, message: &str) {
        self.show_toast(message, ToastType::Success);
    }

    pub(crate) fn show_toast_warning(&mut self, message: &str) {
        self.show_toast(message, ToastType::Warning);
    }

    pub(crate) fn show_toast_error(&mut self, message: &str) {
        self.show_toast(message, ToastType::Error);
    }
}

impl eframe::App for CurveViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_loading_complete();

        // Handle drag-and-drop
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            self.open_files(dropped);
        }

        egui::SidePanel::left("files_panel")
            .default_width(240.0)
            .show(ctx, |ui| {
                self.render_sidebar(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_chart(ui);
        });

        self.render_toast(ctx);

        if self.is_loading() || self.toast_message.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

/// Open the viewer window and block until it is closed
pub fn run_viewer(files: Vec<LoadedFile>, config: RenderConfig) -> eframe::Result<()> {
    let mut options = eframe::NativeOptions::default();
    options.viewport = egui::ViewportBuilder::default()
        .with_inner_size([config.width as f32, config.height as f32])
        .with_title("Curve Tracer Viewer");

    let app = CurveViewerApp::new(files, config);
    eframe::run_native(
        "Curve Tracer Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
