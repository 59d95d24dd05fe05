//! Core application state types and constants.
//!
//! This module contains the data structures shared by the viewer, the
//! batch processor and the exporters: loaded captures, load results and
//! the colour palettes used for traces.

use std::path::{Path, PathBuf};

use crate::parsers::CurveDataset;

// ============================================================================
// Constants
// ============================================================================

/// Default raster export size
pub const EXPORT_WIDTH: u32 = 1600;
pub const EXPORT_HEIGHT: u32 = 1200;

/// File extensions offered in the open dialog
pub const CAPTURE_EXTENSIONS: &[&str] = &["crv", "cur", "dat", "bin"];

/// Color palette for trace lines
pub const CHART_COLORS: &[[u8; 3]] = &[
    [113, 120, 78],  // Olive green (primary)
    [191, 78, 48],   // Rust orange (accent)
    [71, 108, 155],  // Blue (info)
    [159, 166, 119], // Sage green (success)
    [253, 193, 73],  // Amber (warning)
    [135, 30, 28],   // Dark red (error)
    [246, 247, 235], // Cream
    [100, 149, 237], // Cornflower blue
    [255, 127, 80],  // Coral
    [144, 238, 144], // Light green
];

/// Colorblind-friendly palette (based on Wong's optimized palette)
pub const COLORBLIND_COLORS: &[[u8; 3]] = &[
    [0, 114, 178],   // Blue
    [230, 159, 0],   // Orange
    [0, 158, 115],   // Bluish green
    [204, 121, 167], // Reddish purple
    [86, 180, 233],  // Sky blue
    [213, 94, 0],    // Vermillion
    [240, 228, 66],  // Yellow
    [136, 204, 238], // Light blue
    [153, 153, 153], // Gray
];

/// Pick the palette colour for a trace index
pub fn trace_color(index: usize, colorblind: bool) -> [u8; 3] {
    let palette = if colorblind {
        COLORBLIND_COLORS
    } else {
        CHART_COLORS
    };
    palette[index % palette.len()]
}

// ============================================================================
// Core Types
// ============================================================================

/// A decoded capture together with where it came from
#[derive(Clone, Debug)]
pub struct LoadedFile {
    /// Path to the original file
    pub path: PathBuf,
    /// Display name for the file
    pub name: String,
    /// Decoded curves
    pub dataset: CurveDataset,
}

impl LoadedFile {
    pub fn new(path: PathBuf, dataset: CurveDataset) -> Self {
        let name = display_name(&path);
        Self {
            path,
            name,
            dataset,
        }
    }

    /// Base name used for exported artifacts
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "capture".to_string())
    }
}

/// File name for display, falling back to "Unknown"
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Result from background file loading operation
pub enum LoadResult {
    Success(Box<LoadedFile>),
    Error(String),
}

/// Current state of file loading
pub enum LoadingState {
    /// No loading in progress
    Idle,
    /// Loading a file (contains filename being loaded)
    Loading(String),
}
