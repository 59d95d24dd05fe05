//! UI rendering modules for the capture viewer.
//!
//! - `sidebar` - Captures panel, view options and export buttons
//! - `chart` - Curve chart with fixed axes and legend
//! - `export` - Save dialogs for CSV, image and PDF exports
//! - `toast` - Toast notification system

pub mod chart;
pub mod export;
pub mod sidebar;
pub mod toast;
