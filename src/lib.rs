//! curvetrace - decoder and exporter for curve-tracer capture files
//!
//! Captures hold a fixed binary header with per-axis scale factors and a
//! packed block of quantized (voltage, current) samples, one trace per
//! bias step. This crate decodes them into a [`CurveDataset`] and renders
//! or exports the result.
//!
//! ## Module Structure
//!
//! - [`parsers`] - Binary capture decoder and the decoded data model
//! - [`units`] - Scale prefixes and bias-axis labels
//! - [`error`] - Format, I/O and export errors
//! - [`render`] - Backend-neutral plot scenes and rasterization
//! - [`export`] - CSV, JSON, image and PDF exporters
//! - [`batch`] - Parallel multi-file processing with per-file errors
//! - [`state`] - Shared types and constants
//! - [`app`] - Interactive viewer (eframe::App implementation)
//! - [`ui`] - Viewer UI components
//!
//! ```no_run
//! use curvetrace::parsers::CurveTracer;
//!
//! let dataset = CurveTracer::load(std::path::Path::new("capture.crv"))?;
//! for trace in &dataset.traces {
//!     println!("{:?}: {} samples", trace.gate_value, trace.samples.len());
//! }
//! # Ok::<(), curvetrace::CurveError>(())
//! ```

pub mod app;
pub mod batch;
pub mod error;
pub mod export;
pub mod parsers;
pub mod render;
pub mod state;
pub mod ui;
pub mod units;

pub use error::{CurveError, Result};
pub use parsers::{CurveDataset, CurveTracer, Trace};
