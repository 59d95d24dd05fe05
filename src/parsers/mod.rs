pub mod curve_tracer;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use curve_tracer::CurveTracer;
pub use types::{CurveDataset, Header, Parseable, Sample, ScaleField, Trace};
