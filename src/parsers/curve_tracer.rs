//! Curve-tracer binary capture decoder
//!
//! Capture layout (all offsets absolute from file start):
//! - Byte 5: number of traces (bias steps), 1..=255
//! - Bytes 34, 42, 50, 58: scale fields for horizontal, vertical,
//!   bias step and bias initial value. Each is 6 ASCII digits, one
//!   prefix byte and one unit byte.
//! - Byte 128 onwards: sample block, 4 bytes per sample. The first two
//!   bytes are the big-endian horizontal reading, the last two the
//!   vertical reading, both in hundredths of a division.
//!
//! The instrument always stores 255 samples and splits them evenly
//! between traces, so `255 % trace_count` trailing samples are unused.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::types::{samples_per_trace, CurveDataset, Header, Parseable, Sample, ScaleField, Trace};
use crate::error::{FormatError, IoError, Result};
use crate::units::Prefix;

/// Bytes required to read every header field
pub const HEADER_LEN: usize = 66;

pub const TRACE_COUNT_OFFSET: usize = 5;
pub const HORIZONTAL_OFFSET: usize = 34;
pub const VERTICAL_OFFSET: usize = 42;
pub const GATE_STEP_OFFSET: usize = 50;
pub const GATE_INITIAL_OFFSET: usize = 58;

/// Start of the sample block (sixteen 8-byte header records)
pub const DATA_OFFSET: usize = 16 * 8;

const SCALE_FIELD_LEN: usize = 8;
const MAGNITUDE_LEN: usize = 6;
const SAMPLE_LEN: usize = 4;

/// Raw readings are stored in hundredths of a division
const COUNTS_PER_DIVISION: f64 = 100.0;

/// Decoder for curve-tracer capture files
pub struct CurveTracer;

impl CurveTracer {
    /// Read the 8-byte scale field at an absolute `offset`
    pub fn read_scale_field(data: &[u8], offset: usize) -> std::result::Result<ScaleField, FormatError> {
        let end = offset + SCALE_FIELD_LEN;
        let Some(record) = data.get(offset..end) else {
            return Err(FormatError::TruncatedHeader {
                needed: end,
                actual: data.len(),
            });
        };

        let text_bytes = &record[..MAGNITUDE_LEN];
        let invalid = || FormatError::InvalidNumericField {
            offset,
            text: String::from_utf8_lossy(text_bytes).into_owned(),
        };

        let text = std::str::from_utf8(text_bytes).map_err(|_| invalid())?;
        let magnitude: f64 = text
            .trim_matches(|c: char| c.is_ascii_whitespace() || c == '\0')
            .parse()
            .map_err(|_| invalid())?;
        if !magnitude.is_finite() {
            return Err(invalid());
        }

        Ok(ScaleField {
            magnitude,
            prefix: Prefix::from_byte(record[MAGNITUDE_LEN]),
            unit: record[MAGNITUDE_LEN + 1] as char,
        })
    }

    /// Parse the fixed-offset header
    pub fn parse_header(data: &[u8]) -> std::result::Result<Header, FormatError> {
        if data.len() < HEADER_LEN {
            return Err(FormatError::TruncatedHeader {
                needed: HEADER_LEN,
                actual: data.len(),
            });
        }

        let trace_count = data[TRACE_COUNT_OFFSET];
        if trace_count == 0 {
            return Err(FormatError::InvalidTraceCount);
        }

        Ok(Header {
            trace_count,
            horizontal: Self::read_scale_field(data, HORIZONTAL_OFFSET)?,
            vertical: Self::read_scale_field(data, VERTICAL_OFFSET)?,
            gate_step: Self::read_scale_field(data, GATE_STEP_OFFSET)?,
            gate_initial: Self::read_scale_field(data, GATE_INITIAL_OFFSET)?,
        })
    }

    /// Split the sample block into one trace per bias step
    pub fn decode_traces(data: &[u8], header: &Header) -> std::result::Result<Vec<Trace>, FormatError> {
        let trace_count = header.trace_count as usize;
        let per_trace = header.samples_per_trace();
        let needed = trace_count * per_trace * SAMPLE_LEN;
        let available = data.len().saturating_sub(DATA_OFFSET);

        if available < needed {
            return Err(FormatError::TruncatedData {
                offset: DATA_OFFSET,
                needed,
                available,
            });
        }

        let horizontal_scale = header.horizontal.scale();
        let vertical_scale = header.vertical.scale();
        let gate_unit = header.gate_initial.unit();

        let block = &data[DATA_OFFSET..DATA_OFFSET + needed];
        let traces = block
            .chunks_exact(per_trace * SAMPLE_LEN)
            .enumerate()
            .map(|(index, chunk)| {
                let mut samples = Vec::with_capacity(per_trace);
                for raw in chunk.chunks_exact(SAMPLE_LEN) {
                    let h = u16::from_be_bytes([raw[0], raw[1]]) as f64;
                    let v = u16::from_be_bytes([raw[2], raw[3]]) as f64;
                    samples.push(Sample {
                        voltage: h / COUNTS_PER_DIVISION * horizontal_scale,
                        current: v / COUNTS_PER_DIVISION * vertical_scale,
                    });
                }
                Trace {
                    gate_value: header.gate_value(index),
                    gate_unit: gate_unit.clone(),
                    samples,
                }
            })
            .collect();

        Ok(traces)
    }

    /// Decode a complete capture held in memory
    pub fn parse_binary(data: &[u8]) -> Result<CurveDataset> {
        let header = Self::parse_header(data)?;
        let traces = Self::decode_traces(data, &header)?;

        debug!(
            "Decoded capture: {} traces x {} samples, horizontal {} {}/div, vertical {} {}/div",
            traces.len(),
            header.samples_per_trace(),
            header.horizontal.magnitude,
            header.horizontal.display_unit(),
            header.vertical.magnitude,
            header.vertical.display_unit(),
        );

        Ok(CurveDataset {
            traces,
            horizontal_scale: header.horizontal.scale(),
            vertical_scale: header.vertical.scale(),
            bias: header.bias_kind(),
        })
    }

    /// Read and decode a capture file. The file is read in one go and
    /// closed before decoding starts.
    pub fn load(path: &Path) -> Result<CurveDataset> {
        let data = fs::read(path).map_err(|e| IoError::from_io(path, e))?;
        Self::parse_binary(&data)
    }
}

impl Parseable for CurveTracer {
    fn parse(&self, data: &[u8]) -> Result<CurveDataset> {
        Self::parse_binary(data)
    }
}

/// Expected total capture size for a given trace count
pub fn capture_len(trace_count: u8) -> usize {
    DATA_OFFSET + trace_count as usize * samples_per_trace(trace_count) * SAMPLE_LEN
}
