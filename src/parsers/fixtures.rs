//! Synthetic capture builder for tests

use super::curve_tracer::{
    capture_len, DATA_OFFSET, GATE_INITIAL_OFFSET, GATE_STEP_OFFSET, HORIZONTAL_OFFSET,
    TRACE_COUNT_OFFSET, VERTICAL_OFFSET,
};
use super::types::samples_per_trace;

pub struct CaptureBuilder {
    data: Vec<u8>,
    trace_count: u8,
}

impl CaptureBuilder {
    /// Capture with 1 V/div horizontal, 1 mA/div vertical and a 1 V
    /// gate step starting from 0 V
    pub fn new(trace_count: u8) -> Self {
        let mut data = vec![0u8; capture_len(trace_count)];
        data[TRACE_COUNT_OFFSET] = trace_count;
        Self { data, trace_count }
            .horizontal(b"1.00  ", b' ', b'V')
            .vertical(b"1.00  ", b'm', b'A')
            .gate_step(b"1.00  ", b' ', b'V')
            .gate_initial(b"0.00  ", b' ', b'V')
    }

    fn field(mut self, offset: usize, magnitude: &[u8; 6], prefix: u8, unit: u8) -> Self {
        self.data[offset..offset + 6].copy_from_slice(magnitude);
        self.data[offset + 6] = prefix;
        self.data[offset + 7] = unit;
        self
    }

    pub fn horizontal(self, magnitude: &[u8; 6], prefix: u8, unit: u8) -> Self {
        self.field(HORIZONTAL_OFFSET, magnitude, prefix, unit)
    }

    pub fn vertical(self, magnitude: &[u8; 6], prefix: u8, unit: u8) -> Self {
        self.field(VERTICAL_OFFSET, magnitude, prefix, unit)
    }

    pub fn gate_step(self, magnitude: &[u8; 6], prefix: u8, unit: u8) -> Self {
        self.field(GATE_STEP_OFFSET, magnitude, prefix, unit)
    }

    pub fn gate_initial(self, magnitude: &[u8; 6], prefix: u8, unit: u8) -> Self {
        self.field(GATE_INITIAL_OFFSET, magnitude, prefix, unit)
    }

    pub fn set_sample(&mut self, trace: usize, sample: usize, raw: [u8; 4]) {
        let per_trace = samples_per_trace(self.trace_count);
        let offset = DATA_OFFSET + (trace * per_trace + sample) * 4;
        self.data[offset..offset + 4].copy_from_slice(&raw);
    }

    /// Write raw bytes at an absolute offset, growing the buffer if needed
    pub fn set_raw(&mut self, offset: usize, bytes: &[u8]) {
        if self.data.len() < offset + bytes.len() {
            self.data.resize(offset + bytes.len(), 0);
        }
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    pub fn build(&self) -> Vec<u8> {
        self.data.clone()
    }

    /// Build with the data block padded to `block_len` bytes
    pub fn build_padded(&self, block_len: usize) -> Vec<u8> {
        let mut data = self.data.clone();
        if data.len() < DATA_OFFSET + block_len {
            data.resize(DATA_OFFSET + block_len, 0);
        }
        data
    }
}
