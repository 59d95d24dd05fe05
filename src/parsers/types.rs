use serde::Serialize;

use crate::error::Result;
use crate::units::{BiasKind, Prefix};

/// Header sub-record: numeric magnitude, scale prefix and unit
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScaleField {
    pub magnitude: f64,
    pub prefix: Prefix,
    pub unit: char,
}

impl ScaleField {
    /// Physical scale factor (magnitude with the prefix applied)
    pub fn scale(&self) -> f64 {
        self.magnitude * self.prefix.multiplier()
    }

    /// Unit character as text, or empty when the instrument left it blank
    pub fn unit(&self) -> String {
        if self.is_blank() {
            String::new()
        } else {
            self.unit.to_string()
        }
    }

    /// Prefixed unit as printed on the instrument, e.g. `mV`
    pub fn display_unit(&self) -> String {
        format!("{}{}", self.prefix.symbol(), self.unit())
    }

    /// True when the unit byte carries no information (NUL or space)
    pub fn is_blank(&self) -> bool {
        self.unit == '\0' || self.unit == ' '
    }
}

/// Fixed-layout capture header
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Header {
    pub trace_count: u8,
    pub horizontal: ScaleField,
    pub vertical: ScaleField,
    pub gate_step: ScaleField,
    pub gate_initial: ScaleField,
}

impl Header {
    /// Samples each trace holds out of the instrument's 255-sample budget
    pub fn samples_per_trace(&self) -> usize {
        samples_per_trace(self.trace_count)
    }

    /// Bias value for the trace at `index`, if the capture has a bias axis
    pub fn gate_value(&self, index: usize) -> Option<f64> {
        if self.gate_initial.is_blank() {
            return None;
        }
        Some(self.gate_initial.scale() + self.gate_step.scale() * index as f64)
    }

    pub fn bias_kind(&self) -> BiasKind {
        BiasKind::from_unit(&self.gate_initial.unit())
    }
}

/// Number of samples per trace for a given trace count.
///
/// The instrument always records 255 samples; when they do not divide
/// evenly the remainder is left unused.
pub fn samples_per_trace(trace_count: u8) -> usize {
    if trace_count == 0 {
        return 0;
    }
    255 / trace_count as usize
}

/// One (voltage, current) point
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Sample {
    pub voltage: f64,
    pub current: f64,
}

/// Sweep captured at one bias step
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trace {
    pub gate_value: Option<f64>,
    pub gate_unit: String,
    pub samples: Vec<Sample>,
}

impl Trace {
    pub fn voltages(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.voltage)
    }

    pub fn currents(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.current)
    }
}

/// Decoded capture: all traces plus the axis scales needed to plot them
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CurveDataset {
    pub traces: Vec<Trace>,
    pub horizontal_scale: f64,
    pub vertical_scale: f64,
    pub bias: BiasKind,
}

impl CurveDataset {
    /// True when at least one trace carries a bias value
    pub fn has_gate_values(&self) -> bool {
        self.traces.iter().any(|t| t.gate_value.is_some())
    }

    /// Fixed plot window: ten divisions per axis
    pub fn axis_range(&self) -> ([f64; 2], [f64; 2]) {
        (
            [0.0, 10.0 * self.horizontal_scale],
            [0.0, 10.0 * self.vertical_scale],
        )
    }

    pub fn sample_count(&self) -> usize {
        self.traces.iter().map(|t| t.samples.len()).sum()
    }
}

/// Trait for capture decoders
pub trait Parseable {
    fn parse(&self, data: &[u8]) -> Result<CurveDataset>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(magnitude: f64, prefix: Prefix, unit: char) -> ScaleField {
        ScaleField {
            magnitude,
            prefix,
            unit,
        }
    }

    #[test]
    fn test_samples_per_trace_budget() {
        for n in 1..=255u8 {
            let per_trace = samples_per_trace(n);
            assert_eq!(per_trace, 255 / n as usize);
            assert!(per_trace * n as usize <= 255);
        }
        assert_eq!(samples_per_trace(1), 255);
        assert_eq!(samples_per_trace(2), 127);
        assert_eq!(samples_per_trace(10), 25);
        assert_eq!(samples_per_trace(255), 1);
    }

    #[test]
    fn test_scale_field_units() {
        let f = field(2.0, Prefix::Milli, 'V');
        assert!((f.scale() - 0.002).abs() < 1e-15);
        assert_eq!(f.unit(), "V");
        assert_eq!(f.display_unit(), "mV");

        let blank = field(0.0, Prefix::None, '\0');
        assert!(blank.is_blank());
        assert_eq!(blank.unit(), "");
    }

    #[test]
    fn test_header_gate_values() {
        let header = Header {
            trace_count: 4,
            horizontal: field(1.0, Prefix::None, 'V'),
            vertical: field(1.0, Prefix::Milli, 'A'),
            gate_step: field(0.5, Prefix::None, 'V'),
            gate_initial: field(1.0, Prefix::None, 'V'),
        };
        assert_eq!(header.gate_value(0), Some(1.0));
        assert_eq!(header.gate_value(3), Some(2.5));
        assert_eq!(header.bias_kind(), BiasKind::GateVoltage);

        let no_bias = Header {
            gate_initial: field(0.0, Prefix::None, ' '),
            ..header
        };
        assert_eq!(no_bias.gate_value(0), None);
        assert_eq!(no_bias.bias_kind(), BiasKind::BaseCurrent);
    }
}
