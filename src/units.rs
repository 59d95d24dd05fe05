//! Scale prefixes and bias-axis labelling.
//!
//! The instrument writes each axis scale as a magnitude followed by a
//! single prefix byte and a single unit byte. Only milli and kilo are
//! recognised; any other prefix byte is treated as no prefix.

use serde::Serialize;

/// SI-like prefix attached to a header scale field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Prefix {
    Milli,
    Kilo,
    #[default]
    None,
}

impl Prefix {
    /// Interpret the raw prefix byte. Unknown bytes fall back to `None`.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b'm' => Prefix::Milli,
            b'k' => Prefix::Kilo,
            _ => Prefix::None,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            Prefix::Milli => 1e-3,
            Prefix::Kilo => 1e3,
            Prefix::None => 1.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Prefix::Milli => "m",
            Prefix::Kilo => "k",
            Prefix::None => "",
        }
    }
}

/// Which quantity the instrument stepped between traces
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum BiasKind {
    /// Gate-source voltage stepping (FETs)
    #[default]
    GateVoltage,
    /// Base current stepping (BJTs)
    BaseCurrent,
}

impl BiasKind {
    /// Classify the bias axis from its unit text.
    ///
    /// Anything ending in `V` is a voltage step; everything else is
    /// treated as base current.
    pub fn from_unit(unit: &str) -> Self {
        if unit.ends_with('V') {
            BiasKind::GateVoltage
        } else {
            BiasKind::BaseCurrent
        }
    }

    /// Section header used in CSV exports
    pub fn label(&self) -> &'static str {
        match self {
            BiasKind::GateVoltage => "[Vgs]",
            BiasKind::BaseCurrent => "[Ib]",
        }
    }

    /// Short name used in legends
    pub fn symbol(&self) -> &'static str {
        match self {
            BiasKind::GateVoltage => "Vgs",
            BiasKind::BaseCurrent => "Ib",
        }
    }
}

/// Format a value in engineering notation with a unit, e.g. `2.5 mA`
pub fn format_engineering(value: f64, unit: &str) -> String {
    let magnitude = value.abs();
    let (scaled, prefix) = if magnitude == 0.0 {
        (value, "")
    } else if magnitude >= 1e3 {
        (value / 1e3, "k")
    } else if magnitude >= 1.0 {
        (value, "")
    } else if magnitude >= 1e-3 {
        (value * 1e3, "m")
    } else if magnitude >= 1e-6 {
        (value * 1e6, "µ")
    } else {
        (value * 1e9, "n")
    };

    let text = format!("{:.3}", scaled);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if unit.is_empty() && prefix.is_empty() {
        text.to_string()
    } else {
        format!("{} {}{}", text, prefix, unit)
    }
}
