//! CSV export of decoded curves.
//!
//! Layout, one section after another:
//! - `[Vgs]` or `[Ib]`, then a row with each trace's bias value followed
//!   by a blank cell, so each bias value sits above its voltage column.
//!   Omitted entirely when the capture has no bias values.
//! - `[Data]`, then one row per sample index with the voltage and
//!   current of every trace side by side.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{ExportError, Result};
use crate::parsers::CurveDataset;

/// Write the CSV representation of `dataset` to any writer
pub fn write_csv_to<W: Write>(dataset: &CurveDataset, writer: W) -> ::csv::Result<()> {
    let mut writer = ::csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);

    if dataset.has_gate_values() {
        writer.write_record([dataset.bias.label()])?;
        let row: Vec<String> = dataset
            .traces
            .iter()
            .flat_map(|t| [t.gate_value.map(format_value).unwrap_or_default(), String::new()])
            .collect();
        writer.write_record(&row)?;
    }

    writer.write_record(["[Data]"])?;
    let rows = dataset
        .traces
        .iter()
        .map(|t| t.samples.len())
        .max()
        .unwrap_or(0);
    for index in 0..rows {
        let row: Vec<String> = dataset
            .traces
            .iter()
            .flat_map(|t| match t.samples.get(index) {
                Some(s) => [format_value(s.voltage), format_value(s.current)],
                None => [String::new(), String::new()],
            })
            .collect();
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the CSV export to `path`
pub fn write_csv(dataset: &CurveDataset, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| ExportError::write_failed(path, e))?;
    write_csv_to(dataset, file).map_err(|e| ExportError::write_failed(path, e))?;
    Ok(())
}

fn format_value(value: f64) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{Sample, Trace};
    use crate::units::BiasKind;

    fn trace(gate: Option<f64>, samples: &[(f64, f64)]) -> Trace {
        Trace {
            gate_value: gate,
            gate_unit: "V".to_string(),
            samples: samples
                .iter()
                .map(|&(voltage, current)| Sample { voltage, current })
                .collect(),
        }
    }

    fn render(dataset: &CurveDataset) -> String {
        let mut out = Vec::new();
        write_csv_to(dataset, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_csv_with_gate_values() {
        let dataset = CurveDataset {
            traces: vec![
                trace(Some(0.0), &[(0.001, 0.0005), (0.002, 0.001)]),
                trace(Some(1.5), &[(0.003, 0.25), (0.004, 0.5)]),
            ],
            horizontal_scale: 0.001,
            vertical_scale: 0.001,
            bias: BiasKind::GateVoltage,
        };

        let expected = "[Vgs]\n\
                        0,,1.5,\n\
                        [Data]\n\
                        0.001,0.0005,0.003,0.25\n\
                        0.002,0.001,0.004,0.5\n";
        assert_eq!(render(&dataset), expected);
    }

    #[test]
    fn test_csv_base_current_label() {
        let dataset = CurveDataset {
            traces: vec![trace(Some(0.01), &[(1.0, 2.0)])],
            horizontal_scale: 1.0,
            vertical_scale: 1.0,
            bias: BiasKind::BaseCurrent,
        };
        let out = render(&dataset);
        assert!(out.starts_with("[Ib]\n0.01,\n[Data]\n"));
    }

    #[test]
    fn test_csv_without_gate_values() {
        let dataset = CurveDataset {
            traces: vec![trace(None, &[(1.0, 2.0)]), trace(None, &[(3.0, 4.0)])],
            horizontal_scale: 1.0,
            vertical_scale: 1.0,
            bias: BiasKind::BaseCurrent,
        };
        let out = render(&dataset);
        assert_eq!(out, "[Data]\n1,2,3,4\n");
        assert!(!out.contains("[Vgs]"));
        assert!(!out.contains("[Ib]"));
    }

    #[test]
    fn test_csv_never_writes_nan() {
        let dataset = CurveDataset {
            traces: vec![trace(Some(2.0), &[(1.0, 2.0)]), trace(Some(3.0), &[])],
            horizontal_scale: 1.0,
            vertical_scale: 1.0,
            bias: BiasKind::GateVoltage,
        };
        let out = render(&dataset);
        assert_eq!(out, "[Vgs]\n2,,3,\n[Data]\n1,2,,\n");
        assert!(!out.to_lowercase().contains("nan"));
    }

    #[test]
    fn test_write_csv_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.csv");
        let dataset = CurveDataset {
            traces: vec![trace(Some(0.0), &[(1.0, 2.0)])],
            horizontal_scale: 1.0,
            vertical_scale: 1.0,
            bias: BiasKind::GateVoltage,
        };
        write_csv(&dataset, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[Data]"));
    }

    #[test]
    fn test_write_csv_to_missing_directory() {
        let dataset = CurveDataset {
            traces: vec![],
            horizontal_scale: 1.0,
            vertical_scale: 1.0,
            bias: BiasKind::GateVoltage,
        };
        let err = write_csv(&dataset, Path::new("/nonexistent/dir/out.csv")).unwrap_err();
        assert!(matches!(
            err,
            crate::error::CurveError::Export(ExportError::WriteFailed { .. })
        ));
    }
}
