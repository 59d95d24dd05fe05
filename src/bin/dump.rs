use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use curvetrace::parsers::curve_tracer::CurveTracer;
use curvetrace::units::format_engineering;

/// Print the header and first samples of a curve-tracer capture
#[derive(Parser, Debug)]
#[command(name = "curvetrace-dump", version)]
struct Args {
    /// Capture file to inspect
    path: PathBuf,

    /// Number of samples to print per trace
    #[arg(short, long, default_value_t = 5)]
    samples: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_writer(std::io::stderr)
        .try_init();

    let data = std::fs::read(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    println!("Reading file: {}", args.path.display());
    println!("File size: {} bytes", data.len());

    let header = CurveTracer::parse_header(&data)?;
    println!("\n=== Header ===");
    println!("Traces: {}", header.trace_count);
    println!("Samples per trace: {}", header.samples_per_trace());
    for (name, field) in [
        ("Horizontal", &header.horizontal),
        ("Vertical", &header.vertical),
        ("Gate step", &header.gate_step),
        ("Gate initial", &header.gate_initial),
    ] {
        println!(
            "  {:<12} {:>8} {:<3} (scale {:e})",
            name,
            field.magnitude,
            field.display_unit(),
            field.scale()
        );
    }
    println!("Bias axis: {}", header.bias_kind().label());

    let traces = CurveTracer::decode_traces(&data, &header)?;
    println!("\n=== Traces (first {} samples) ===", args.samples);
    for (i, trace) in traces.iter().enumerate() {
        let gate = trace
            .gate_value
            .map(|g| format_engineering(g, &trace.gate_unit))
            .unwrap_or_else(|| "-".to_string());
        println!("  [{:3}] gate {}", i, gate);
        for sample in trace.samples.iter().take(args.samples) {
            println!(
                "        {:>12} {:>12}",
                format_engineering(sample.voltage, "V"),
                format_engineering(sample.current, "A")
            );
        }
    }

    Ok(())
}
