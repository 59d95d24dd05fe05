use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::{ArgAction, Parser, ValueHint};
use tracing::info;
use tracing_subscriber::EnvFilter;

use curvetrace::app::run_viewer;
use curvetrace::batch::{partition, process_batch, summarize};
use curvetrace::export::{ImageFormat, OutputMode};
use curvetrace::render::RenderConfig;
use curvetrace::state::{CAPTURE_EXTENSIONS, EXPORT_HEIGHT, EXPORT_WIDTH};

#[derive(Parser, Debug)]
#[command(name = "curvetrace", version)]
#[command(about = "Decode curve-tracer captures and plot or export them", long_about = None)]
struct Cli {
    /// Capture files to process (opens a file dialog when omitted)
    #[arg(value_hint = ValueHint::FilePath)]
    paths: Vec<PathBuf>,

    /// Output mode: plot, csv, json, none, or an image format (png, jpeg, bmp, tiff, pdf)
    #[arg(short, long, default_value = "plot")]
    mode: OutputMode,

    /// Directory for exported files (defaults to each capture's directory)
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    out_dir: Option<PathBuf>,

    /// Render plots off-screen to PNG instead of opening a window
    #[arg(long)]
    hidden: bool,

    /// Use the colorblind-friendly trace palette
    #[arg(long)]
    colorblind: bool,

    /// Figure width in pixels
    #[arg(long, default_value_t = EXPORT_WIDTH)]
    width: u32,

    /// Figure height in pixels
    #[arg(long, default_value_t = EXPORT_HEIGHT)]
    height: u32,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn pick_files() -> Option<Vec<PathBuf>> {
    rfd::FileDialog::new()
        .add_filter("Curve Tracer Captures", CAPTURE_EXTENSIONS)
        .add_filter("All Files", &["*"])
        .pick_files()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = if cli.paths.is_empty() {
        match pick_files() {
            Some(paths) if !paths.is_empty() => paths,
            _ => {
                info!("No files selected");
                return Ok(());
            }
        }
    } else {
        cli.paths
    };

    let config = RenderConfig {
        visible: !cli.hidden,
        width: cli.width,
        height: cli.height,
        colorblind: cli.colorblind,
    };

    // A hidden plot has nowhere to go but a file
    let mode = match cli.mode {
        OutputMode::Plot if !config.visible => OutputMode::Image(ImageFormat::Png),
        mode => mode,
    };

    if mode.writes_files() {
        match cli.out_dir.as_deref() {
            Some(dir) => info!("Writing exports to {}", dir.display()),
            None => info!("Writing exports next to each capture"),
        }
    }

    let outcomes = process_batch(&paths, mode, cli.out_dir.as_deref(), &config);
    let summary = summarize(&outcomes);
    info!(
        "Processed {} file(s): {} succeeded, {} failed",
        outcomes.len(),
        summary.succeeded,
        summary.failed
    );

    let (files, errors) = partition(outcomes);

    if mode == OutputMode::Plot && !files.is_empty() {
        run_viewer(files, config).map_err(|e| anyhow!("viewer failed: {}", e))?;
    }

    // Individual failures were already logged by the batch
    if !errors.is_empty() {
        bail!("{} of {} file(s) failed", errors.len(), paths.len());
    }

    Ok(())
}
