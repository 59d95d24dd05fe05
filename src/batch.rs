//! Multi-file processing.
//!
//! Each capture is decoded and exported independently on the rayon pool.
//! A failure in one file never affects its siblings; every file gets its
//! own [`FileOutcome`], returned in input order.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{CurveError, Result};
use crate::export::{export_file, OutputMode};
use crate::parsers::CurveTracer;
use crate::render::RenderConfig;
use crate::state::LoadedFile;

/// Result of processing one input path
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<Processed>,
}

/// A successfully decoded (and possibly exported) capture
#[derive(Debug)]
pub struct Processed {
    pub file: LoadedFile,
    /// Artifact written for this capture, if the mode writes files
    pub artifact: Option<PathBuf>,
}

/// Summary counts for a finished batch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Where artifacts for `path` go when no explicit output directory is given
fn default_out_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Decode and export a single capture
pub fn process_file(
    path: &Path,
    mode: OutputMode,
    out_dir: Option<&Path>,
    config: &RenderConfig,
) -> Result<Processed> {
    let dataset = CurveTracer::load(path)?;
    let file = LoadedFile::new(path.to_path_buf(), dataset);

    let dir = out_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_out_dir(path));
    let artifact = export_file(&file, mode, &dir, config)?;

    Ok(Processed { file, artifact })
}

/// Process every path in parallel. Outcomes are returned in input order.
pub fn process_batch(
    paths: &[PathBuf],
    mode: OutputMode,
    out_dir: Option<&Path>,
    config: &RenderConfig,
) -> Vec<FileOutcome> {
    paths
        .par_iter()
        .map(|path| {
            let result = process_file(path, mode, out_dir, config);
            match &result {
                Ok(processed) => {
                    let dataset = &processed.file.dataset;
                    match &processed.artifact {
                        Some(artifact) => info!(
                            "{}: {} traces -> {}",
                            processed.file.name,
                            dataset.traces.len(),
                            artifact.display()
                        ),
                        None => info!(
                            "{}: {} traces, {} samples",
                            processed.file.name,
                            dataset.traces.len(),
                            dataset.sample_count()
                        ),
                    }
                }
                Err(e) => warn!("{}: {}", path.display(), e),
            }
            FileOutcome {
                path: path.clone(),
                result,
            }
        })
        .collect()
}

/// Count successes and failures
pub fn summarize(outcomes: &[FileOutcome]) -> BatchSummary {
    outcomes
        .iter()
        .fold(BatchSummary::default(), |mut summary, outcome| {
            if outcome.result.is_ok() {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
            summary
        })
}

/// Split outcomes into decoded files and per-path errors
pub fn partition(outcomes: Vec<FileOutcome>) -> (Vec<LoadedFile>, Vec<(PathBuf, CurveError)>) {
    let mut files = Vec::new();
    let mut errors = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(processed) => files.push(processed.file),
            Err(e) => errors.push((outcome.path, e)),
        }
    }
    (files, errors)
}
