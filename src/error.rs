//! Error types for decoding and exporting curve-tracer captures.
//!
//! Errors fall into three families. Format errors come from the binary
//! layout, I/O errors from opening the capture, and export errors from
//! writing any output artifact.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, CurveError>;

/// Problems with the binary layout of a capture file
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormatError {
    #[error("invalid numeric field at offset {offset}: {text:?}")]
    InvalidNumericField { offset: usize, text: String },

    #[error("trace count must be non-zero")]
    InvalidTraceCount,

    #[error("header truncated: need {needed} bytes, file has {actual}")]
    TruncatedHeader { needed: usize, actual: usize },

    #[error("data block truncated: need {needed} bytes after offset {offset}, have {available}")]
    TruncatedData {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

/// Problems opening or reading a capture file
#[derive(Debug, Error)]
pub enum IoError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("unable to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl IoError {
    /// Classify a `std::io::Error` raised while reading `path`
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => IoError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => IoError::PermissionDenied(path.to_path_buf()),
            _ => IoError::Unreadable {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// Problems producing an output artifact
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to write {}: {message}", path.display())]
    WriteFailed { path: PathBuf, message: String },
}

impl ExportError {
    pub fn write_failed(path: &Path, err: impl std::fmt::Display) -> Self {
        ExportError::WriteFailed {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Top-level error for a single file's decode or export
#[derive(Debug, Error)]
pub enum CurveError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_classification() {
        let path = Path::new("missing.crv");

        let err = IoError::from_io(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, IoError::NotFound(_)));

        let err = IoError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, IoError::PermissionDenied(_)));

        let err = IoError::from_io(path, io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(matches!(err, IoError::Unreadable { .. }));
    }

    #[test]
    fn test_error_messages() {
        let err: CurveError = FormatError::TruncatedHeader {
            needed: 66,
            actual: 10,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "header truncated: need 66 bytes, file has 10"
        );

        let err: CurveError = ExportError::UnsupportedFormat("gif".into()).into();
        assert_eq!(err.to_string(), "unsupported output format: gif");
    }
}
