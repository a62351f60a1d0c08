//! Error types for annotation report generation.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors that can occur while loading inputs or producing the report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// An input file was named but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file was read but its content is not valid for its format.
    #[error("failed to parse {format} file {path}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    /// An output file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The renderer executable could not be started.
    #[error("failed to start renderer {program}: {source}")]
    RenderSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The renderer ran but reported failure.
    #[error("renderer exited with {status}: {stderr}")]
    RenderFailed { status: ExitStatus, stderr: String },
}

impl ReportError {
    pub(crate) fn parse(
        path: impl Into<PathBuf>,
        format: &'static str,
        message: impl Into<String>,
    ) -> Self {
        ReportError::Parse {
            path: path.into(),
            format,
            message: message.into(),
        }
    }
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
