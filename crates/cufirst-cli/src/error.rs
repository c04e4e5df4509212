//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

use cufirst_core::SiteError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading an input file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Site data or settings were rejected.
    #[error(transparent)]
    Site(#[from] SiteError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Creates an IO error for a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
