//! Error types for annotation file discovery.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while locating input or preparing output folders.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create the output directory.
    #[error("failed to create output directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for discovery operations.
pub type Result<T> = std::result::Result<T, IngestError>;
