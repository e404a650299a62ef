//! Error types for annotation XML operations.

use std::path::PathBuf;

use annolayer_model::ModelError;
use thiserror::Error;

/// Errors that can occur when reading or writing annotation files.
#[derive(Debug, Error)]
pub enum XmlError {
    /// Failed to read the file.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed XML.
    #[error("invalid XML at byte {position}: {message}")]
    Parse { position: u64, message: String },

    /// The document has no root element.
    #[error("document has no root element")]
    MissingRoot,

    /// The root element is not an annotation list.
    #[error("expected <{expected}> root element, found <{found}>")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },

    /// A layer lacks a required attribute.
    #[error("annotation #{index} has no {attribute} attribute")]
    MissingAttribute {
        index: usize,
        attribute: &'static str,
    },

    /// A layer identifier is not a non-negative integer.
    #[error("annotation '{name}' has invalid Id '{value}'")]
    InvalidId { name: String, value: String },

    /// Serializing the tree failed.
    #[error("failed to serialize XML: {message}")]
    Serialize { message: String },

    /// The layers violate a model invariant (e.g. duplicate ids).
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Wraps an error with the file it came from.
    #[error("{path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: Box<XmlError>,
    },
}

impl XmlError {
    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Read { .. } | Self::Write { .. } | Self::File { .. } => self,
            other => Self::File {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }
}

/// Result type for annotation XML operations.
pub type Result<T> = std::result::Result<T, XmlError>;
