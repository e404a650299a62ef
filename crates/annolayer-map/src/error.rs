//! Error types for reassembly operations.

use annolayer_model::ModelError;
use thiserror::Error;

/// Errors from rebuilding a record sequence.
#[derive(Debug, Error)]
pub enum MapError {
    /// A match result was applied to a sequence it was not computed for.
    #[error("match result covers {expected} records but the sequence has {actual}")]
    ResultMismatch { expected: usize, actual: usize },

    /// The rebuilt sequence violated a model invariant.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for reassembly operations.
pub type Result<T> = std::result::Result<T, MapError>;
