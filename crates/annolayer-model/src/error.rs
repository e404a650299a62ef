//! Error types for the layer model.

use thiserror::Error;

use crate::ids::LayerId;

/// Errors raised while building records and sequences.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Two records in one file share an identifier.
    #[error("duplicate layer id {id} (layers '{first}' and '{second}')")]
    DuplicateLayerId {
        id: LayerId,
        first: String,
        second: String,
    },

    /// No identifier is left above the highest one in the file.
    #[error("no layer id available after {last}")]
    LayerIdExhausted { last: LayerId },

    /// Swap configuration with unequal name and position lists.
    #[error("{names} layer names but {positions} positions; the lists must have the same length")]
    SwapLengthMismatch { names: usize, positions: usize },

    /// Schema construction failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Configuration errors in a target schema.
///
/// These are fatal and reported before any file is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The schema has no slots.
    #[error("schema must contain at least one slot")]
    Empty,

    /// A slot has no alias names.
    #[error("slot {index} has no alias names")]
    EmptySlot { index: usize },

    /// An alias is accepted by more than one slot after normalization.
    #[error("alias '{alias}' is accepted by both slot {first} and slot {second}")]
    OverlappingAlias {
        alias: String,
        first: usize,
        second: usize,
    },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
