//! Error types for scenario stores.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reading scenarios.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not produce a snapshot.
    #[error("scenario store unavailable: {0}")]
    Unavailable(String),

    /// A scenario vector does not have the expected dimension.
    #[error("scenario {label:?} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        label: String,
        expected: usize,
        actual: usize,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
