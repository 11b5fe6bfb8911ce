//! Error types for transcript handling.

use thiserror::Error;

/// Result type alias for transcript operations.
pub type Result<T> = std::result::Result<T, TranscriptError>;

/// Errors that can occur while feeding transcript events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    /// The debounce task has stopped.
    #[error("debounce scheduler closed")]
    SchedulerClosed,
}
