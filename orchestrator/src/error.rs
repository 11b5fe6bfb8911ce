//! Error types for the orchestrator.
//!
//! These are the errors the UI sees in [`crate::OrchestratorState::last_error`].
//! None of them is fatal; each one means "no update this round".

use signconnect_embeddings::EmbeddingError;
use signconnect_scenarios::StoreError;
use signconnect_suggestions::GeneratorError;
use thiserror::Error;

/// Result type alias for orchestrator operations.
pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// A recoverable failure of one orchestration pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    /// The transcript could not be embedded.
    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// The suggestion generator could not be reached or answered badly.
    #[error("suggestion generator unavailable: {0}")]
    GeneratorUnavailable(String),

    /// The suggestion generator did not answer in time.
    #[error("suggestion generator timed out")]
    GeneratorTimeout,

    /// The suggestion generator declined to answer.
    #[error("suggestion generator refused: {0}")]
    GeneratorRefused(String),

    /// The scenario store could not be read; matching ran with no candidates.
    #[error("scenario store unavailable: {0}")]
    StoreUnavailable(String),

    /// The orchestrator has been shut down.
    #[error("orchestrator closed")]
    Closed,
}

impl From<EmbeddingError> for OrchestratorError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::Unavailable(reason) => Self::EmbeddingUnavailable(reason),
            other => Self::EmbeddingUnavailable(other.to_string()),
        }
    }
}

impl From<GeneratorError> for OrchestratorError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::Timeout => Self::GeneratorTimeout,
            GeneratorError::Refused(reason) => Self::GeneratorRefused(reason),
            GeneratorError::Unavailable(reason) => Self::GeneratorUnavailable(reason),
            other => Self::GeneratorUnavailable(other.to_string()),
        }
    }
}

impl From<StoreError> for OrchestratorError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(reason) => Self::StoreUnavailable(reason),
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}
