//! Error types for suggestion generation.

use thiserror::Error;

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors a suggestion generator can report.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// The generator cannot be reached or is not configured.
    #[error("generator unavailable: {0}")]
    Unavailable(String),

    /// The generator did not answer in time.
    #[error("generator timed out")]
    Timeout,

    /// The generator declined to answer.
    #[error("generator refused: {0}")]
    Refused(String),

    /// The generator answered with something that is not a suggestion set.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl GeneratorError {
    /// Classify a transport failure.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Unavailable(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}
