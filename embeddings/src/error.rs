//! Error types for the embeddings system.

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur while turning text into vectors.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// No usable vector for this text: empty input, unsupported language,
    /// or the capability is not loaded. [`crate::Vectorizer`] reports every
    /// failure this way.
    #[error("embedding unavailable: {0}")]
    Unavailable(String),

    /// No API key for the provider.
    #[error("embedding provider not configured")]
    ProviderNotConfigured,

    /// The provider answered with an error status.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The provider answered without a usable embedding.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The provider asked us to back off.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Two vectors of different length were compared.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Transport failure talking to the provider.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
