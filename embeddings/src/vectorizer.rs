//! Text → unit-length vector conversion.

use std::sync::Arc;

use tracing::debug;

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::provider::{EmbeddingProvider, EmbeddingRequest};
use crate::similarity::{magnitude, normalize};

/// Wraps an [`EmbeddingProvider`] and guarantees every vector it hands out
/// has the run's fixed dimension and unit length.
///
/// Any failure surfaces as [`EmbeddingError::Unavailable`] so callers can
/// treat vectorization as a single recoverable step. Cloning is cheap and
/// clones share the provider.
#[derive(Clone)]
pub struct Vectorizer {
    provider: Arc<dyn EmbeddingProvider>,
    dimension: usize,
}

impl Vectorizer {
    /// Create a vectorizer whose dimension is the provider's declared one.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        let dimension = provider.default_dimension();
        Self {
            provider,
            dimension,
        }
    }

    /// The dimension `D` shared by every vector in this run.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Embed `text` into a normalized vector.
    pub async fn embed(&self, text: &str) -> Result<Embedding> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EmbeddingError::Unavailable("empty text".to_string()));
        }

        if !self.provider.is_available() {
            return Err(EmbeddingError::Unavailable(format!(
                "provider {} is not available",
                self.provider.name()
            )));
        }

        let response = self
            .provider
            .embed(EmbeddingRequest::new(text))
            .await
            .map_err(|e| match e {
                EmbeddingError::Unavailable(reason) => EmbeddingError::Unavailable(reason),
                other => EmbeddingError::Unavailable(other.to_string()),
            })?;

        let mut embedding = response.embedding;
        if embedding.len() != self.dimension {
            return Err(EmbeddingError::Unavailable(
                EmbeddingError::DimensionMismatch {
                    expected: self.dimension,
                    actual: embedding.len(),
                }
                .to_string(),
            ));
        }

        if embedding.iter().any(|x| !x.is_finite()) || magnitude(&embedding) == 0.0 {
            return Err(EmbeddingError::Unavailable(
                "provider returned a degenerate vector".to_string(),
            ));
        }

        normalize(&mut embedding);
        debug!(
            provider = self.provider.name(),
            dimension = self.dimension,
            "Vectorized text"
        );
        Ok(embedding)
    }
}
