//! # Embeddings
//!
//! Text embeddings and similarity math for SignConnect scenario retrieval.
//!
//! ## Features
//!
//! - **Embedding Generation**: Convert text to dense vectors through a pluggable provider
//! - **Vectorizer**: Validated, normalized, cached text → vector conversion
//! - **Similarity**: Cosine similarity with zero-norm guarding and ranking helpers
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings                                   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider ──► CachedProvider ──► Vectorizer            │
//! │       │                      │               │                  │
//! │       ▼                      ▼               ▼                  │
//! │  OpenAI-compatible     EmbeddingCache    Embedding (unit norm)  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod error;
pub mod provider;
pub mod similarity;
pub mod vectorizer;

pub use cache::{CachedProvider, EmbeddingCache};
pub use error::{EmbeddingError, Result};
pub use provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, OpenAIProvider};
pub use similarity::{cosine_similarity, normalize};
pub use vectorizer::Vectorizer;

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension of embeddings (varies by model).
pub const DEFAULT_DIMENSION: usize = 1536; // OpenAI text-embedding-3-small
