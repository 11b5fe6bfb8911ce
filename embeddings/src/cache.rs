//! Embedding cache.
//!
//! Live transcripts often settle on the same text more than once (a partner
//! repeating a question, a recognizer re-emitting a final result), so the
//! vectors are kept in a small bounded in-memory cache keyed by text and model.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::Embedding;
use crate::error::Result;
use crate::provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};

/// Cache entry for an embedding.
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The embedding vector.
    embedding: Embedding,

    /// Insertion order, used for eviction.
    inserted: u64,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    next_insert: u64,
}

/// Cache for embeddings to avoid redundant provider calls.
#[derive(Clone)]
pub struct EmbeddingCache {
    inner: Arc<RwLock<CacheInner>>,

    /// Maximum cache size.
    max_entries: usize,
}

impl EmbeddingCache {
    /// Create a new in-memory cache.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner::default())),
            max_entries,
        }
    }

    /// Key for a text under a model. Models never contain NUL.
    fn cache_key(text: &str, model: &str) -> String {
        format!("{model}\0{text}")
    }

    /// Get an embedding from the cache.
    pub async fn get(&self, text: &str, model: &str) -> Option<Embedding> {
        let key = Self::cache_key(text, model);
        let inner = self.inner.read().await;
        inner.entries.get(&key).map(|e| e.embedding.clone())
    }

    /// Put an embedding in the cache, evicting the oldest entry when full.
    pub async fn put(&self, text: &str, model: &str, embedding: Embedding) {
        if self.max_entries == 0 {
            return;
        }

        let key = Self::cache_key(text, model);
        let mut inner = self.inner.write().await;

        if inner.entries.len() >= self.max_entries && !inner.entries.contains_key(&key) {
            let oldest_key = inner
                .entries
                .iter()
                .min_by_key(|(_, v)| v.inserted)
                .map(|(k, _)| k.clone());
            if let Some(oldest_key) = oldest_key {
                inner.entries.remove(&oldest_key);
            }
        }

        let inserted = inner.next_insert;
        inner.next_insert += 1;
        inner.entries.insert(
            key,
            CacheEntry {
                embedding,
                inserted,
            },
        );
        debug!("Cached embedding for text (model: {model})");
    }
}

/// A provider wrapper that serves repeated texts from an [`EmbeddingCache`].
pub struct CachedProvider<P> {
    provider: P,
    cache: EmbeddingCache,
}

impl<P> CachedProvider<P>
where
    P: EmbeddingProvider,
{
    /// Create a new cached provider.
    pub fn new(provider: P, cache: EmbeddingCache) -> Self {
        Self { provider, cache }
    }
}

#[async_trait]
impl<P> EmbeddingProvider for CachedProvider<P>
where
    P: EmbeddingProvider,
{
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn default_model(&self) -> &str {
        self.provider.default_model()
    }

    fn default_dimension(&self) -> usize {
        self.provider.default_dimension()
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string());

        if let Some(embedding) = self.cache.get(&request.text, &model).await {
            debug!("Cache hit for embedding");
            return Ok(EmbeddingResponse {
                dimension: embedding.len(),
                embedding,
                model,
            });
        }

        let text = request.text.clone();
        let response = self.provider.embed(request).await?;
        self.cache
            .put(&text, &model, response.embedding.clone())
            .await;

        Ok(response)
    }

    fn is_available(&self) -> bool {
        self.provider.is_available()
    }
}
