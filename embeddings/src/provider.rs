//! Embedding providers.
//!
//! The text → vector capability is external; this module defines the seam
//! ([`EmbeddingProvider`]) and an adapter for any OpenAI-compatible
//! `/embeddings` endpoint, which covers hosted APIs as well as local servers
//! such as llama.cpp or Ollama in OpenAI mode.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Request for generating embeddings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// Text to embed.
    pub text: String,

    /// Model to use (provider-specific).
    pub model: Option<String>,
}

impl EmbeddingRequest {
    /// Create a new embedding request.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
        }
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Response from embedding generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// The generated embedding.
    pub embedding: Embedding,

    /// Model used to generate the embedding.
    pub model: String,

    /// Dimension of the embedding.
    pub dimension: usize,
}

/// Trait for embedding providers.
///
/// Implementations hold no mutable per-call state and must be callable from
/// several orchestration passes at once.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Get the default model for this provider.
    fn default_model(&self) -> &str;

    /// Get the embedding dimension this provider produces.
    fn default_dimension(&self) -> usize;

    /// Generate an embedding for the given text.
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse>;

    /// Check if the provider is available (API key set, etc.).
    fn is_available(&self) -> bool;
}

/// OpenAI-compatible embedding provider.
pub struct OpenAIProvider {
    /// API key.
    api_key: Option<String>,

    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Default model.
    default_model: String,

    /// Dimension override for models the provider does not know.
    dimension: Option<usize>,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider.
    pub fn new() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: "https://api.openai.com/v1".to_string(),
            client: reqwest::Client::new(),
            default_model: "text-embedding-3-small".to_string(),
            dimension: None,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Declare the output dimension explicitly.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }
}

impl Default for OpenAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn default_dimension(&self) -> usize {
        if let Some(dimension) = self.dimension {
            return dimension;
        }
        match self.default_model.as_str() {
            "text-embedding-3-large" => 3072,
            "all-minilm" | "all-MiniLM-L6-v2" => 384,
            "nomic-embed-text" => 768,
            _ => crate::DEFAULT_DIMENSION,
        }
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(EmbeddingError::ProviderNotConfigured)?;
        let model = request.model.as_deref().unwrap_or(&self.default_model);

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url.trim_end_matches('/')))
            .bearer_auth(api_key)
            .json(&OpenAIEmbeddingBody {
                input: &request.text,
                model,
            })
            .send()
            .await?;
        let response = check_status(response).await?;

        let OpenAIEmbeddingResponse { data, model } = response.json().await?;
        let Some(first) = data.into_iter().next() else {
            return Err(EmbeddingError::InvalidResponse(
                "response carried no embedding".to_string(),
            ));
        };

        let dimension = first.embedding.len();
        debug!(model = %model, dimension, "Received embedding");

        Ok(EmbeddingResponse {
            embedding: first.embedding,
            model,
            dimension,
        })
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Map non-success statuses to errors.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return Err(EmbeddingError::RateLimited { retry_after_secs });
    }

    let body = response.text().await.unwrap_or_default();
    Err(EmbeddingError::ApiRequest(format!("{status}: {body}")))
}

#[derive(Debug, Serialize)]
struct OpenAIEmbeddingBody<'a> {
    input: &'a str,
    model: &'a str,
}

/// OpenAI API response format.
#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingResponse {
    data: Vec<OpenAIEmbeddingData>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_embedding_request() {
        let request = EmbeddingRequest::new("Hello world").with_model("text-embedding-3-small");

        assert_eq!(request.text, "Hello world");
        assert_eq!(request.model, Some("text-embedding-3-small".to_string()));
    }

    #[test]
    fn test_openai_provider_default_dimensions() {
        let provider = OpenAIProvider::new().with_model("text-embedding-3-large");
        assert_eq!(provider.default_dimension(), 3072);

        let provider = OpenAIProvider::new().with_model("custom").with_dimension(12);
        assert_eq!(provider.default_dimension(), 12);
    }

    #[tokio::test]
    async fn test_embed_parses_first_vector() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "embedding": [0.6, 0.8], "index": 0 }],
                "model": "tiny",
                "usage": { "prompt_tokens": 2, "total_tokens": 2 }
            })))
            .mount(&server)
            .await;

        let provider = OpenAIProvider::new()
            .with_api_key("test-key")
            .with_base_url(server.uri())
            .with_model("tiny");

        let response = provider.embed(EmbeddingRequest::new("latte")).await.unwrap();
        assert_eq!(response.embedding, vec![0.6, 0.8]);
        assert_eq!(response.dimension, 2);
        assert_eq!(response.model, "tiny");
    }

    #[tokio::test]
    async fn test_embed_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let provider = OpenAIProvider::new()
            .with_api_key("k")
            .with_base_url(server.uri());

        let err = provider.embed(EmbeddingRequest::new("hi")).await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::RateLimited {
                retry_after_secs: 7
            }
        ));
    }

    #[tokio::test]
    async fn test_embed_empty_data_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [],
                "model": "tiny"
            })))
            .mount(&server)
            .await;

        let provider = OpenAIProvider::new()
            .with_api_key("k")
            .with_base_url(server.uri());

        let err = provider.embed(EmbeddingRequest::new("hi")).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_embed_without_key_is_not_configured() {
        let provider = OpenAIProvider {
            api_key: None,
            ..OpenAIProvider::new()
        };
        assert!(!provider.is_available());

        let err = provider.embed(EmbeddingRequest::new("hi")).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::ProviderNotConfigured));
    }
}
