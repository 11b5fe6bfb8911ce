//! OpenAI-compatible chat completion generator.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, Result};
use crate::generator::SuggestionGenerator;
use crate::prompt::{SYSTEM_PROMPT, build_prompt, parse_suggestions};
use crate::types::{SuggestionRequest, SuggestionSet};

/// Generator backed by a `/chat/completions` endpoint.
pub struct OpenAIChatGenerator {
    /// API key.
    api_key: Option<String>,

    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Model name.
    model: String,

    temperature: f32,
    max_tokens: u32,

    /// Per-request transport timeout.
    request_timeout: Option<Duration>,
}

impl OpenAIChatGenerator {
    /// Create a generator with default settings and the key from
    /// `OPENAI_API_KEY`.
    pub fn new() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }

    /// Create a generator from `config`.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            api_key: config.api_key(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            request_timeout: None,
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

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Abort requests that take longer than `timeout`.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    fn request_body(&self, request: &SuggestionRequest) -> Value {
        json!({
            "model": self.model,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(request) }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "suggestion_set",
                    "strict": true,
                    "schema": {
                        "type": "object",
                        "properties": {
                            "casual": { "type": "string", "description": "A short, casual, and friendly reply" },
                            "formal": { "type": "string", "description": "A polite, professional, and formal reply" },
                            "quick": { "type": "string", "description": "A very brief, one-word acknowledgment" }
                        },
                        "required": ["casual", "formal", "quick"],
                        "additionalProperties": false
                    }
                }
            }
        })
    }
}

impl Default for OpenAIChatGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SuggestionGenerator for OpenAIChatGenerator {
    fn name(&self) -> &str {
        "openai-chat"
    }

    async fn generate(&self, request: SuggestionRequest) -> Result<SuggestionSet> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| GeneratorError::Unavailable("no API key configured".to_string()))?;

        debug!(
            model = %self.model,
            context = request.context_label.as_deref().unwrap_or("none"),
            "Requesting suggestions"
        );

        let mut http_request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&self.request_body(&request));
        if let Some(timeout) = self.request_timeout {
            http_request = http_request.timeout(timeout);
        }

        let response = http_request
            .send()
            .await
            .map_err(GeneratorError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, error_text));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(GeneratorError::from_transport)?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GeneratorError::InvalidResponse("no choices in response".to_string()))?;

        if let Some(refusal) = choice.message.refusal {
            return Err(GeneratorError::Refused(refusal));
        }
        if choice.finish_reason.as_deref() == Some("content_filter") {
            return Err(GeneratorError::Refused("content filtered".to_string()));
        }

        let content = choice
            .message
            .content
            .ok_or_else(|| GeneratorError::InvalidResponse("empty message".to_string()))?;

        parse_suggestions(&content)
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

fn classify_status(status: reqwest::StatusCode, body: String) -> GeneratorError {
    let looks_like_policy = body.contains("content_policy") || body.contains("content_filter");

    if status == reqwest::StatusCode::BAD_REQUEST && looks_like_policy {
        GeneratorError::Refused(body)
    } else if status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status == reqwest::StatusCode::GATEWAY_TIMEOUT
    {
        GeneratorError::Timeout
    } else {
        GeneratorError::Unavailable(format!("{status}: {body}"))
    }
}

/// Chat completion response format.
#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generator(server: &MockServer) -> OpenAIChatGenerator {
        OpenAIChatGenerator::new()
            .with_api_key("test-key")
            .with_base_url(server.uri())
    }

    fn completion(message: Value, finish_reason: &str) -> Value {
        json!({
            "choices": [{ "index": 0, "message": message, "finish_reason": finish_reason }]
        })
    }

    #[tokio::test]
    async fn test_generate_parses_suggestions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_string_contains("Coffee Shop"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                json!({
                    "role": "assistant",
                    "content": "{\"casual\":\"Oat milk, please!\",\"formal\":\"Oat milk, if you have it.\",\"quick\":\"Oat\"}"
                }),
                "stop",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let request = SuggestionRequest::new("Which milk would you like?")
            .with_context_label(Some("Coffee Shop".to_string()));
        let set = generator(&server).generate(request).await.unwrap();

        assert_eq!(
            set,
            SuggestionSet::new("Oat milk, please!", "Oat milk, if you have it.", "Oat")
        );
    }

    #[tokio::test]
    async fn test_refusal_is_refused() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                json!({ "role": "assistant", "content": null, "refusal": "I can't help with that." }),
                "stop",
            )))
            .mount(&server)
            .await;

        let err = generator(&server)
            .generate(SuggestionRequest::new("..."))
            .await
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Refused(reason) if reason == "I can't help with that."));
    }

    #[tokio::test]
    async fn test_content_filter_is_refused() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                json!({ "role": "assistant", "content": "" }),
                "content_filter",
            )))
            .mount(&server)
            .await;

        let err = generator(&server)
            .generate(SuggestionRequest::new("..."))
            .await
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Refused(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = generator(&server)
            .generate(SuggestionRequest::new("Hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Unavailable(message) if message.contains("overloaded")));
    }

    #[tokio::test]
    async fn test_malformed_content_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                json!({ "role": "assistant", "content": "Sure! Here are three replies." }),
                "stop",
            )))
            .mount(&server)
            .await;

        let err = generator(&server)
            .generate(SuggestionRequest::new("Hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion(json!({ "content": "{}" }), "stop"))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let err = generator(&server)
            .with_request_timeout(Duration::from_millis(50))
            .generate(SuggestionRequest::new("Hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Timeout));
    }

    #[tokio::test]
    async fn test_missing_key_is_unavailable() {
        let generator = OpenAIChatGenerator::from_config(
            &GeneratorConfig::default().with_base_url("http://127.0.0.1:9"),
        );
        let generator = OpenAIChatGenerator {
            api_key: None,
            ..generator
        };

        assert!(!generator.is_available());
        let err = generator
            .generate(SuggestionRequest::new("Hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Unavailable(_)));
    }
}
