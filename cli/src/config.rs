//! Configuration file handling.
//!
//! Everything is optional; a missing file means defaults. The file lives at
//! `<config dir>/signconnect/config.toml` unless `--config` points elsewhere.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use signconnect_embeddings::{CachedProvider, EmbeddingCache, OpenAIProvider, Vectorizer};
use signconnect_orchestrator::OrchestratorConfig;
use signconnect_suggestions::GeneratorConfig;
use tracing::debug;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scenario file. Defaults to `<data dir>/signconnect/scenarios.json`.
    pub scenarios_path: Option<PathBuf>,

    pub orchestrator: OrchestratorConfig,
    pub embedding: EmbeddingConfig,
    pub generator: GeneratorConfig,
    pub speech: SpeechConfig,
}

impl AppConfig {
    /// Default location of the configuration file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("signconnect").join("config.toml"))
    }

    /// Load from `path`, or from [`Self::default_path`] when `None`.
    ///
    /// An explicitly named file must exist; the default file may be absent.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if required {
                anyhow::bail!("config file {} does not exist", path.display());
            }
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolved scenario file path.
    pub fn scenarios_path(&self) -> PathBuf {
        self.scenarios_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_default()
                .join("signconnect")
                .join("scenarios.json")
        })
    }
}

/// Settings for the embedding capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// API base URL, without the trailing `/embeddings`.
    pub base_url: String,

    /// Embedding model.
    pub model: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Output dimension, for models the provider does not know.
    pub dimension: Option<usize>,

    /// Maximum cached embeddings. Zero disables caching.
    pub cache_max_entries: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            dimension: None,
            cache_max_entries: 1000,
        }
    }
}

impl EmbeddingConfig {
    /// Build a caching vectorizer from these settings.
    pub fn build_vectorizer(&self) -> Vectorizer {
        let mut provider = OpenAIProvider::new()
            .with_base_url(self.base_url.trim_end_matches('/'))
            .with_model(&self.model);
        if let Some(key) = std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
        {
            provider = provider.with_api_key(key);
        }
        if let Some(dimension) = self.dimension {
            provider = provider.with_dimension(dimension);
        }

        let cached = CachedProvider::new(provider, EmbeddingCache::new(self.cache_max_entries));
        Vectorizer::new(Arc::new(cached))
    }
}

/// Settings for speaking the chosen reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Speak aloud; when false, replies are only printed.
    pub enabled: bool,

    /// Text-to-speech command, called with the text as its last argument.
    pub command: String,

    /// Voice passed as `-v <voice>`.
    pub voice: Option<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: cfg!(target_os = "macos"),
            command: "say".to_string(),
            voice: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
scenarios_path = "/tmp/scenarios.json"

[orchestrator]
match_threshold = 0.7

[generator]
model = "llama3.2"
base_url = "http://localhost:11434/v1"
"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(config.scenarios_path(), PathBuf::from("/tmp/scenarios.json"));
        assert_eq!(config.orchestrator.match_threshold, 0.7);
        assert_eq!(config.orchestrator.debounce_ms, 1000);
        assert_eq!(config.generator.model, "llama3.2");
        assert_eq!(config.generator.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.embedding, EmbeddingConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = AppConfig::load(Some(&temp_dir.path().join("nope.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[orchestrator]\ndebounce_ms = \"soon\"\n").unwrap();

        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }
}
