//! Orchestrator tunables.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use signconnect_scenarios::DEFAULT_MATCH_THRESHOLD;

/// Configuration for [`crate::ContextOrchestrator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// A scenario must score strictly above this to become the context.
    pub match_threshold: f32,

    /// Quiet period before a transcript counts as settled, in milliseconds.
    pub debounce_ms: u64,

    /// Upper bound on one generator call, in milliseconds.
    pub generator_timeout_ms: u64,

    /// Upper bound on embedding one transcript, in milliseconds.
    pub embedding_timeout_ms: u64,

    /// Upper bound on reading the scenario snapshot, in milliseconds.
    pub store_timeout_ms: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            debounce_ms: 1000,
            generator_timeout_ms: 10_000,
            embedding_timeout_ms: 5_000,
            store_timeout_ms: 2_000,
        }
    }
}

impl OrchestratorConfig {
    /// Set the match threshold.
    pub fn with_match_threshold(mut self, threshold: f32) -> Self {
        self.match_threshold = threshold;
        self
    }

    /// Set the debounce quiet period.
    pub fn with_debounce(mut self, period: Duration) -> Self {
        self.debounce_ms = duration_millis(period);
        self
    }

    /// Set the generator timeout.
    pub fn with_generator_timeout(mut self, timeout: Duration) -> Self {
        self.generator_timeout_ms = duration_millis(timeout);
        self
    }

    /// Set the embedding timeout.
    pub fn with_embedding_timeout(mut self, timeout: Duration) -> Self {
        self.embedding_timeout_ms = duration_millis(timeout);
        self
    }

    /// Set the scenario store timeout.
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout_ms = duration_millis(timeout);
        self
    }

    /// Debounce quiet period.
    pub fn debounce_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Generator timeout.
    pub fn generator_timeout(&self) -> Duration {
        Duration::from_millis(self.generator_timeout_ms)
    }

    /// Embedding timeout.
    pub fn embedding_timeout(&self) -> Duration {
        Duration::from_millis(self.embedding_timeout_ms)
    }

    /// Scenario store timeout.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
