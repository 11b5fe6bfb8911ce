//! Embedding raw `(label, text)` pairs into scenario records.

use signconnect_embeddings::Vectorizer;
use tracing::{info, warn};

use crate::record::ScenarioRecord;

/// Starter scenarios for a fresh install.
pub const DEFAULT_SCENARIOS: &[(&str, &str)] = &[
    ("Coffee Shop", "I would like a large latte with oat milk, please."),
    (
        "Medical",
        "I am deaf. I communicate using this app. Please speak clearly.",
    ),
    (
        "Emergency",
        "I need help. Please call an ambulance to my location.",
    ),
    ("Greeting", "Hello! Nice to meet you."),
];

/// Builds scenario records by embedding their example text.
pub struct ScenarioSeeder {
    vectorizer: Vectorizer,
}

impl ScenarioSeeder {
    /// Create a seeder using `vectorizer`.
    pub fn new(vectorizer: Vectorizer) -> Self {
        Self { vectorizer }
    }

    /// Embed each `(label, text)` pair. Pairs that cannot be embedded are
    /// skipped with a warning; the rest keep their input order.
    pub async fn seed<'a>(
        &self,
        scenarios: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Vec<ScenarioRecord> {
        let mut records = Vec::new();

        for (label, text) in scenarios {
            match self.vectorizer.embed(text).await {
                Ok(vector) => records.push(ScenarioRecord::new(label, text, vector)),
                Err(e) => warn!(scenario = label, "Skipping scenario: {e}"),
            }
        }

        info!("Seeded {} scenarios", records.len());
        records
    }

    /// Embed [`DEFAULT_SCENARIOS`].
    pub async fn seed_defaults(&self) -> Vec<ScenarioRecord> {
        self.seed(DEFAULT_SCENARIOS.iter().copied()).await
    }
}
