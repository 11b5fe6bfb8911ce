//! Scenario records.

use std::fmt;

use serde::{Deserialize, Serialize};
use signconnect_embeddings::Embedding;
use uuid::Uuid;

/// Opaque scenario identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(Uuid);

impl ScenarioId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ScenarioId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored conversational scenario. Immutable once embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    /// Unique identifier.
    pub id: ScenarioId,

    /// Short human label, e.g. "Coffee Shop".
    pub label: String,

    /// Embedding of `source_text`.
    pub vector: Embedding,

    /// The example text the vector was computed from.
    pub source_text: String,
}

impl ScenarioRecord {
    /// Create a record with a fresh identifier.
    pub fn new(label: impl Into<String>, source_text: impl Into<String>, vector: Embedding) -> Self {
        Self {
            id: ScenarioId::new(),
            label: label.into(),
            vector,
            source_text: source_text.into(),
        }
    }

    /// Set an explicit identifier.
    pub fn with_id(mut self, id: ScenarioId) -> Self {
        self.id = id;
        self
    }

    /// Vector dimension.
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}
