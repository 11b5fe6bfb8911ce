//! Suggestion data types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Register of a suggested reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Relaxed, everyday phrasing.
    Casual,
    /// Polite, complete phrasing.
    Formal,
    /// A terse acknowledgment, often one word.
    Quick,
}

impl Tone {
    /// All tones in display order.
    pub const ALL: [Tone; 3] = [Tone::Casual, Tone::Formal, Tone::Quick];

    /// Lowercase name of the tone.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Casual => "casual",
            Tone::Formal => "formal",
            Tone::Quick => "quick",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Three reply phrasings for the same moment in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionSet {
    pub casual: String,
    pub formal: String,
    pub quick: String,
}

impl SuggestionSet {
    /// Create a suggestion set.
    pub fn new(
        casual: impl Into<String>,
        formal: impl Into<String>,
        quick: impl Into<String>,
    ) -> Self {
        Self {
            casual: casual.into(),
            formal: formal.into(),
            quick: quick.into(),
        }
    }

    /// The reply for `tone`.
    pub fn get(&self, tone: Tone) -> &str {
        match tone {
            Tone::Casual => &self.casual,
            Tone::Formal => &self.formal,
            Tone::Quick => &self.quick,
        }
    }

    /// Replies paired with their tone, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Tone, &str)> {
        Tone::ALL.into_iter().map(move |tone| (tone, self.get(tone)))
    }
}

/// Input to a suggestion generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    /// What the conversation partner said.
    pub text: String,

    /// Label of the matched scenario, if any.
    pub context_label: Option<String>,
}

impl SuggestionRequest {
    /// Create a request with no context.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context_label: None,
        }
    }

    /// Set the context label.
    pub fn with_context_label(mut self, label: Option<String>) -> Self {
        self.context_label = label;
        self
    }
}
