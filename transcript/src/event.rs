//! Transcript events.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// One update of the live transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEvent {
    /// Full transcript text as of this update.
    pub text: String,

    /// Monotonically increasing per source; later updates have larger numbers.
    pub sequence: u64,

    /// When the update was received.
    pub received_at: DateTime<Utc>,
}

impl TranscriptEvent {
    /// Create a new transcript event.
    pub fn new(text: impl Into<String>, sequence: u64) -> Self {
        Self {
            text: text.into(),
            sequence,
            received_at: Utc::now(),
        }
    }

    /// Time between receipt and `now`, zero if the wall clock went backwards.
    pub fn age_at(&self, now: DateTime<Utc>) -> TimeDelta {
        (now - self.received_at).max(TimeDelta::zero())
    }
}

/// Hands out increasing sequence numbers, starting at 1.
#[derive(Debug, Default)]
pub struct SequenceCounter {
    last: AtomicU64,
}

impl SequenceCounter {
    /// Create a counter whose first number is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next sequence number.
    pub fn next(&self) -> u64 {
        self.last.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Wrap `text` in an event carrying the next sequence number.
    pub fn event(&self, text: impl Into<String>) -> TranscriptEvent {
        TranscriptEvent::new(text, self.next())
    }
}
