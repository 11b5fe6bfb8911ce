//! # Transcript
//!
//! Live transcription emits a new event every time the recognized text
//! changes, often several per second while someone is talking. This crate
//! numbers those events and debounces them into one "settled" event per
//! pause.
//!
//! ```text
//! submit ──► SequenceCounter ──► TranscriptEvent ──► DebounceScheduler ──► on_settled
//! ```

pub mod debounce;
pub mod error;
pub mod event;

pub use debounce::{DEFAULT_QUIET_PERIOD, DebounceScheduler};
pub use error::{Result, TranscriptError};
pub use event::{SequenceCounter, TranscriptEvent};
