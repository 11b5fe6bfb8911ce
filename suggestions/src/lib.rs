//! # Suggestions
//!
//! Turns what the conversation partner just said, plus the matched scenario
//! label if any, into three candidate replies the user can pick from.
//!
//! The model itself is external. This crate defines the
//! [`SuggestionGenerator`] seam, the prompt, and an adapter for
//! OpenAI-compatible chat completion endpoints.

pub mod config;
pub mod error;
pub mod generator;
pub mod openai;
pub mod prompt;
pub mod types;

pub use config::GeneratorConfig;
pub use error::{GeneratorError, Result};
pub use generator::SuggestionGenerator;
pub use openai::OpenAIChatGenerator;
pub use prompt::{build_prompt, parse_suggestions};
pub use types::{SuggestionRequest, SuggestionSet, Tone};
