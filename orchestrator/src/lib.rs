//! # Orchestrator
//!
//! Coordinates a debounced transcript stream with scenario retrieval and
//! suggestion generation.
//!
//! ## Request lifecycle
//!
//! Each settled transcript becomes a request identified by its sequence
//! number:
//!
//! ```text
//! Idle ─► Embedding ─► Matching ─► Generating ─► Published
//!             │                                     ▲
//!             └──────── embedding failed ───────────┘
//!
//! any step ─► Superseded (a newer request has started)
//! ```
//!
//! All writes to [`OrchestratorState`] go through one task fed by a channel.
//! That task drops anything committed by a request older than the newest
//! one it has seen start, so a slow request can never overwrite the result
//! of a faster, newer one.

pub mod config;
pub mod error;
pub mod orchestrator;
mod pipeline;
pub mod state;

pub use config::OrchestratorConfig;
pub use error::{OrchestratorError, Result};
pub use orchestrator::{ContextOrchestrator, OrchestratorHandle};
pub use state::{ContextMatch, OrchestratorState};
