//! # Scenarios
//!
//! A scenario is a canned conversational situation ("Coffee Shop",
//! "Medical", ...) stored as a label, an example text, and that text's
//! embedding. This crate defines the record type, the read-only store seam
//! the orchestrator snapshots from, and the nearest-scenario matcher.
//!
//! ```text
//! ScenarioStore::list_all ──► Vec<ScenarioRecord> (snapshot)
//!                                   │
//!                                   ▼
//!                           SimilarityIndex::best_match ──► MatchResult
//! ```

pub mod error;
pub mod index;
pub mod record;
pub mod seed;
pub mod store;

pub use error::{Result, StoreError};
pub use index::{DEFAULT_MATCH_THRESHOLD, MatchResult, SimilarityIndex, best_match};
pub use record::{ScenarioId, ScenarioRecord};
pub use seed::{DEFAULT_SCENARIOS, ScenarioSeeder};
pub use store::{FileScenarioStore, InMemoryScenarioStore, ScenarioStore};
