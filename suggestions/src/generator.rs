//! The suggestion generator seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{SuggestionRequest, SuggestionSet};

/// Something that proposes replies for a transcript.
///
/// Implementations may be slow; callers bound each call with their own
/// timeout and must not assume the call can be cancelled.
#[async_trait]
pub trait SuggestionGenerator: Send + Sync {
    /// Name of this generator, for logs.
    fn name(&self) -> &str;

    /// Propose casual, formal and quick replies to `request.text`.
    async fn generate(&self, request: SuggestionRequest) -> Result<SuggestionSet>;

    /// Whether the generator is configured well enough to try.
    fn is_available(&self) -> bool {
        true
    }
}
