//! One orchestration pass per settled transcript.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use signconnect_embeddings::Vectorizer;
use signconnect_scenarios::{ScenarioStore, SimilarityIndex};
use signconnect_suggestions::{SuggestionGenerator, SuggestionRequest};
use signconnect_transcript::TranscriptEvent;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::OrchestratorError;
use crate::state::{ContextMatch, StateCommand};

/// Everything a pass needs. Shared by all passes.
pub(crate) struct Pipeline {
    pub(crate) vectorizer: Vectorizer,
    pub(crate) store: Arc<dyn ScenarioStore>,
    pub(crate) generator: Arc<dyn SuggestionGenerator>,
    pub(crate) match_threshold: f32,
    pub(crate) generator_timeout: Duration,
    pub(crate) embedding_timeout: Duration,
    pub(crate) store_timeout: Duration,

    /// Sequence of the newest settled transcript.
    pub(crate) latest_settled: Arc<AtomicU64>,

    pub(crate) commands: mpsc::UnboundedSender<StateCommand>,
}

impl Pipeline {
    /// Embed, match, publish the context, then generate and publish
    /// suggestions. `Begin` must already have been sent for this event.
    pub(crate) async fn run(&self, event: TranscriptEvent) {
        let sequence = event.sequence;

        let snapshot = timeout(self.store_timeout, self.store.list_all()).await;
        let (scenarios, mut degraded) = match snapshot {
            Ok(Ok(scenarios)) => (scenarios, None),
            Ok(Err(e)) => {
                warn!(sequence, "Scenario store unavailable, matching without candidates: {e}");
                (Vec::new(), Some(OrchestratorError::from(e)))
            }
            Err(_) => {
                warn!(
                    sequence,
                    "Scenario store timed out after {:?}, matching without candidates",
                    self.store_timeout
                );
                (
                    Vec::new(),
                    Some(OrchestratorError::StoreUnavailable(format!(
                        "timed out after {:?}",
                        self.store_timeout
                    ))),
                )
            }
        };

        let embedded = timeout(self.embedding_timeout, self.vectorizer.embed(&event.text)).await;
        let query = match embedded {
            Ok(Ok(query)) => query,
            Ok(Err(e)) => {
                debug!(sequence, "Embedding failed: {e}");
                self.commit(StateCommand::EmbeddingFailed {
                    sequence,
                    error: OrchestratorError::from(e),
                });
                return;
            }
            Err(_) => {
                warn!(sequence, "Embedding timed out after {:?}", self.embedding_timeout);
                let error = OrchestratorError::EmbeddingUnavailable(format!(
                    "timed out after {:?}",
                    self.embedding_timeout
                ));
                self.commit(StateCommand::EmbeddingFailed { sequence, error });
                return;
            }
        };

        let index = SimilarityIndex::new(scenarios).with_threshold(self.match_threshold);
        if let Err(e) = index.check_dimension(query.len()) {
            warn!(sequence, "No scenario is comparable with this embedding: {e}");
            if degraded.is_none() {
                degraded = Some(OrchestratorError::from(e));
            }
        }
        let (result, record) = index.resolve(&query);
        let context = record.map(|record| ContextMatch {
            scenario_id: record.id,
            label: record.label.clone(),
            score: result.score,
        });
        let context_label = context.as_ref().map(|c| c.label.clone());

        info!(
            sequence,
            context = context_label.as_deref().unwrap_or("none"),
            score = result.score,
            "Resolved conversation context"
        );
        self.commit(StateCommand::Context {
            sequence,
            context,
            degraded,
        });

        if self.is_superseded(sequence) {
            debug!(sequence, "Superseded before generation, skipping generator");
            return;
        }

        let request = SuggestionRequest::new(event.text).with_context_label(context_label);
        let result = match timeout(self.generator_timeout, self.generator.generate(request)).await {
            Ok(Ok(suggestions)) => Ok(suggestions),
            Ok(Err(e)) => {
                warn!(sequence, generator = self.generator.name(), "Generation failed: {e}");
                Err(OrchestratorError::from(e))
            }
            Err(_) => {
                warn!(
                    sequence,
                    generator = self.generator.name(),
                    "Generation timed out after {:?}",
                    self.generator_timeout
                );
                Err(OrchestratorError::GeneratorTimeout)
            }
        };

        self.commit(StateCommand::Suggestions { sequence, result });
    }

    fn is_superseded(&self, sequence: u64) -> bool {
        self.latest_settled.load(Ordering::SeqCst) > sequence
    }

    fn commit(&self, command: StateCommand) {
        if self.commands.send(command).is_err() {
            debug!("State task gone, dropping result");
        }
    }
}
