//! Observable orchestrator state and its single writer.

use serde::{Deserialize, Serialize};
use signconnect_scenarios::ScenarioId;
use signconnect_suggestions::SuggestionSet;
use tokio::sync::{mpsc, watch};
use tracing::{debug, trace};

use crate::error::OrchestratorError;

/// The scenario currently believed to describe the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMatch {
    pub scenario_id: ScenarioId,
    pub label: String,
    pub score: f32,
}

/// What the UI renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestratorState {
    /// Matched scenario of the latest committed request.
    pub current_context: Option<ContextMatch>,

    /// Latest successfully generated replies. Kept across failures.
    pub suggestions: Option<SuggestionSet>,

    /// True while the newest request is between embedding and publishing.
    pub is_busy: bool,

    /// Failure of the latest committed step, cleared by a successful generation.
    pub last_error: Option<OrchestratorError>,
}

/// Mutations sent to the state task.
#[derive(Debug)]
pub(crate) enum StateCommand {
    /// Request `sequence` entered embedding.
    Begin { sequence: u64 },

    /// Request `sequence` finished matching.
    Context {
        sequence: u64,
        context: Option<ContextMatch>,
        degraded: Option<OrchestratorError>,
    },

    /// Request `sequence` could not embed its transcript.
    EmbeddingFailed {
        sequence: u64,
        error: OrchestratorError,
    },

    /// Request `sequence` finished generating.
    Suggestions {
        sequence: u64,
        result: Result<SuggestionSet, OrchestratorError>,
    },

    ClearSuggestions,

    Shutdown,
}

/// Owns the state and applies commands in arrival order.
#[derive(Debug, Default)]
pub(crate) struct StateWriter {
    state: OrchestratorState,
    latest_started: u64,
}

impl StateWriter {
    pub(crate) fn state(&self) -> &OrchestratorState {
        &self.state
    }

    /// Apply `command`. Returns whether the state changed.
    pub(crate) fn apply(&mut self, command: StateCommand) -> bool {
        match command {
            StateCommand::Begin { sequence } => {
                if sequence <= self.latest_started {
                    return false;
                }
                self.latest_started = sequence;
                self.state.is_busy = true;
                true
            }
            StateCommand::Context {
                sequence,
                context,
                degraded,
            } => {
                if self.is_stale(sequence) {
                    return false;
                }
                self.state.current_context = context;
                if degraded.is_some() {
                    self.state.last_error = degraded;
                }
                true
            }
            StateCommand::EmbeddingFailed { sequence, error } => {
                if self.is_stale(sequence) {
                    return false;
                }
                self.state.last_error = Some(error);
                self.state.is_busy = false;
                true
            }
            StateCommand::Suggestions { sequence, result } => {
                if self.is_stale(sequence) {
                    return false;
                }
                match result {
                    Ok(suggestions) => {
                        self.state.suggestions = Some(suggestions);
                        self.state.last_error = None;
                    }
                    Err(error) => self.state.last_error = Some(error),
                }
                self.state.is_busy = false;
                true
            }
            StateCommand::ClearSuggestions => {
                if self.state.suggestions.is_none() {
                    return false;
                }
                self.state.suggestions = None;
                true
            }
            StateCommand::Shutdown => false,
        }
    }

    fn is_stale(&self, sequence: u64) -> bool {
        if sequence < self.latest_started {
            debug!(
                sequence,
                latest = self.latest_started,
                "Discarding superseded result"
            );
            return true;
        }
        false
    }
}

/// Run the state task until shutdown or until every sender is gone.
pub(crate) async fn run_state_task(
    mut commands: mpsc::UnboundedReceiver<StateCommand>,
    publisher: watch::Sender<OrchestratorState>,
) {
    let mut writer = StateWriter::default();

    while let Some(command) = commands.recv().await {
        if matches!(command, StateCommand::Shutdown) {
            break;
        }
        trace!(?command, "Applying state command");
        if writer.apply(command) {
            publisher.send_replace(writer.state().clone());
        }
    }

    debug!("State task stopped");
}
