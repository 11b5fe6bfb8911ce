//! The orchestrator and its handle.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use signconnect_embeddings::Vectorizer;
use signconnect_scenarios::ScenarioStore;
use signconnect_suggestions::SuggestionGenerator;
use signconnect_transcript::{DebounceScheduler, SequenceCounter};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::OrchestratorConfig;
use crate::error::{OrchestratorError, Result};
use crate::pipeline::Pipeline;
use crate::state::{OrchestratorState, StateCommand, run_state_task};

/// Wires the vectorizer, scenario store and suggestion generator together.
pub struct ContextOrchestrator {
    config: OrchestratorConfig,
    vectorizer: Vectorizer,
    store: Arc<dyn ScenarioStore>,
    generator: Arc<dyn SuggestionGenerator>,
}

impl ContextOrchestrator {
    /// Create an orchestrator with the default configuration.
    pub fn new(
        vectorizer: Vectorizer,
        store: Arc<dyn ScenarioStore>,
        generator: Arc<dyn SuggestionGenerator>,
    ) -> Self {
        Self {
            config: OrchestratorConfig::default(),
            vectorizer,
            store,
            generator,
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Start the state and debounce tasks. Must be called inside a Tokio
    /// runtime.
    pub fn spawn(self) -> OrchestratorHandle {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (publisher, state) = watch::channel(OrchestratorState::default());
        let state_task = tokio::spawn(run_state_task(command_rx, publisher));

        let latest_settled = Arc::new(AtomicU64::new(0));
        let pipeline = Arc::new(Pipeline {
            vectorizer: self.vectorizer,
            store: self.store,
            generator: self.generator,
            match_threshold: self.config.match_threshold,
            generator_timeout: self.config.generator_timeout(),
            embedding_timeout: self.config.embedding_timeout(),
            store_timeout: self.config.store_timeout(),
            latest_settled: latest_settled.clone(),
            commands: commands.clone(),
        });

        let begin = commands.clone();
        let debounce = DebounceScheduler::spawn(self.config.debounce_period(), move |event| {
            latest_settled.fetch_max(event.sequence, Ordering::SeqCst);
            if begin
                .send(StateCommand::Begin {
                    sequence: event.sequence,
                })
                .is_err()
            {
                return;
            }
            let pipeline = pipeline.clone();
            tokio::spawn(async move { pipeline.run(event).await });
        });

        info!(
            threshold = self.config.match_threshold,
            debounce_ms = self.config.debounce_ms,
            generator_timeout_ms = self.config.generator_timeout_ms,
            embedding_timeout_ms = self.config.embedding_timeout_ms,
            "Context orchestrator started"
        );

        OrchestratorHandle {
            sequences: SequenceCounter::new(),
            debounce,
            commands,
            state,
            state_task,
        }
    }
}

/// Front door for transcript input and state observation.
///
/// Dropping the handle stops the debounce task; the state task stops once
/// in-flight passes finish.
pub struct OrchestratorHandle {
    sequences: SequenceCounter,
    debounce: DebounceScheduler,
    commands: mpsc::UnboundedSender<StateCommand>,
    state: watch::Receiver<OrchestratorState>,
    state_task: JoinHandle<()>,
}

impl OrchestratorHandle {
    /// Feed the latest transcript text.
    ///
    /// Blank text is ignored and yields `None`; otherwise the assigned
    /// sequence number is returned.
    pub fn submit_transcript(&self, text: impl Into<String>) -> Result<Option<u64>> {
        let text = text.into();
        if text.trim().is_empty() {
            return Ok(None);
        }

        let event = self.sequences.event(text);
        let sequence = event.sequence;
        self.debounce
            .on_event(event)
            .map_err(|_| OrchestratorError::Closed)?;
        debug!(sequence, "Transcript submitted");
        Ok(Some(sequence))
    }

    /// Current state snapshot.
    pub fn state(&self) -> OrchestratorState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<OrchestratorState> {
        self.state.clone()
    }

    /// Remove the visible suggestions.
    pub fn clear_suggestions(&self) -> Result<()> {
        self.commands
            .send(StateCommand::ClearSuggestions)
            .map_err(|_| OrchestratorError::Closed)
    }

    /// Stop both tasks. Results of passes still running are dropped.
    pub async fn shutdown(self) {
        let Self {
            debounce,
            commands,
            state_task,
            ..
        } = self;

        debounce.shutdown().await;
        // The state task may already be gone; nothing to report then.
        let _ = commands.send(StateCommand::Shutdown);
        if let Err(e) = state_task.await {
            debug!("State task ended abnormally: {e}");
        }
        info!("Context orchestrator stopped");
    }
}
