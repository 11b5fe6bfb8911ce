//! Quiet-period debouncing of transcript events.
//!
//! Every event restarts the quiet period. When the period elapses with no
//! newer event, the most recent event is handed to the callback. Only one
//! deadline is ever pending.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, trace};

use crate::error::{Result, TranscriptError};
use crate::event::TranscriptEvent;

/// Quiet period used when none is configured.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1000);

/// Forwards only the last event of each burst.
///
/// The callback runs on the scheduler task and should return quickly; spawn
/// any slow work from inside it.
pub struct DebounceScheduler {
    tx: mpsc::UnboundedSender<TranscriptEvent>,
    task: JoinHandle<()>,
    quiet_period: Duration,
}

impl DebounceScheduler {
    /// Start the debounce task. Must be called inside a Tokio runtime.
    pub fn spawn<F>(quiet_period: Duration, on_settled: F) -> Self
    where
        F: Fn(TranscriptEvent) + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(rx, quiet_period, on_settled));

        Self {
            tx,
            task,
            quiet_period,
        }
    }

    /// Record a new transcript event, cancelling any pending one.
    pub fn on_event(&self, event: TranscriptEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| TranscriptError::SchedulerClosed)
    }

    /// Configured quiet period.
    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Stop the task. A pending event is discarded without firing.
    pub async fn shutdown(self) {
        let Self { tx, task, .. } = self;
        drop(tx);
        if let Err(e) = task.await {
            debug!("Debounce task ended abnormally: {e}");
        }
    }
}

async fn run<F>(
    mut rx: mpsc::UnboundedReceiver<TranscriptEvent>,
    quiet_period: Duration,
    on_settled: F,
) where
    F: Fn(TranscriptEvent),
{
    let mut pending: Option<TranscriptEvent> = None;
    let mut deadline = Instant::now();

    loop {
        tokio::select! {
            biased;

            received = rx.recv() => {
                let Some(event) = received else {
                    if let Some(dropped) = pending.take() {
                        trace!(sequence = dropped.sequence, "Discarding pending event on shutdown");
                    }
                    break;
                };
                if let Some(previous) = pending.replace(event) {
                    trace!(sequence = previous.sequence, "Superseded before settling");
                }
                deadline = Instant::now() + quiet_period;
            }

            _ = sleep_until(deadline), if pending.is_some() => {
                if let Some(event) = pending.take() {
                    debug!(
                        sequence = event.sequence,
                        age_ms = event.age_at(Utc::now()).num_milliseconds(),
                        "Transcript settled"
                    );
                    on_settled(event);
                }
            }
        }
    }
}
