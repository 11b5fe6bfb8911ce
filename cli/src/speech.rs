//! Speaking the chosen reply.

use anyhow::Context;
use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, info};

use crate::config::SpeechConfig;

/// Turns a chosen reply into audio.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Start speaking `text`, interrupting anything already playing.
    async fn speak(&self, text: &str) -> anyhow::Result<()>;

    /// Stop the current utterance, if any.
    async fn stop(&self);
}

/// Build the synthesizer described by `config`.
pub fn from_config(config: &SpeechConfig) -> Box<dyn SpeechSynthesizer> {
    if config.enabled {
        Box::new(CommandSynthesizer::new(&config.command).with_voice(config.voice.clone()))
    } else {
        Box::new(LogSynthesizer)
    }
}

/// Speaks through an external text-to-speech command such as macOS `say`.
pub struct CommandSynthesizer {
    program: String,
    voice: Option<String>,
    playing: Mutex<Option<oneshot::Sender<()>>>,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            voice: None,
            playing: Mutex::new(None),
        }
    }

    pub fn with_voice(mut self, voice: Option<String>) -> Self {
        self.voice = voice;
        self
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSynthesizer {
    async fn speak(&self, text: &str) -> anyhow::Result<()> {
        self.stop().await;

        let mut command = Command::new(&self.program);
        if let Some(voice) = &self.voice {
            command.arg("-v").arg(voice);
        }
        let mut child = command
            .arg(text)
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {}", self.program))?;

        let (stop_tx, stop_rx) = oneshot::channel();
        *self.playing.lock().await = Some(stop_tx);

        tokio::spawn(async move {
            tokio::select! {
                status = child.wait() => debug!(?status, "Utterance finished"),
                _ = stop_rx => {
                    if let Err(e) = child.kill().await {
                        debug!("Failed to stop utterance: {e}");
                    }
                }
            }
        });
        Ok(())
    }

    async fn stop(&self) {
        if let Some(stop_tx) = self.playing.lock().await.take() {
            // The utterance may already have finished.
            let _ = stop_tx.send(());
        }
    }
}

/// Prints the reply instead of speaking it.
pub struct LogSynthesizer;

#[async_trait]
impl SpeechSynthesizer for LogSynthesizer {
    async fn speak(&self, text: &str) -> anyhow::Result<()> {
        info!("Speaking: {text}");
        println!("🔊 {text}");
        Ok(())
    }

    async fn stop(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_command_is_an_error() {
        let synthesizer = CommandSynthesizer::new("signconnect-no-such-tts-command");

        let err = synthesizer.speak("hello").await.unwrap_err();
        assert!(err.to_string().contains("failed to spawn"));
    }

    #[tokio::test]
    async fn test_disabled_speech_only_logs() {
        let synthesizer = from_config(&SpeechConfig {
            enabled: false,
            ..SpeechConfig::default()
        });

        synthesizer.speak("hello").await.unwrap();
        synthesizer.stop().await;
    }
}
