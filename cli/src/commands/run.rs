//! `signconnect run`: the live conversation loop.
//!
//! Each stdin line is the transcript as currently recognized. Commands:
//! `/1`, `/2`, `/3` speak the casual, formal or quick reply, `/clear` hides
//! the suggestions, `/quit` exits.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use signconnect_orchestrator::{ContextOrchestrator, OrchestratorHandle, OrchestratorState};
use signconnect_scenarios::FileScenarioStore;
use signconnect_suggestions::{OpenAIChatGenerator, SuggestionGenerator, Tone};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::{AppConfig, SpeechConfig};
use crate::speech::{self, SpeechSynthesizer};

/// Arguments for `signconnect run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Scenario file (overrides the configured one).
    #[arg(short, long)]
    pub scenarios: Option<PathBuf>,

    /// Print replies instead of speaking them.
    #[arg(long)]
    pub mute: bool,
}

/// A parsed stdin line.
#[derive(Debug, PartialEq)]
enum Input {
    Transcript(String),
    Speak(Tone),
    Clear,
    Quit,
}

impl Input {
    fn parse(line: &str) -> Self {
        match line.trim() {
            "/1" => Input::Speak(Tone::Casual),
            "/2" => Input::Speak(Tone::Formal),
            "/3" => Input::Speak(Tone::Quick),
            "/clear" => Input::Clear,
            "/quit" | "/exit" => Input::Quit,
            text => Input::Transcript(text.to_string()),
        }
    }
}

pub async fn run(args: RunArgs, config: &AppConfig) -> anyhow::Result<()> {
    let scenarios_path = args.scenarios.unwrap_or_else(|| config.scenarios_path());
    if !scenarios_path.exists() {
        warn!(
            "No scenario file at {}; run `signconnect seed` to create one",
            scenarios_path.display()
        );
    }

    let generator = OpenAIChatGenerator::from_config(&config.generator);
    if !generator.is_available() {
        warn!("No API key for the suggestion generator; suggestions will fail");
    }

    let handle = ContextOrchestrator::new(
        config.embedding.build_vectorizer(),
        Arc::new(FileScenarioStore::new(&scenarios_path)),
        Arc::new(generator),
    )
    .with_config(config.orchestrator.clone())
    .spawn();

    let speech_config = if args.mute {
        SpeechConfig {
            enabled: false,
            ..config.speech.clone()
        }
    } else {
        config.speech.clone()
    };
    let synthesizer = speech::from_config(&speech_config);

    let renderer = tokio::spawn(render_states(handle.subscribe()));
    println!("Type what the other person says. /1 /2 /3 to reply, /clear, /quit.");

    let result = input_loop(&handle, synthesizer.as_ref()).await;

    synthesizer.stop().await;
    handle.shutdown().await;
    renderer.abort();
    result
}

async fn input_loop(
    handle: &OrchestratorHandle,
    synthesizer: &dyn SpeechSynthesizer,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                return Ok(());
            }
        };
        let Some(line) = line else {
            return Ok(());
        };

        match Input::parse(&line) {
            Input::Transcript(text) => {
                handle.submit_transcript(text)?;
            }
            Input::Speak(tone) => match handle.state().suggestions {
                Some(suggestions) => {
                    let text = suggestions.get(tone);
                    if let Err(e) = synthesizer.speak(text).await {
                        warn!("Speech failed: {e:#}");
                        println!("🔊 {text}");
                    }
                }
                None => println!("No suggestions yet."),
            },
            Input::Clear => handle.clear_suggestions()?,
            Input::Quit => return Ok(()),
        }
    }
}

async fn render_states(mut states: watch::Receiver<OrchestratorState>) {
    while states.changed().await.is_ok() {
        let state = states.borrow_and_update().clone();
        print!("{}", render(&state));
    }
}

fn render(state: &OrchestratorState) -> String {
    let mut out = String::new();
    let context = state
        .current_context
        .as_ref()
        .map_or_else(|| "none".to_string(), |c| format!("{} ({:.2})", c.label, c.score));
    let busy = if state.is_busy { " …thinking" } else { "" };
    out.push_str(&format!("\n[context: {context}]{busy}\n"));

    if let Some(suggestions) = &state.suggestions {
        for (n, (tone, text)) in suggestions.iter().enumerate() {
            out.push_str(&format!("  /{} {tone:<6} {text}\n", n + 1));
        }
    }
    if let Some(error) = &state.last_error {
        out.push_str(&format!("  ! {error}\n"));
    }
    out
}
