//! `signconnect match`: show how a sentence scores against the scenarios.

use anyhow::Context;
use clap::Args;
use signconnect_scenarios::{FileScenarioStore, ScenarioStore, SimilarityIndex};

use crate::config::AppConfig;

/// Arguments for `signconnect match`.
#[derive(Args, Debug)]
pub struct MatchArgs {
    /// Sentence to match.
    pub text: String,

    /// Number of scenarios to list.
    #[arg(long, default_value = "3")]
    pub top: usize,
}

pub async fn run(args: MatchArgs, config: &AppConfig) -> anyhow::Result<()> {
    let store = FileScenarioStore::new(config.scenarios_path());
    let records = store
        .list_all()
        .await
        .context("failed to load scenarios; run `signconnect seed` first")?;

    let query = config
        .embedding
        .build_vectorizer()
        .embed(&args.text)
        .await
        .context("failed to embed text")?;

    let index = SimilarityIndex::new(records).with_threshold(config.orchestrator.match_threshold);
    for (record, score) in index.rank(&query, args.top) {
        println!("{score:>7.4}  {}", record.label);
    }

    let (result, record) = index.resolve(&query);
    match record {
        Some(record) => println!("Context: {} ({:.4})", record.label, result.score),
        None => println!(
            "Context: none (best {:.4}, needs > {})",
            result.score,
            index.threshold()
        ),
    }
    Ok(())
}
