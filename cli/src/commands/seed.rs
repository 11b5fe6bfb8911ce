//! `signconnect seed`: embed scenarios into the scenario file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use signconnect_scenarios::{DEFAULT_SCENARIOS, FileScenarioStore, ScenarioSeeder};

use crate::config::AppConfig;

/// Arguments for `signconnect seed`.
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Output file (defaults to the configured scenario file).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Extra scenario as `LABEL=TEXT`. May be repeated.
    #[arg(long = "add", value_name = "LABEL=TEXT", value_parser = parse_scenario)]
    pub extra: Vec<(String, String)>,

    /// Leave out the built-in starter scenarios.
    #[arg(long)]
    pub no_defaults: bool,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

pub async fn run(args: SeedArgs, config: &AppConfig) -> anyhow::Result<()> {
    let path = args.output.unwrap_or_else(|| config.scenarios_path());
    if path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }

    let mut pairs: Vec<(&str, &str)> = Vec::new();
    if !args.no_defaults {
        pairs.extend(DEFAULT_SCENARIOS.iter().copied());
    }
    pairs.extend(args.extra.iter().map(|(label, text)| (label.as_str(), text.as_str())));
    if pairs.is_empty() {
        anyhow::bail!("nothing to seed; drop --no-defaults or pass --add");
    }

    let seeder = ScenarioSeeder::new(config.embedding.build_vectorizer());
    let records = seeder.seed(pairs).await;
    if records.is_empty() {
        anyhow::bail!("no scenario could be embedded; check the embedding settings");
    }

    FileScenarioStore::write_all(&path, &records)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    for record in &records {
        println!("{}: {}", record.label, record.source_text);
    }
    println!("Wrote {} scenarios to {}", records.len(), path.display());
    Ok(())
}

fn parse_scenario(raw: &str) -> Result<(String, String), String> {
    let (label, text) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=TEXT, got {raw:?}"))?;
    let (label, text) = (label.trim(), text.trim());
    if label.is_empty() || text.is_empty() {
        return Err("label and text must both be non-empty".to_string());
    }
    Ok((label.to_string(), text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_scenario() {
        assert_eq!(
            parse_scenario("Pharmacy = I need to pick up a prescription.").unwrap(),
            (
                "Pharmacy".to_string(),
                "I need to pick up a prescription.".to_string()
            )
        );
        assert!(parse_scenario("no separator").is_err());
        assert!(parse_scenario("=text only").is_err());
    }
}
