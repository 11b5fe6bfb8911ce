//! `signconnect`: live reply suggestions for deaf and non-verbal users.
//!
//! Subcommands:
//!
//! - `signconnect run` -- Read the live transcript from stdin and suggest replies.
//! - `signconnect seed` -- Embed the starter scenarios into the scenario file.
//! - `signconnect match` -- Score a sentence against the stored scenarios.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod speech;

use config::AppConfig;

/// SignConnect command line.
#[derive(Parser)]
#[command(name = "signconnect", about = "Live reply suggestions for deaf and non-verbal users", version)]
struct Cli {
    /// Config file (defaults to <config dir>/signconnect/config.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Suggest replies for a live transcript read from stdin.
    Run(commands::run::RunArgs),

    /// Embed scenarios and write the scenario file.
    Seed(commands::seed::SeedArgs),

    /// Show how a sentence scores against the stored scenarios.
    Match(commands::matching::MatchArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run(args) => commands::run::run(args, &config).await,
        Commands::Seed(args) => commands::seed::run(args, &config).await,
        Commands::Match(args) => commands::matching::run(args, &config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["signconnect", "match", "a latte please", "--top", "2", "-v"])
            .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Match(args) => {
                assert_eq!(args.text, "a latte please");
                assert_eq!(args.top, 2);
            }
            _ => panic!("expected match subcommand"),
        }
    }

    #[test]
    fn test_seed_accepts_repeated_scenarios() {
        let cli = Cli::try_parse_from([
            "signconnect",
            "--config",
            "/tmp/signconnect.toml",
            "seed",
            "--add",
            "Pharmacy=I need my prescription.",
            "--add",
            "Bus=Does this bus go downtown?",
            "--no-defaults",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/signconnect.toml")));
        match cli.command {
            Commands::Seed(args) => {
                assert_eq!(args.extra.len(), 2);
                assert_eq!(args.extra[1].0, "Bus");
                assert!(args.no_defaults);
                assert!(!args.force);
            }
            _ => panic!("expected seed subcommand"),
        }
    }
}
