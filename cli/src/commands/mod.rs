//! Subcommand implementations.

pub mod matching;
pub mod run;
pub mod seed;
