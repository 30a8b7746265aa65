//! Contest CLI
//!
//! Plays a game between the engines described in a TOML file and writes
//! the requested outputs.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use contest::{Contest, ContestConfig};
use search_engine::SearchConfig;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("Usage:");
    println!("  contest <config.toml>");
    println!();
    println!("Without a config file both sides play alpha-beta at depth 3 from");
    println!("the standard position. A side with no engine table in the config");
    println!("is left to a human. Set RUST_LOG to change log verbosity.");
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let config = match args.get(1).map(String::as_str) {
        Some("help" | "--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(path) => {
            let path = PathBuf::from(path);
            ContestConfig::load(&path)
                .with_context(|| format!("loading contest config {}", path.display()))?
        }
        None => ContestConfig::self_play(SearchConfig::default()),
    };

    let mut contest = Contest::new(config).context("setting up the starting position")?;
    let record = contest.run().context("playing the game")?;
    contest
        .save_outputs(&record)
        .context("saving the finished game")?;

    println!("{}", record.report());
    Ok(())
}
