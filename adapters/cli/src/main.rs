#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for playing Color Match in a terminal.

mod config;
mod repl;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use color_match_persistence::{FileStore, Persistence};
use color_match_system_sampler::UniformSampler;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{config::CliConfig, repl::Repl};

/// Match a hidden color by steering three channel sliders.
#[derive(Debug, Parser)]
#[command(name = "color-match", author, version, about, long_about = None)]
struct Args {
    /// TOML file with seed, state_dir, advance_on_difficulty_change and bonus_gate.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for target colors, making a run reproducible.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding saved progress. Defaults to the platform data directory.
    #[arg(long, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Play without reading or writing saved progress.
    #[arg(long)]
    no_save: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn default_state_dir() -> Result<PathBuf> {
    Ok(dirs::data_dir()
        .context("Failed to determine data directory")?
        .join("color-match"))
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Entry point for the Color Match command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => CliConfig::from_path(path)?,
        None => CliConfig::default(),
    };

    let sampler = match args.seed.or(config.seed) {
        Some(seed) => UniformSampler::from_seed(seed),
        None => UniformSampler::from_entropy(),
    };

    let persistence = if args.no_save {
        info!("saving disabled");
        None
    } else {
        let state_dir = match args.state_dir.or(config.state_dir.clone()) {
            Some(dir) => dir,
            None => default_state_dir()?,
        };
        info!(state_dir = %state_dir.display(), "using saved progress");
        Some(Persistence::new(FileStore::new(state_dir)))
    };

    let mut repl = Repl::start(sampler, config.policy(), persistence);
    repl.run(io::stdin().lock(), io::stdout().lock())
}
