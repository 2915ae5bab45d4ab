//! Squares - CLI entry point.

#![warn(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use squares::cli::{Cli, Command};
use squares::{GameEngine, JsonFileStore, PersistentCounter, Settings};
use std::path::Path;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { log_file } => {
            init_file_tracing(&log_file)?;
            squares::tui::run_tui()
        }
        Command::Replay { indices } => {
            init_tracing();
            run_replay(&indices)
        }
        Command::Counter { times } => {
            init_tracing();
            run_counter(&cli.config, times)
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Logs go to a file so they do not interfere with the TUI.
fn init_file_tracing(path: &Path) -> Result<()> {
    let log_file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Apply indices to a fresh game, stopping at the first rejected move.
#[instrument]
fn run_replay(indices: &[usize]) -> Result<()> {
    let mut engine = GameEngine::new();

    for &index in indices {
        if let Err(e) = engine.apply_move(index) {
            warn!(index, error = %e, "Replay stopped");
            println!("Move {} rejected: {}", index, e);
            break;
        }
    }

    println!("{}\n\n{}", engine.board(), engine.status());
    Ok(())
}

/// Open the counter against the configured store and bump it.
#[instrument]
fn run_counter(config: &Path, times: u32) -> Result<()> {
    let settings = Settings::load_or_default(config)?;
    let store = JsonFileStore::open(settings.store_path())?;

    let counter_settings = settings.counter();
    let mut counter = PersistentCounter::open(
        store,
        counter_settings.key(),
        *counter_settings.initial_count(),
        *counter_settings.step(),
    );

    for _ in 0..times {
        counter.increment();
    }

    info!(count = counter.count(), "Counter updated");
    println!("{}", counter.count());
    Ok(())
}
