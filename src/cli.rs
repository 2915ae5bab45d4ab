//! Command-line interface for squares.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Squares - tic-tac-toe with time travel, plus a persisted counter
#[derive(Parser, Debug)]
#[command(name = "squares")]
#[command(about = "Tic-tac-toe engine and persisted counter", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the settings file
    #[arg(short, long, global = true, default_value = "squares.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal UI
    Play {
        /// File receiving logs while the UI owns the terminal
        #[arg(long, default_value = "squares_tui.log")]
        log_file: PathBuf,
    },

    /// Apply board indices (0-8) to a new game and print the result
    Replay {
        /// Board indices in play order
        #[arg(required = true)]
        indices: Vec<usize>,
    },

    /// Increment the persisted counter
    Counter {
        /// How many times to increment
        #[arg(short, long, default_value = "1")]
        times: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_replay() {
        let cli = Cli::parse_from(["squares", "replay", "0", "4", "8"]);
        match cli.command {
            Command::Replay { indices } => assert_eq!(indices, vec![0, 4, 8]),
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.config, PathBuf::from("squares.toml"));
    }

    #[test]
    fn test_parse_counter_with_global_config() {
        let cli = Cli::parse_from(["squares", "counter", "--times", "3", "--config", "alt.toml"]);
        assert!(matches!(cli.command, Command::Counter { times: 3 }));
        assert_eq!(cli.config, PathBuf::from("alt.toml"));
    }

    #[test]
    fn test_replay_requires_indices() {
        assert!(Cli::try_parse_from(["squares", "replay"]).is_err());
    }
}
