//! Squares - a type-safe tic-tac-toe engine
//!
//! # Architecture
//!
//! - **Games**: the tic-tac-toe engine, its pure rules and derived status,
//!   plus a time-travel history of board snapshots
//! - **Storage**: a key-value store abstraction and a counter persisted
//!   through it
//! - **Config**: TOML settings for the store and counter
//! - **Front-ends**: the `clap` CLI and a ratatui terminal UI
//!
//! # Example
//!
//! ```
//! use squares::{GameEngine, GameStatus, MoveError, TicTacToePlayer as Player};
//!
//! let mut engine = GameEngine::new();
//! engine.apply_move(4)?;
//! assert_eq!(engine.status(), GameStatus::InProgress(Player::O));
//! assert!(matches!(engine.apply_move(4), Err(MoveError::CellOccupied(_))));
//! # Ok::<(), MoveError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Module declarations
pub mod cli;
mod config;
mod games;
mod storage;
pub mod tui;

// Crate-level exports - Settings
pub use config::{ConfigError, CounterSettings, Settings};

// Crate-level exports - Storage
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, PersistentCounter, StorageError};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    check_winner, compute_status, rules, Board, GameEngine, GameHistory, GameStateError, GameStatus,
    HistoryError, Move, MoveError, Position, Square, Player as TicTacToePlayer,
};
