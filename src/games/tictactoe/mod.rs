//! Tic-tac-toe: board, rules, engine and time travel.

mod action;
mod engine;
mod history;
mod position;
pub mod rules;
mod status;
mod types;

pub use action::{Move, MoveError};
pub use engine::{GameEngine, GameStateError};
pub use history::{GameHistory, HistoryError};
pub use position::Position;
pub use rules::check_winner;
pub use status::{compute_status, GameStatus};
pub use types::{Board, Player, Square};
