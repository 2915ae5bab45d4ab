//! Derived game status.

use super::rules::{check_winner, is_full};
use super::{Board, Player};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Current status of the game. Always computed from a board, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing; the given player moves next.
    InProgress(Player),
    /// Game ended in a win.
    Won(Player),
    /// Game ended in a draw.
    Draw,
}

impl GameStatus {
    /// Returns true once the game has been won or drawn.
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress(_))
    }

    /// Returns the winner, if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameStatus::Won(player) => Some(*player),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::InProgress(player) => write!(f, "Next player: {}", player),
            GameStatus::Won(player) => write!(f, "Winner: {}", player),
            GameStatus::Draw => write!(f, "Scratch: Cat's game"),
        }
    }
}

/// Computes the status of `board`.
///
/// `next_player` only matters while the game is in progress.
#[instrument(skip(board))]
pub fn compute_status(board: &Board, next_player: Player) -> GameStatus {
    if let Some(winner) = check_winner(board) {
        GameStatus::Won(winner)
    } else if is_full(board) {
        GameStatus::Draw
    } else {
        GameStatus::InProgress(next_player)
    }
}
