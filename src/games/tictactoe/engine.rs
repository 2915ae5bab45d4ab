//! Tic-tac-toe game engine.

use super::action::{Move, MoveError};
use super::rules::{check_winner, validate_move};
use super::status::{compute_status, GameStatus};
use super::{Board, Player, Position, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// A serialized [`GameEngine`] that no sequence of legal moves produces.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameStateError {
    /// The recorded moves cannot be replayed from an empty board.
    #[display("Move #{} cannot be replayed: {}", step, error)]
    Unplayable {
        /// One-based number of the offending move.
        step: usize,
        /// Why the move was rejected.
        error: MoveError,
    },

    /// The recorded moves were made out of turn.
    #[display("Move #{} was made by {} out of turn", step, player)]
    OutOfTurn {
        /// One-based number of the offending move.
        step: usize,
        /// Player recorded for that move.
        player: Player,
    },

    /// The board or the player to move disagrees with the recorded moves.
    #[display("Board or next player does not match the recorded moves")]
    Mismatch,
}

impl std::error::Error for GameStateError {}

/// Wire form of [`GameEngine`], checked before it becomes one.
#[derive(Deserialize)]
struct RawGameEngine {
    board: Board,
    next_player: Player,
    history: Vec<Move>,
}

impl TryFrom<RawGameEngine> for GameEngine {
    type Error = GameStateError;

    fn try_from(raw: RawGameEngine) -> Result<Self, Self::Error> {
        let mut engine = Self::new();
        for (i, mv) in raw.history.iter().enumerate() {
            let step = i + 1;
            if mv.player != engine.next_player {
                return Err(GameStateError::OutOfTurn {
                    step,
                    player: mv.player,
                });
            }
            engine
                .apply_move(mv.position.to_index())
                .map_err(|error| GameStateError::Unplayable { step, error })?;
        }

        if engine.board != raw.board || engine.next_player != raw.next_player {
            return Err(GameStateError::Mismatch);
        }
        Ok(engine)
    }
}

/// Owns the board and the player to move.
///
/// The board only changes through [`GameEngine::apply_move`]; callers get a
/// shared reference for rendering. Status is recomputed on every call to
/// [`GameEngine::status`].
///
/// Deserializing replays the recorded moves, so a stored engine is always
/// one that [`GameEngine::apply_move`] could have built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameEngine")]
pub struct GameEngine {
    board: Board,
    next_player: Player,
    history: Vec<Move>,
}

impl GameEngine {
    /// Creates a new game: empty board, X to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            next_player: Player::X,
            history: Vec::new(),
        }
    }

    /// Builds an engine by applying `indices` in order.
    ///
    /// # Errors
    ///
    /// Returns the first rejected move's error.
    #[instrument]
    pub fn replay(indices: &[usize]) -> Result<Self, MoveError> {
        let mut engine = Self::new();
        for &index in indices {
            engine.apply_move(index)?;
        }
        Ok(engine)
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player who moves next.
    pub fn next_player(&self) -> Player {
        self.next_player
    }

    /// Returns the accepted moves, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Returns the winner, if any.
    pub fn winner(&self) -> Option<Player> {
        check_winner(&self.board)
    }

    /// Returns the current game status.
    pub fn status(&self) -> GameStatus {
        compute_status(&self.board, self.next_player)
    }

    /// Returns true once the game has been won or drawn.
    pub fn is_over(&self) -> bool {
        self.status().is_over()
    }

    /// Returns the empty positions.
    pub fn valid_moves(&self) -> Vec<Position> {
        Position::valid_moves(&self.board)
    }

    /// Places the next player's mark at `index` (0-8) and passes the turn.
    ///
    /// # Errors
    ///
    /// - [`MoveError::GameAlreadyOver`] if someone has already won.
    /// - [`MoveError::IndexOutOfRange`] if `index > 8`.
    /// - [`MoveError::CellOccupied`] if the square is taken.
    ///
    /// A full board without a winner is not checked separately: every index
    /// is occupied, so the move fails with `CellOccupied`.
    #[instrument(skip(self), fields(player = %self.next_player))]
    pub fn apply_move(&mut self, index: usize) -> Result<(), MoveError> {
        let pos = validate_move(&self.board, index)?;

        let player = self.next_player;
        self.board = self.board.with(pos, Square::Occupied(player));
        self.history.push(Move::new(player, pos));
        self.next_player = player.opponent();

        info!(position = %pos, status = %self.status(), "Move applied");
        Ok(())
    }

    /// Discards the current game and starts over.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        debug!(moves = self.history.len(), "Resetting game");
        *self = Self::new();
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_move_goes_to_x() {
        let mut engine = GameEngine::new();
        engine.apply_move(0).expect("valid move");

        assert_eq!(engine.board().get(Position::TopLeft), Square::Occupied(Player::X));
        assert_eq!(engine.next_player(), Player::O);
        assert_eq!(engine.status(), GameStatus::InProgress(Player::O));
    }

    #[test]
    fn test_occupied_rejection_is_idempotent() {
        let mut engine = GameEngine::new();
        engine.apply_move(4).expect("valid move");
        let before = engine.clone();

        for _ in 0..2 {
            assert_eq!(
                engine.apply_move(4),
                Err(MoveError::CellOccupied(Position::Center))
            );
            assert_eq!(engine, before);
        }
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut engine = GameEngine::new();
        assert_eq!(engine.apply_move(9), Err(MoveError::IndexOutOfRange(9)));
        assert_eq!(engine, GameEngine::new());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut engine = GameEngine::replay(&[0, 1, 2]).expect("valid replay");
        engine.reset();
        assert_eq!(engine, GameEngine::new());
    }

    #[test]
    fn test_valid_moves_shrink_and_game_ends() {
        let mut engine = GameEngine::new();
        assert_eq!(engine.valid_moves().len(), 9);

        for index in [0, 3, 1, 4, 2] {
            engine.apply_move(index).expect("valid move");
        }
        assert_eq!(engine.valid_moves().len(), 4);
        assert!(engine.is_over());
        assert_eq!(engine.winner(), Some(Player::X));
    }

    #[test]
    fn test_serde_keeps_a_played_game() {
        let engine = GameEngine::replay(&[4, 0, 8]).expect("valid replay");
        let json = serde_json::to_string(&engine).unwrap();
        let restored: GameEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, engine);
    }

    #[test]
    fn test_deserialize_rejects_wrong_next_player() {
        let json = serde_json::to_string(&GameEngine::new())
            .unwrap()
            .replace(r#""next_player":"X""#, r#""next_player":"O""#);
        assert!(json.contains(r#""next_player":"O""#));
        assert!(serde_json::from_str::<GameEngine>(&json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_unreachable_states() {
        let engine = GameEngine::replay(&[4]).expect("valid replay");
        let mut value = serde_json::to_value(&engine).unwrap();

        // Board says X took the center, history says nothing happened.
        let mut no_history = value.clone();
        no_history["history"] = serde_json::json!([]);
        assert!(serde_json::from_value::<GameEngine>(no_history).is_err());

        // O recorded as the opening move.
        value["history"][0]["player"] = serde_json::json!("O");
        assert!(serde_json::from_value::<GameEngine>(value).is_err());
    }

    #[test]
    fn test_raw_state_errors_name_the_move() {
        let raw = RawGameEngine {
            board: Board::new(),
            next_player: Player::X,
            history: vec![
                Move::new(Player::X, Position::Center),
                Move::new(Player::O, Position::Center),
            ],
        };
        assert_eq!(
            GameEngine::try_from(raw),
            Err(GameStateError::Unplayable {
                step: 2,
                error: MoveError::CellOccupied(Position::Center),
            })
        );
    }

    #[test]
    fn test_history_records_player_and_position() {
        let engine = GameEngine::replay(&[4, 0]).expect("valid replay");
        assert_eq!(
            engine.history(),
            &[
                Move::new(Player::X, Position::Center),
                Move::new(Player::O, Position::TopLeft),
            ]
        );
    }
}
