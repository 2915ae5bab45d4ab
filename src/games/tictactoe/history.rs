//! Time travel through a tic-tac-toe game.
//!
//! Every accepted move appends a board snapshot. The caller can jump to any
//! earlier snapshot and keep playing from there, which drops the snapshots
//! that came after it.

use super::action::MoveError;
use super::rules::validate_move;
use super::status::{compute_status, GameStatus};
use super::{Board, Player, Position, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Errors from navigating or extending a [`GameHistory`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum HistoryError {
    /// The move itself was rejected.
    #[display("{}", _0)]
    #[from]
    Move(MoveError),

    /// No snapshot exists at the requested step.
    #[display("Step {} out of range (history has {} steps)", step, len)]
    StepOutOfRange {
        /// Requested step.
        step: usize,
        /// Number of recorded steps.
        len: usize,
    },

    /// A recorded snapshot is not one legal move away from the one before it.
    #[display("Step {} does not follow from the step before it", step)]
    Unreachable {
        /// Offending step.
        step: usize,
    },
}

impl std::error::Error for HistoryError {}

/// Board snapshots of one game, with a cursor on the step being viewed.
///
/// Deserializing checks that step 0 is the empty board, that each later step
/// adds one legal mark for the player whose turn it was, and that the cursor
/// points at a recorded step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameHistory")]
pub struct GameHistory {
    steps: Vec<Board>,
    current: usize,
}

/// Wire form of [`GameHistory`], checked before it becomes one.
#[derive(Deserialize)]
struct RawGameHistory {
    steps: Vec<Board>,
    current: usize,
}

impl TryFrom<RawGameHistory> for GameHistory {
    type Error = HistoryError;

    fn try_from(raw: RawGameHistory) -> Result<Self, Self::Error> {
        let RawGameHistory { steps, current } = raw;
        if current >= steps.len() {
            return Err(HistoryError::StepOutOfRange {
                step: current,
                len: steps.len(),
            });
        }
        if steps[0] != Board::new() {
            return Err(HistoryError::Unreachable { step: 0 });
        }
        for (i, pair) in steps.windows(2).enumerate() {
            if !follows(&pair[0], &pair[1], player_at(i)) {
                return Err(HistoryError::Unreachable { step: i + 1 });
            }
        }
        Ok(Self { steps, current })
    }
}

/// X moves on even steps, O on odd ones.
fn player_at(step: usize) -> Player {
    if step % 2 == 0 { Player::X } else { Player::O }
}

/// True if `next` is `prev` plus one legal mark by `player`.
fn follows(prev: &Board, next: &Board, player: Player) -> bool {
    let changed: Vec<Position> = Position::ALL
        .into_iter()
        .filter(|&pos| prev.get(pos) != next.get(pos))
        .collect();
    match changed.as_slice() {
        [pos] => {
            validate_move(prev, pos.to_index()).is_ok()
                && next.get(*pos) == Square::Occupied(player)
        }
        _ => false,
    }
}

impl GameHistory {
    /// Creates a history holding only the empty board.
    #[instrument]
    pub fn new() -> Self {
        Self {
            steps: vec![Board::new()],
            current: 0,
        }
    }

    /// Returns the board at the current step.
    pub fn current_board(&self) -> &Board {
        &self.steps[self.current]
    }

    /// Returns the step being viewed (0 is the empty board).
    pub fn step(&self) -> usize {
        self.current
    }

    /// Number of recorded steps, including the empty board.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false: the empty board is never discarded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// X moves on even steps, O on odd ones.
    pub fn next_player(&self) -> Player {
        player_at(self.current)
    }

    /// Returns the status at the current step.
    pub fn status(&self) -> GameStatus {
        compute_status(self.current_board(), self.next_player())
    }

    /// Labels for every recorded step, suitable for a move list.
    pub fn moves(&self) -> Vec<String> {
        (0..self.steps.len())
            .map(|step| match step {
                0 => "Go to game start".to_string(),
                n => format!("Go to move #{}", n),
            })
            .collect()
    }

    /// Plays `index` on the current board.
    ///
    /// Steps after the current one are discarded before the new board is
    /// recorded.
    ///
    /// # Errors
    ///
    /// Same rejections as [`GameEngine::apply_move`](super::GameEngine::apply_move).
    #[instrument(skip(self), fields(step = self.current))]
    pub fn select_square(&mut self, index: usize) -> Result<(), HistoryError> {
        let board = *self.current_board();
        let pos = validate_move(&board, index)?;

        let next = board.with(pos, Square::Occupied(self.next_player()));
        let dropped = self.steps.len() - self.current - 1;
        if dropped > 0 {
            debug!(dropped, "Discarding future steps");
        }
        self.steps.truncate(self.current + 1);
        self.steps.push(next);
        self.current += 1;

        info!(position = %pos, step = self.current, "Square selected");
        Ok(())
    }

    /// Moves the view to `step`.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::StepOutOfRange`] if no such step was recorded.
    #[instrument(skip(self))]
    pub fn jump_to(&mut self, step: usize) -> Result<(), HistoryError> {
        if step >= self.steps.len() {
            return Err(HistoryError::StepOutOfRange {
                step,
                len: self.steps.len(),
            });
        }
        self.current = step;
        debug!(step, "Jumped");
        Ok(())
    }

    /// Steps one move back, if possible. Returns whether the view moved.
    pub fn back(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Steps one move forward, if possible. Returns whether the view moved.
    pub fn forward(&mut self) -> bool {
        if self.current + 1 >= self.steps.len() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Forgets every step and starts from an empty board.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        *self = Self::new();
    }
}

impl Default for GameHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_history_has_single_empty_step() {
        let history = GameHistory::new();
        assert_eq!(history.len(), 1);
        assert_eq!(history.step(), 0);
        assert_eq!(history.moves(), vec!["Go to game start".to_string()]);
        assert_eq!(history.status(), GameStatus::InProgress(Player::X));
    }

    #[test]
    fn test_back_and_forward_stop_at_ends() {
        let mut history = GameHistory::new();
        assert!(!history.back());
        history.select_square(0).expect("valid move");
        assert!(!history.forward());
        assert!(history.back());
        assert_eq!(history.step(), 0);
        assert!(history.forward());
        assert_eq!(history.step(), 1);
    }

    #[test]
    fn test_jump_out_of_range() {
        let mut history = GameHistory::new();
        assert_eq!(
            history.jump_to(3),
            Err(HistoryError::StepOutOfRange { step: 3, len: 1 })
        );
        assert_eq!(history.step(), 0);
    }

    #[test]
    fn test_move_errors_pass_through() {
        let mut history = GameHistory::new();
        history.select_square(4).expect("valid move");
        assert_eq!(
            history.select_square(4),
            Err(HistoryError::Move(MoveError::CellOccupied(Position::Center)))
        );
        assert_eq!(
            history.select_square(11),
            Err(HistoryError::Move(MoveError::IndexOutOfRange(11)))
        );
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_serde_keeps_a_rewound_game() {
        let mut history = GameHistory::new();
        for index in [4, 0, 8] {
            history.select_square(index).expect("valid move");
        }
        history.jump_to(1).expect("recorded step");

        let json = serde_json::to_string(&history).unwrap();
        let restored: GameHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, history);
        assert_eq!(restored.next_player(), Player::O);
    }

    #[test]
    fn test_deserialize_rejects_missing_or_stray_cursor() {
        let empty = serde_json::from_str::<GameHistory>(r#"{"steps":[],"current":0}"#);
        assert!(empty.is_err());

        let json = serde_json::to_string(&GameHistory::new())
            .unwrap()
            .replace(r#""current":0"#, r#""current":1"#);
        assert!(serde_json::from_str::<GameHistory>(&json).is_err());
    }

    #[test]
    fn test_raw_steps_must_follow_each_other() {
        let start = Board::new();
        let x_center = start.with(Position::Center, Square::Occupied(Player::X));
        let o_center = start.with(Position::Center, Square::Occupied(Player::O));
        let two_marks = x_center.with(Position::TopLeft, Square::Occupied(Player::X));

        let check = |steps: Vec<Board>| {
            GameHistory::try_from(RawGameHistory { steps, current: 0 })
        };
        assert!(check(vec![start, x_center]).is_ok());
        assert_eq!(
            check(vec![start, o_center]),
            Err(HistoryError::Unreachable { step: 1 })
        );
        assert_eq!(
            check(vec![start, two_marks]),
            Err(HistoryError::Unreachable { step: 1 })
        );
        assert_eq!(
            check(vec![x_center]),
            Err(HistoryError::Unreachable { step: 0 })
        );
    }
}
