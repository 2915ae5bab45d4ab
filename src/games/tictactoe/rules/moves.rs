//! Move legality for tic-tac-toe.

use super::super::action::MoveError;
use super::super::{Board, Position};
use super::win::check_winner;
use tracing::{debug, instrument};

/// Checks whether a mark may be placed at `index` on `board`.
///
/// Checks run in this order: game already won, index out of range, square
/// occupied. Returns the target position when the move is legal.
///
/// # Errors
///
/// - [`MoveError::GameAlreadyOver`] if someone has already won.
/// - [`MoveError::IndexOutOfRange`] if `index > 8`.
/// - [`MoveError::CellOccupied`] if the square is taken.
#[instrument(skip(board))]
pub fn validate_move(board: &Board, index: usize) -> Result<Position, MoveError> {
    if check_winner(board).is_some() {
        debug!("Rejected move after game end");
        return Err(MoveError::GameAlreadyOver);
    }

    let pos = Position::from_index(index).ok_or(MoveError::IndexOutOfRange(index))?;

    if !board.is_empty(pos) {
        debug!(position = %pos, "Rejected move on occupied square");
        return Err(MoveError::CellOccupied(pos));
    }

    Ok(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::{Player, Square};

    #[test]
    fn test_empty_square_is_legal() {
        assert_eq!(validate_move(&Board::new(), 4), Ok(Position::Center));
    }

    #[test]
    fn test_game_over_checked_before_bounds() {
        let board = [0, 1, 2].into_iter().fold(Board::new(), |board, i| {
            board.with(Position::ALL[i], Square::Occupied(Player::X))
        });
        assert_eq!(validate_move(&board, 9), Err(MoveError::GameAlreadyOver));
        assert_eq!(validate_move(&board, 5), Err(MoveError::GameAlreadyOver));
    }

    #[test]
    fn test_bounds_checked_before_occupancy() {
        let board = Board::new().with(Position::TopLeft, Square::Occupied(Player::O));
        assert_eq!(validate_move(&board, 9), Err(MoveError::IndexOutOfRange(9)));
        assert_eq!(
            validate_move(&board, 0),
            Err(MoveError::CellOccupied(Position::TopLeft))
        );
    }
}
