//! Cursor movement for keyboard navigation.

use crate::games::tictactoe::Position;
use crossterm::event::KeyCode;

/// Moves cursor based on arrow keys, stopping at the board edges.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (row, col) = (cursor.row(), cursor.col());

    let (row, col) = match key {
        KeyCode::Right if col < 2 => (row, col + 1),
        KeyCode::Left if col > 0 => (row, col - 1),
        KeyCode::Down if row < 2 => (row + 1, col),
        KeyCode::Up if row > 0 => (row - 1, col),
        _ => (row, col),
    };

    Position::from_index(row * 3 + col).unwrap_or(cursor)
}

/// Maps digit keys `1`-`9` to board indices 0-8.
pub fn digit_index(key: KeyCode) -> Option<usize> {
    match key {
        KeyCode::Char(c) => match c.to_digit(10) {
            Some(d @ 1..=9) => Some(d as usize - 1),
            _ => None,
        },
        _ => None,
    }
}
