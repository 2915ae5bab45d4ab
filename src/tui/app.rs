//! Application state and key handling.

use super::input::{digit_index, move_cursor};
use crate::games::tictactoe::{GameHistory, Position};
use crossterm::event::KeyCode;
use tracing::debug;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep running.
    Continue,
    /// Leave the UI.
    Quit,
}

/// Main application state.
#[derive(Debug, Default)]
pub struct App {
    history: GameHistory,
    cursor: Position,
    message: Option<String>,
}

impl App {
    /// Creates a new application with an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the game history.
    pub fn history(&self) -> &GameHistory {
        &self.history
    }

    /// Gets the cursor position.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Status line: the last rejection if there was one, otherwise the game status.
    pub fn status_line(&self) -> String {
        match &self.message {
            Some(message) => format!("{} ({})", self.history.status(), message),
            None => self.history.status().to_string(),
        }
    }

    /// Handles one key press.
    pub fn handle_key(&mut self, key: KeyCode) -> Flow {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('r') => self.restart(),
            KeyCode::Char('u') | KeyCode::Char('[') => {
                self.history.back();
                self.message = None;
            }
            KeyCode::Char(']') => {
                self.history.forward();
                self.message = None;
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.select(self.cursor.to_index()),
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                self.cursor = move_cursor(self.cursor, key);
            }
            other => {
                if let Some(index) = digit_index(other) {
                    self.select(index);
                }
            }
        }
        Flow::Continue
    }

    fn select(&mut self, index: usize) {
        match self.history.select_square(index) {
            Ok(()) => self.message = None,
            Err(e) => {
                debug!(error = %e, index, "Move ignored");
                self.message = Some(e.to_string());
            }
        }
    }

    /// Restarts the game.
    pub fn restart(&mut self) {
        debug!("Restarting game");
        self.history.restart();
        self.message = None;
    }
}
