//! Terminal UI for squares.

mod app;
mod input;
mod ui;

pub use app::{App, Flow};

use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use tracing::{debug, error, info, instrument};

/// Runs a restore action on drop, whichever way the holder exits.
struct TerminalGuard<F: FnMut() -> io::Result<()>> {
    restore: F,
}

impl<F: FnMut() -> io::Result<()>> TerminalGuard<F> {
    fn new(restore: F) -> Self {
        Self { restore }
    }
}

impl<F: FnMut() -> io::Result<()>> Drop for TerminalGuard<F> {
    fn drop(&mut self) {
        debug!("Restoring terminal");
        if let Err(e) = (self.restore)() {
            error!(error = %e, "Failed to restore terminal");
        }
    }
}

/// Leaves raw mode and the alternate screen, and shows the cursor.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)
}

/// Runs the interactive game until the player quits.
#[instrument]
pub fn run_tui() -> Result<()> {
    info!("Starting squares TUI");

    enable_raw_mode()?;
    let _guard = TerminalGuard::new(restore_terminal);

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut App::new());

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    info!("TUI closed");
    res
}

/// Draw, wait for a key, repeat.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key.code) == Flow::Quit
        {
            info!("User quit");
            return Ok(());
        }
    }
}
