//! Terminal host for the palette
//!
//! Shows the page's links, mounts a [`Spotlight`](crate::Spotlight) over them
//! and routes crossterm key events to it.

pub mod app;
pub mod colors;
pub mod search;
pub mod surface;
pub mod ui;

use crate::config::SpotlightConfig;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};

pub use app::App;

struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run the interactive view until the user quits
pub fn run(config: &SpotlightConfig, html: &str) -> crate::Result<()> {
    let mut app = App::new(config, html)?;
    let mut guard = TerminalGuard::enter()?;
    let result = app.run(&mut guard.terminal);
    drop(guard);

    tracing::info!(location = ?app.location(), "session ended");
    result
}
