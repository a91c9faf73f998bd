#![forbid(unsafe_code)]

pub mod app;
pub mod render;

use std::io;
use std::io::IsTerminal as _;

use crate::error::WtdashError;

pub type Term = ratatui::Terminal<ratatui::backend::CrosstermBackend<io::Stdout>>;

#[must_use]
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

pub fn init_terminal() -> Result<Term, WtdashError> {
    use crossterm::terminal::enable_raw_mode;
    use ratatui::backend::CrosstermBackend;

    enable_raw_mode().map_err(|e| WtdashError::Other(format!("failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)
        .map_err(|e| WtdashError::Other(format!("failed to enter alt screen: {e}")))?;
    let terminal = ratatui::Terminal::new(CrosstermBackend::new(stdout))
        .map_err(|e| WtdashError::Other(format!("failed to create terminal: {e}")))?;
    Ok(terminal)
}

pub fn restore_terminal(mut terminal: Term) -> Result<(), WtdashError> {
    use crossterm::terminal::disable_raw_mode;

    disable_raw_mode().map_err(|e| WtdashError::Other(format!("failed to disable raw mode: {e}")))?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )
    .map_err(|e| WtdashError::Other(format!("failed to leave alt screen: {e}")))?;
    terminal
        .show_cursor()
        .map_err(|e| WtdashError::Other(format!("failed to show cursor: {e}")))?;
    Ok(())
}

/// Restores the terminal on drop so a panic or early return never leaves
/// the user in raw mode.
pub struct TerminalGuard {
    pub terminal: Option<Term>,
}

impl TerminalGuard {
    #[must_use]
    pub fn new(terminal: Term) -> Self {
        Self {
            terminal: Some(terminal),
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Some(terminal) = self.terminal.take() {
            let _ = restore_terminal(terminal);
        }
    }
}
