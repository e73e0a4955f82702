//! Raw-mode / alternate-screen guard for the wizard TUI.

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};

pub type WizardTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Restores the terminal when dropped, including on `?` early returns.
/// Panics are covered by [`install_panic_hook`].
pub struct TerminalGuard {
    active: AtomicBool,
}

impl TerminalGuard {
    /// Enter raw mode and the alternate screen, returning the guard and a
    /// ratatui terminal drawing to stdout.
    pub fn enter() -> Result<(Self, WizardTerminal)> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let guard = Self {
            active: AtomicBool::new(true),
        };
        execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
            .context("Failed to create terminal")?;
        Ok((guard, terminal))
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Best-effort restore; safe to call more than once.
    pub fn restore() {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        let _ = io::stdout().flush();
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.active.swap(false, Ordering::SeqCst) {
            Self::restore();
        }
    }
}

/// Restore the terminal before the default panic output is printed
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        TerminalGuard::restore();
        original_hook(panic_info);
    }));
}
