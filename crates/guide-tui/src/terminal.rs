//! Terminal driver.
//!
//! Raw mode and the alternate screen are entered on construction and
//! restored on [`Driver::stop`] or drop, whichever comes first.

use std::{
    future::Future,
    io::{self, Stdout},
};

use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use guide_app::{AppAction, Driver, Store};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;

use crate::{
    input::{InputState, KeyInput},
    ui,
};

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// Terminal I/O failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

/// [`Driver`] for an interactive terminal.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    events: EventStream,
    input: InputState,
    active: bool,
}

impl TerminalDriver {
    /// Take over the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or the alternate screen is unavailable.
    pub fn new() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal, events: EventStream::new(), input: InputState::default(), active: true })
    }

    /// Current input line.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    fn restore(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    fn poll_input(&mut self) -> impl Future<Output = Result<Vec<AppAction>, TerminalError>> + Send {
        async move {
            match self.events.next().await {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    Ok(self.input.handle_key(KeyInput::from(key)))
                },
                Some(Ok(Event::Resize(..))) => Ok(vec![AppAction::Render]),
                Some(Ok(_)) => Ok(Vec::new()),
                Some(Err(e)) => Err(e.into()),
                None => Ok(vec![AppAction::Quit]),
            }
        }
    }

    fn render(&mut self, store: &Store) -> Result<(), TerminalError> {
        let input = &self.input;
        self.terminal.draw(|frame| ui::draw(frame, store, input))?;
        Ok(())
    }

    fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Err(e) = self.restore() {
            tracing::warn!(error = %e, "failed to restore terminal");
        }
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
