//! Input line state and key handling.
//!
//! Keys are mapped to [`KeyInput`] first so the editing logic can be tested
//! without a terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use guide_app::AppAction;

use crate::commands::{self, Command};

/// Text the input line starts with.
pub const INITIAL_INPUT: &str = "Mostly Harmless.";

/// Terminal-independent key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Delete the character before the end of the line.
    Backspace,
    /// Submit the line.
    Enter,
    /// Clear the line.
    Esc,
    /// Ctrl-C.
    Interrupt,
    /// Anything else.
    Other,
}

impl From<KeyEvent> for KeyInput {
    fn from(event: KeyEvent) -> Self {
        match event.code {
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                Self::Interrupt
            },
            KeyCode::Char(c) => Self::Char(c),
            KeyCode::Backspace => Self::Backspace,
            KeyCode::Enter => Self::Enter,
            KeyCode::Esc => Self::Esc,
            _ => Self::Other,
        }
    }
}

/// Editable input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    buffer: String,
    notice: Option<String>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::with_text(INITIAL_INPUT)
    }
}

impl InputState {
    /// Input line holding `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self { buffer: text.into(), notice: None }
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Whether there is nothing to submit.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Feedback for the last rejected command, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Take the text for submission, leaving the line empty.
    ///
    /// Returns `None` and leaves the line untouched when it is empty.
    pub fn submit(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.buffer))
    }

    /// Apply a key and return the resulting actions.
    pub fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Char(c) => {
                self.buffer.push(c);
                vec![AppAction::Render]
            },
            KeyInput::Backspace => {
                self.buffer.pop();
                vec![AppAction::Render]
            },
            KeyInput::Esc => {
                self.buffer.clear();
                vec![AppAction::Render]
            },
            KeyInput::Interrupt => vec![AppAction::Quit],
            KeyInput::Enter => self.submit().map_or_else(Vec::new, |line| self.command(&line)),
            KeyInput::Other => Vec::new(),
        }
    }

    fn command(&mut self, line: &str) -> Vec<AppAction> {
        self.notice = None;
        match commands::parse(line) {
            Command::Update { update } => vec![AppAction::Submit { update, entry: None }],
            Command::EntryUpdate { entry, update } => {
                vec![AppAction::Submit { update, entry: Some(entry) }]
            },
            Command::Quit => vec![AppAction::Quit],
            Command::InvalidArgs { error, .. } => {
                self.buffer = line.to_string();
                self.notice = Some(error);
                vec![AppAction::Render]
            },
        }
    }
}
