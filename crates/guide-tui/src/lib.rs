//! Terminal UI for the guide
//!
//! A thin shell over [`guide_app::Driver`] that provides terminal-specific
//! I/O. All orchestration lives in the generic [`guide_app::Runtime`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod commands;
pub mod input;
pub mod terminal;
pub mod ui;

pub use cli::Args;
pub use commands::Command;
pub use guide_app::{AppAction, Driver, Runtime, Store};
pub use input::{INITIAL_INPUT, InputState, KeyInput};
pub use terminal::{TerminalDriver, TerminalError};
