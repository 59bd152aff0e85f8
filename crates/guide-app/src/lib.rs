//! Application layer for the guide client
//!
//! A pure store state machine plus a generic runtime that connects it to a
//! messaging client and a frontend, so the same orchestration runs in the
//! terminal UI and in tests.
//!
//! # Components
//!
//! - [`Store`]: Message log and event handling (no I/O)
//! - [`Driver`]: Trait for frontend-specific input and rendering
//! - [`Runtime`]: Orchestration loop marshalling client events onto one task
//! - [`Registration`]: Owned listener registration, removed on drop

mod action;
mod config;
mod driver;
mod error;
mod event;
mod listener;
mod message;
mod runtime;
mod store;

pub use action::AppAction;
pub use config::{AUTO_PUBLISH_TEXT, DEFAULT_CHANNEL, DecodeFailurePolicy, StoreConfig};
pub use driver::Driver;
pub use error::RuntimeError;
pub use event::{StoreAction, StoreEvent};
pub use listener::Registration;
pub use message::{Category, Message};
pub use runtime::Runtime;
pub use store::Store;
