//! Driver trait for abstracting frontend I/O.
//!
//! The [`Driver`] trait decouples the runtime from a specific UI. Each
//! frontend implements it to read user input and render the store, while
//! the generic [`crate::Runtime`] handles the messaging client.

use std::future::Future;

use crate::{AppAction, Store};

/// Abstracts input and rendering for the application runtime.
pub trait Driver: Send {
    /// Frontend-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for user input and return the actions it produced.
    ///
    /// Must be cancel safe: the runtime drops the future whenever a
    /// messaging event arrives first.
    fn poll_input(&mut self) -> impl Future<Output = Result<Vec<AppAction>, Self::Error>> + Send;

    /// Render the store's current state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, store: &Store) -> Result<(), Self::Error>;

    /// Release frontend resources.
    fn stop(&mut self);
}
