//! Runtime error types.

use thiserror::Error;

/// Errors that stop the [`crate::Runtime`] loop.
///
/// Messaging failures never do: they are logged and recorded on the store.
#[derive(Debug, Error)]
pub enum RuntimeError<E: std::error::Error + 'static> {
    /// The frontend failed to read input or render.
    #[error("driver error: {0}")]
    Driver(#[source] E),
}
