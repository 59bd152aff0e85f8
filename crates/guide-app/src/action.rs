//! UI actions
//!
//! Actions produced by a frontend for the runtime to execute.

/// Actions produced by a [`crate::Driver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Publish an update.
    ///
    /// Frontends only produce this for non-empty input.
    Submit {
        /// Update text.
        update: String,
        /// Entry to file the update under. `None` uses the configured
        /// default.
        entry: Option<String>,
    },
}
