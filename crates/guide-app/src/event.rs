//! Store inputs and outputs.

use guide_core::{PubSubError, PubSubEvent};
use guide_proto::{EntryUpdate, Timetoken};

/// Input to [`crate::Store::handle`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// Event delivered by the messaging client's listener.
    PubSub(PubSubEvent),

    /// Outcome of a publish previously requested through
    /// [`StoreAction::Publish`].
    Published(Result<Timetoken, PubSubError>),
}

/// Effect requested by the store. The runtime performs the I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction {
    /// Subscribe to channels.
    Subscribe {
        /// Channels to join.
        channels: Vec<String>,
        /// Whether to receive presence events.
        with_presence: bool,
    },

    /// Publish a payload without waiting for the result.
    Publish {
        /// Target channel.
        channel: String,
        /// Payload to serialize and send.
        payload: EntryUpdate,
    },
}
