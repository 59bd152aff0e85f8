//! Messaging client contract.
//!
//! The subset of a pub/sub SDK the store depends on: listener registration,
//! subscribe, and publish. Connecting is implementation-specific (see
//! [`crate::MemoryBroker::connect`]) and yields a value implementing
//! [`PubSubClient`].

use async_trait::async_trait;
use guide_proto::Timetoken;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::{config::ClientConfig, error::PubSubError, event::PubSubEvent};

/// Sending half a listener hands to the client.
pub type EventSender = mpsc::UnboundedSender<PubSubEvent>;

/// Handle identifying a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Connected pub/sub client.
///
/// Events are pushed into every registered [`EventSender`] from whatever
/// context the client runs on. Implementations must tolerate listeners
/// whose receiving half has been dropped.
#[async_trait]
pub trait PubSubClient: Send + Sync + 'static {
    /// Configuration the client was connected with.
    fn config(&self) -> &ClientConfig;

    /// Register a listener. Events are delivered from this point on.
    fn add_listener(&self, sender: EventSender) -> ListenerId;

    /// Unregister a listener.
    ///
    /// Returns false if the listener was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;

    /// Subscribe to channels, optionally receiving presence events.
    ///
    /// Outcome is reported asynchronously through status and
    /// subscription-change events.
    fn subscribe(&self, channels: &[String], with_presence: bool);

    /// Publish a payload to a channel.
    ///
    /// Resolves to the timetoken the backend assigned to the message.
    async fn publish(&self, channel: &str, payload: Value) -> Result<Timetoken, PubSubError>;
}
