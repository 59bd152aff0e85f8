//! Owned listener registration.

use std::sync::Arc;

use guide_core::{EventSender, ListenerId, PubSubClient};

/// Listener registered on a client for as long as this value lives.
///
/// Dropping it unregisters the listener, so events stop flowing to a
/// receiver whose owner is gone.
#[derive(Debug)]
pub struct Registration<C: PubSubClient> {
    client: Arc<C>,
    id: ListenerId,
}

impl<C: PubSubClient> Registration<C> {
    /// Register `sender` on `client`.
    pub fn new(client: Arc<C>, sender: EventSender) -> Self {
        let id = client.add_listener(sender);
        tracing::debug!(listener = id.as_u64(), "listener registered");
        Self { client, id }
    }

    /// Identifier assigned by the client.
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl<C: PubSubClient> Drop for Registration<C> {
    fn drop(&mut self) {
        if self.client.remove_listener(self.id) {
            tracing::debug!(listener = self.id.as_u64(), "listener removed");
        } else {
            tracing::warn!(listener = self.id.as_u64(), "listener was already removed");
        }
    }
}
