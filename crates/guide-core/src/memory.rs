//! In-process loopback broker.
//!
//! Stands in for a hosted pub/sub backend: every client connected to the
//! same [`MemoryBroker`] shares its channels. Delivery is immediate and
//! in order; there is no network, persistence or authentication beyond
//! rejecting empty keys.
//!
//! # Semantics
//!
//! - Subscribe reports `Status(Connected)` and `Subscribed` to the
//!   subscriber, then a `join` presence event to every presence subscriber
//!   of each channel.
//! - Publish stamps a strictly increasing timetoken, appends the payload to
//!   the channel history and echoes a message event to every subscriber,
//!   the publisher included.
//! - Dropping a client leaves all its channels, announcing a `leave` to
//!   their presence subscribers.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use guide_proto::Timetoken;
use serde_json::Value;

use crate::{
    client::{EventSender, ListenerId, PubSubClient},
    config::ClientConfig,
    env::{Environment, SystemEnv},
    error::{KeyKind, PubSubError},
    event::{ConnectionStatus, MessageEvent, PresenceEvent, PubSubEvent, SubscriptionChange},
};

/// Presence action sent when a client subscribes.
pub const JOIN_ACTION: &str = "join";

/// Presence action sent when a client unsubscribes.
pub const LEAVE_ACTION: &str = "leave";

type ClientKey = u64;

/// Message recorded in a channel's history.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedMessage {
    /// Identifier of the publishing client.
    pub publisher: String,
    /// Payload as published.
    pub payload: Value,
    /// Assigned timetoken.
    pub timetoken: Timetoken,
}

#[derive(Debug)]
struct ClientState {
    listeners: BTreeMap<ListenerId, EventSender>,
}

#[derive(Debug, Default)]
struct BrokerState {
    next_client: ClientKey,
    next_listener: u64,
    clients: HashMap<ClientKey, ClientState>,
    /// Channel -> subscribed client -> presence enabled.
    subscriptions: HashMap<String, BTreeMap<ClientKey, bool>>,
    history: HashMap<String, Vec<PublishedMessage>>,
    last_timetoken: Option<Timetoken>,
    publish_failure: Option<String>,
}

impl BrokerState {
    fn deliver_to(&self, client: ClientKey, event: &PubSubEvent) {
        let Some(state) = self.clients.get(&client) else {
            return;
        };
        for (id, sender) in &state.listeners {
            if sender.send(event.clone()).is_err() {
                tracing::debug!(listener = id.as_u64(), "listener receiver dropped");
            }
        }
    }

    fn deliver_presence(&self, event: &PresenceEvent) {
        let Some(subscribers) = self.subscriptions.get(&event.channel) else {
            return;
        };
        let event = PubSubEvent::Presence(event.clone());
        for (&client, &with_presence) in subscribers {
            if with_presence {
                self.deliver_to(client, &event);
            }
        }
    }

    /// Remove `client` from `channels` and announce a `leave` on each one it
    /// was subscribed to. Returns those channels.
    fn leave(&mut self, client: ClientKey, user_id: &str, channels: &[String]) -> Vec<String> {
        let mut removed = Vec::new();
        for channel in channels {
            let Some(subscribers) = self.subscriptions.get_mut(channel) else {
                continue;
            };
            if subscribers.remove(&client).is_some() {
                removed.push(channel.clone());
            }
            if subscribers.is_empty() {
                self.subscriptions.remove(channel);
            }
        }

        for channel in &removed {
            self.deliver_presence(&PresenceEvent::new(channel.clone(), LEAVE_ACTION, user_id));
        }
        removed
    }

    fn next_timetoken(&mut self, now: Timetoken) -> Timetoken {
        let token = match self.last_timetoken {
            Some(last) if last >= now => last.next(),
            _ => now,
        };
        self.last_timetoken = Some(token);
        token
    }
}

/// Shared in-process broker.
///
/// Cloning yields another handle to the same broker.
#[derive(Debug, Clone)]
pub struct MemoryBroker<E: Environment = SystemEnv> {
    state: Arc<Mutex<BrokerState>>,
    env: E,
}

impl MemoryBroker<SystemEnv> {
    /// Broker stamping timetokens from the system clock.
    pub fn new() -> Self {
        Self::with_env(SystemEnv)
    }
}

impl Default for MemoryBroker<SystemEnv> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Environment> MemoryBroker<E> {
    /// Broker stamping timetokens from the given environment.
    pub fn with_env(env: E) -> Self {
        Self { state: Arc::new(Mutex::new(BrokerState::default())), env }
    }

    /// Connect a client.
    ///
    /// Keys are checked lazily: an empty subscribe key surfaces as a status
    /// error on subscribe, an empty publish key as a publish error.
    pub fn connect(&self, config: ClientConfig) -> MemoryClient<E> {
        let mut state = self.lock();
        let key = state.next_client;
        state.next_client += 1;
        state.clients.insert(key, ClientState { listeners: BTreeMap::new() });
        tracing::debug!(client = key, user_id = %config.user_id, "client connected");

        MemoryClient { broker: self.clone(), key, config }
    }

    /// Make every publish fail with `reason` until cleared with `None`.
    pub fn fail_publishes(&self, reason: Option<String>) {
        self.lock().publish_failure = reason;
    }

    /// Deliver an arbitrary presence event to the channel's presence
    /// subscribers.
    pub fn announce(&self, event: &PresenceEvent) {
        self.lock().deliver_presence(event);
    }

    /// Report a connection failure to every listener of every client.
    pub fn disconnect_all(&self, reason: &str) {
        let state = self.lock();
        let event =
            PubSubEvent::Status(Err(PubSubError::Disconnected { reason: reason.to_string() }));
        for &client in state.clients.keys() {
            state.deliver_to(client, &event);
        }
    }

    /// Messages published on a channel, oldest first.
    pub fn history(&self, channel: &str) -> Vec<PublishedMessage> {
        self.lock().history.get(channel).cloned().unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, BrokerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Client connected to a [`MemoryBroker`].
#[derive(Debug)]
pub struct MemoryClient<E: Environment = SystemEnv> {
    broker: MemoryBroker<E>,
    key: ClientKey,
    config: ClientConfig,
}

impl<E: Environment> MemoryClient<E> {
    /// Number of listeners currently registered on this client.
    pub fn listener_count(&self) -> usize {
        self.broker.lock().clients.get(&self.key).map_or(0, |c| c.listeners.len())
    }

    /// Leave channels, announcing a `leave` to their presence subscribers.
    pub fn unsubscribe(&self, channels: &[String]) {
        let mut state = self.broker.lock();
        let removed = state.leave(self.key, &self.config.user_id, channels);

        if !removed.is_empty() {
            state.deliver_to(
                self.key,
                &PubSubEvent::SubscriptionChange(SubscriptionChange::Unsubscribed {
                    channels: removed,
                }),
            );
        }
    }
}

impl<E: Environment> Drop for MemoryClient<E> {
    fn drop(&mut self) {
        let mut state = self.broker.lock();
        let channels: Vec<String> = state
            .subscriptions
            .iter()
            .filter(|(_, subscribers)| subscribers.contains_key(&self.key))
            .map(|(channel, _)| channel.clone())
            .collect();
        state.clients.remove(&self.key);
        state.leave(self.key, &self.config.user_id, &channels);
        tracing::debug!(client = self.key, user_id = %self.config.user_id, "client dropped");
    }
}

#[async_trait]
impl<E: Environment> PubSubClient for MemoryClient<E> {
    fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn add_listener(&self, sender: EventSender) -> ListenerId {
        let mut state = self.broker.lock();
        let id = ListenerId::new(state.next_listener);
        state.next_listener += 1;
        if let Some(client) = state.clients.get_mut(&self.key) {
            client.listeners.insert(id, sender);
        }
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.broker
            .lock()
            .clients
            .get_mut(&self.key)
            .is_some_and(|c| c.listeners.remove(&id).is_some())
    }

    fn subscribe(&self, channels: &[String], with_presence: bool) {
        let mut state = self.broker.lock();

        if self.config.subscribe_key.is_empty() {
            tracing::warn!(user_id = %self.config.user_id, "subscribe with empty key");
            state.deliver_to(
                self.key,
                &PubSubEvent::Status(Err(PubSubError::InvalidKey { kind: KeyKind::Subscribe })),
            );
            return;
        }

        for channel in channels {
            state.subscriptions.entry(channel.clone()).or_default().insert(self.key, with_presence);
        }

        state.deliver_to(self.key, &PubSubEvent::Status(Ok(ConnectionStatus::Connected)));
        state.deliver_to(
            self.key,
            &PubSubEvent::SubscriptionChange(SubscriptionChange::Subscribed {
                channels: channels.to_vec(),
            }),
        );

        for channel in channels {
            state.deliver_presence(&PresenceEvent::new(
                channel.clone(),
                JOIN_ACTION,
                &self.config.user_id,
            ));
        }
    }

    async fn publish(&self, channel: &str, payload: Value) -> Result<Timetoken, PubSubError> {
        if self.config.publish_key.is_empty() {
            return Err(PubSubError::InvalidKey { kind: KeyKind::Publish });
        }

        let now = Timetoken::from_unix_duration(self.broker.env.unix_time());
        let mut state = self.broker.lock();

        if let Some(reason) = &state.publish_failure {
            return Err(PubSubError::PublishFailed { reason: reason.clone() });
        }

        let timetoken = state.next_timetoken(now);

        state.history.entry(channel.to_string()).or_default().push(PublishedMessage {
            publisher: self.config.user_id.clone(),
            payload: payload.clone(),
            timetoken,
        });

        let event = PubSubEvent::Message(MessageEvent {
            channel: channel.to_string(),
            publisher: Some(self.config.user_id.clone()),
            payload,
            timetoken,
        });
        if let Some(subscribers) = state.subscriptions.get(channel) {
            for &client in subscribers.keys() {
                state.deliver_to(client, &event);
            }
        }

        tracing::trace!(channel, %timetoken, "published");
        Ok(timetoken)
    }
}
