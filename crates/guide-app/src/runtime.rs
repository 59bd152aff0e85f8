//! Generic runtime.
//!
//! Owns the [`Store`], the messaging client and the frontend [`Driver`], and
//! runs everything that mutates the store on a single task:
//!
//! ```text
//!  client context            runtime task                 spawned tasks
//!  ──────────────            ────────────                 ─────────────
//!  listener ──events──▶ ┌───────────────┐ ──publish──▶ client.publish()
//!                       │ Store::handle │                      │
//!  driver  ──input────▶ └───────────────┘ ◀──outcome───────────┘
//!                              │
//!                            render
//! ```
//!
//! Publishing is fire-and-forget: the runtime spawns the request and keeps
//! serving input and events; the outcome re-enters as a
//! [`StoreEvent::Published`].

use std::{collections::VecDeque, sync::Arc};

use guide_core::{PubSubClient, PubSubError, PubSubEvent};
use guide_proto::Timetoken;
use tokio::sync::mpsc;

use crate::{
    AppAction, Driver, RuntimeError, Store,
    event::{StoreAction, StoreEvent},
    listener::Registration,
};

type PublishOutcome = Result<Timetoken, PubSubError>;

/// Runtime connecting a store to a messaging client and a frontend.
pub struct Runtime<C: PubSubClient, D: Driver> {
    store: Store,
    client: Arc<C>,
    driver: D,
    registration: Option<Registration<C>>,
    events_tx: mpsc::UnboundedSender<PubSubEvent>,
    events_rx: mpsc::UnboundedReceiver<PubSubEvent>,
    outcomes_tx: mpsc::UnboundedSender<PublishOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<PublishOutcome>,
}

impl<C: PubSubClient, D: Driver> Runtime<C, D> {
    /// Create a runtime. Nothing is registered or subscribed until
    /// [`Self::start`] or [`Self::run`].
    pub fn new(store: Store, client: Arc<C>, driver: D) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            store,
            client,
            driver,
            registration: None,
            events_tx,
            events_rx,
            outcomes_tx,
            outcomes_rx,
        }
    }

    /// Current store state.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Frontend driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Whether the listener is currently registered.
    pub fn is_listening(&self) -> bool {
        self.registration.is_some()
    }

    /// Register the listener, then subscribe.
    ///
    /// Calling it again while already listening does nothing.
    pub fn start(&mut self) {
        if self.registration.is_some() {
            return;
        }
        self.registration = Some(Registration::new(self.client.clone(), self.events_tx.clone()));
        let actions = self.store.start();
        self.execute(actions);
    }

    /// Remove the listener. Events already queued are discarded.
    pub fn stop(&mut self) {
        self.registration = None;
        while self.events_rx.try_recv().is_ok() {}
    }

    /// Publish an update, as if submitted from the frontend.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self, update: &str, entry: Option<&str>) {
        let actions = match entry {
            Some(entry) => self.store.publish_entry(update, entry),
            None => self.store.publish(update),
        };
        self.execute(actions);
    }

    /// Wait for the next client event or publish outcome and apply it.
    ///
    /// The runtime holds both senders, so this waits indefinitely while idle.
    pub async fn step(&mut self) {
        tokio::select! {
            Some(event) = self.events_rx.recv() => {
                self.dispatch(StoreEvent::PubSub(event));
            },
            Some(outcome) = self.outcomes_rx.recv() => {
                self.dispatch(StoreEvent::Published(outcome));
            },
            else => {},
        }
    }

    /// Apply everything already queued without waiting.
    ///
    /// Returns the number of events applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        loop {
            if let Ok(event) = self.events_rx.try_recv() {
                self.dispatch(StoreEvent::PubSub(event));
            } else if let Ok(outcome) = self.outcomes_rx.try_recv() {
                self.dispatch(StoreEvent::Published(outcome));
            } else {
                return applied;
            }
            applied += 1;
        }
    }

    /// Run until the driver asks to quit, returning the final store.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails; messaging failures are absorbed
    /// by the store.
    pub async fn run(mut self) -> Result<Store, RuntimeError<D::Error>> {
        self.start();
        let result = self.run_loop().await;
        self.stop();
        self.driver.stop();
        result.map(|()| self.store)
    }

    async fn run_loop(&mut self) -> Result<(), RuntimeError<D::Error>> {
        self.driver.render(&self.store).map_err(RuntimeError::Driver)?;

        loop {
            tokio::select! {
                input = self.driver.poll_input() => {
                    let actions = input.map_err(RuntimeError::Driver)?;
                    if !self.apply(actions) {
                        return Ok(());
                    }
                },
                Some(event) = self.events_rx.recv() => {
                    self.dispatch(StoreEvent::PubSub(event));
                },
                Some(outcome) = self.outcomes_rx.recv() => {
                    self.dispatch(StoreEvent::Published(outcome));
                },
            }

            self.driver.render(&self.store).map_err(RuntimeError::Driver)?;
        }
    }

    /// Apply frontend actions. Returns false on quit.
    fn apply(&mut self, actions: Vec<AppAction>) -> bool {
        for action in actions {
            match action {
                AppAction::Quit => {
                    tracing::info!("quit requested");
                    return false;
                },
                AppAction::Submit { update, entry } => self.submit(&update, entry.as_deref()),
                AppAction::Render => {},
            }
        }
        true
    }

    fn dispatch(&mut self, event: StoreEvent) {
        let actions = self.store.handle(event);
        self.execute(actions);
    }

    fn execute(&mut self, actions: Vec<StoreAction>) {
        let mut queue = VecDeque::from(actions);
        while let Some(action) = queue.pop_front() {
            match action {
                StoreAction::Subscribe { channels, with_presence } => {
                    self.client.subscribe(&channels, with_presence);
                },
                StoreAction::Publish { channel, payload } => {
                    let value = match payload.to_value() {
                        Ok(value) => value,
                        Err(e) => {
                            let outcome = Err(PubSubError::Payload { reason: e.to_string() });
                            queue.extend(self.store.handle(StoreEvent::Published(outcome)));
                            continue;
                        },
                    };

                    let client = self.client.clone();
                    let outcomes = self.outcomes_tx.clone();
                    tokio::spawn(async move {
                        let outcome = client.publish(&channel, value).await;
                        // Receiver only goes away with the runtime.
                        let _ = outcomes.send(outcome);
                    });
                },
            }
        }
    }
}
