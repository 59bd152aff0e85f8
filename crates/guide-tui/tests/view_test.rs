//! Rendering tests against ratatui's test backend.

use std::{convert::Infallible, future::Future, sync::Arc, time::Duration};

use guide_app::{AppAction, Category, Driver, Runtime, Store, StoreConfig};
use guide_core::{ManualEnv, MemoryBroker};
use guide_tui::{InputState, KeyInput, ui};
use ratatui::{Terminal, backend::TestBackend};

/// Driver for runtimes stepped by hand.
struct NoInput;

impl Driver for NoInput {
    type Error = Infallible;

    fn poll_input(&mut self) -> impl Future<Output = Result<Vec<AppAction>, Infallible>> + Send {
        std::future::pending()
    }

    fn render(&mut self, _store: &Store) -> Result<(), Infallible> {
        Ok(())
    }

    fn stop(&mut self) {}
}

fn screen(store: &Store, input: &InputState, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| ui::draw(frame, store, input)).unwrap();

    let buffer = terminal.backend().buffer();
    (0..height)
        .map(|y| {
            let line: String = (0..width).map(|x| buffer[(x, y)].symbol()).collect();
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn row_of(screen: &str, needle: &str) -> usize {
    screen.lines().position(|line| line.contains(needle)).unwrap()
}

#[test]
fn log_renders_newest_first() {
    let mut store = Store::new(StoreConfig::default().with_user_id("arthur"));
    store.display(Category::Status, "state: connected");
    store.display(Category::Received, "entry: Earth, update: Harmless.");

    insta::assert_snapshot!(screen(&store, &InputState::default(), 40, 12), @r"
    ┌ Update ──────────────────────────────┐
    │Mostly Harmless.                      │
    └──────────────────────────────────────┘
     SUBMIT UPDATE TO THE GUIDE
    ┌ the_guide ───────────────────────────┐
    │[MESSAGE: received]                   │
    │entry: Earth, update: Harmless.       │
    │[STATUS: connection]                  │
    │state: connected                      │
    │                                      │
    └──────────────────────────────────────┘
     user: arthur
    ");
}

#[test]
fn status_line_shows_notice_before_client_error() {
    let store = Store::new(StoreConfig::default().with_user_id("ford"));
    let mut input = InputState::with_text("/entry Magrathea");
    input.handle_key(KeyInput::Enter);

    let screen = screen(&store, &input, 60, 8);

    assert!(screen.contains("user: ford | Usage: /entry <place> <update>"));
}

#[tokio::test]
async fn typed_update_is_published_and_rendered() {
    let broker = MemoryBroker::with_env(ManualEnv::starting_at(Duration::from_secs(1_587_063_296)));
    let store = Store::new(StoreConfig::default().with_user_id("arthur"));
    let client = Arc::new(broker.connect(store.client_config()));
    let mut runtime = Runtime::new(store, client, NoInput);
    runtime.start();
    runtime.drain();

    let mut input = InputState::with_text("");
    for c in "Don't panic.".chars() {
        input.handle_key(KeyInput::Char(c));
    }
    for action in input.handle_key(KeyInput::Enter) {
        if let AppAction::Submit { update, entry } = action {
            runtime.submit(&update, entry.as_deref());
        }
    }
    for _ in 0..2 {
        tokio::time::timeout(Duration::from_secs(5), runtime.step()).await.unwrap();
    }

    let screen = screen(runtime.store(), &input, 60, 20);

    assert!(input.is_empty());
    assert_eq!(broker.history("the_guide").len(), 1);
    assert!(row_of(&screen, "[PUBLISH: sent]") < row_of(&screen, "[STATUS: connection]"));
    assert!(screen.contains("entry: Earth, update: Don't panic."));
}
