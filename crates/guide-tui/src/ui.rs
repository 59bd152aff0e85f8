//! Rendering.
//!
//! ```text
//! ┌ Update ─────────────────────────┐
//! │Mostly Harmless.                 │
//! └─────────────────────────────────┘
//!  SUBMIT UPDATE TO THE GUIDE
//! ┌ the_guide ──────────────────────┐
//! │[MESSAGE: received]              │  newest first
//! │entry: Earth, update: Harmless.  │
//! └─────────────────────────────────┘
//!  user: arthur | last error
//! ```

use guide_app::{Message, Store};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, Paragraph},
};

use crate::input::InputState;

/// Label of the submit hint.
pub const SUBMIT_LABEL: &str = "SUBMIT UPDATE TO THE GUIDE";

/// Draw the whole screen.
pub fn draw(frame: &mut Frame, store: &Store, input: &InputState) {
    let [input_area, hint_area, log_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_input(frame, input_area, input);
    draw_hint(frame, hint_area, input);
    draw_log(frame, log_area, store);
    draw_status(frame, status_area, store, input);
}

fn draw_input(frame: &mut Frame, area: Rect, input: &InputState) {
    let paragraph = Paragraph::new(input.text()).block(Block::bordered().title(" Update "));
    frame.render_widget(paragraph, area);

    let width = u16::try_from(input.text().chars().count()).unwrap_or(u16::MAX);
    let max_x = area.right().saturating_sub(2);
    let x = area.x.saturating_add(1).saturating_add(width).min(max_x);
    frame.set_cursor_position(Position::new(x, area.y + 1));
}

fn draw_hint(frame: &mut Frame, area: Rect, input: &InputState) {
    let style = if input.is_empty() {
        Style::new().fg(Color::DarkGray)
    } else {
        Style::new().fg(Color::Black).bg(Color::Red).add_modifier(Modifier::BOLD)
    };
    let hint = Line::from(vec![Span::raw(" "), Span::styled(SUBMIT_LABEL, style)]);
    frame.render_widget(Paragraph::new(hint), area);
}

fn draw_log(frame: &mut Frame, area: Rect, store: &Store) {
    let items: Vec<ListItem> = store.newest_first().map(log_item).collect();
    let title = format!(" {} ", store.channel());
    frame.render_widget(List::new(items).block(Block::bordered().title(title)), area);
}

fn log_item(message: &Message) -> ListItem<'_> {
    ListItem::new(vec![
        Line::styled(message.category().to_string(), Style::new().add_modifier(Modifier::BOLD)),
        Line::raw(message.text()),
    ])
}

fn draw_status(frame: &mut Frame, area: Rect, store: &Store, input: &InputState) {
    let mut spans = vec![Span::raw(format!(" user: {}", store.user_id()))];

    // Command feedback is more recent than any client error.
    if let Some(error) = input.notice().or(store.last_error()) {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(error.to_string(), Style::new().fg(Color::Red)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
