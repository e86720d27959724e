//! Plain-text frame model.
//!
//! A frame is the list of terminal rows for one [`View`]: a status row, a
//! rule, then the visible messages. When the messages need more rows than the
//! terminal offers, the oldest rows are dropped so the newest text stays on
//! screen.

use crate::board::{Message, SenderKind};
use crate::core::text::width::{truncate_to_width, visible_width, wrap_to_width};
use crate::runtime::View;

const STREAMING_MARK: &str = "●";
const EMPTY_BOARD: &str = "No messages yet. Type a message to get started!";
const WAITING: &str = "waiting...";
const CONTENT_INDENT: &str = "  ";

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Frame {
    lines: Vec<String>,
}

impl Frame {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Lays `view` out into at most `rows` rows of `columns` cells.
    pub fn compose(view: &View, columns: usize, rows: usize) -> Self {
        if rows == 0 || columns == 0 {
            return Self::default();
        }

        let mut lines = vec![truncate_to_width(&view.status.to_string(), columns, "…")];
        if rows > 1 {
            lines.push("─".repeat(columns));
        }

        let budget = rows.saturating_sub(lines.len());
        let mut body = Vec::new();
        if view.messages.is_empty() {
            body.push(truncate_to_width(EMPTY_BOARD, columns, "…"));
        }
        for (index, message) in view.messages.iter().enumerate() {
            if index > 0 {
                body.push(String::new());
            }
            push_message(&mut body, message, columns);
        }

        let overflow = body.len().saturating_sub(budget);
        lines.extend(body.into_iter().skip(overflow));
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl From<Vec<String>> for Frame {
    fn from(lines: Vec<String>) -> Self {
        Self::new(lines)
    }
}

/// `👤 user → ALL (12:00:01)` style title row.
pub fn message_header(message: &Message) -> String {
    let icon = match message.sender_kind {
        SenderKind::User => "👤",
        SenderKind::Agent => "🤖",
        SenderKind::System => "⚙",
    };
    let at = message.created_at;
    let mut header = format!(
        "{icon} {} → {} ({:02}:{:02}:{:02})",
        message.sender,
        message.receiver_display(),
        at.hour(),
        at.minute(),
        at.second()
    );
    if message.is_streaming() {
        header.push(' ');
        header.push_str(STREAMING_MARK);
    }
    header
}

fn push_message(body: &mut Vec<String>, message: &Message, columns: usize) {
    body.push(truncate_to_width(&message_header(message), columns, "…"));

    let content_width = columns.saturating_sub(visible_width(CONTENT_INDENT)).max(1);
    if message.content.is_empty() {
        body.push(format!("{CONTENT_INDENT}{WAITING}"));
        return;
    }

    for logical in message.content.lines() {
        for row in wrap_to_width(logical, content_width) {
            body.push(format!("{CONTENT_INDENT}{row}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::board::{MessageStore, Receivers};
    use crate::scroll::ScrollState;
    use crate::status::StatusReadout;

    use super::*;

    fn view_of(store: &MessageStore) -> View {
        let snapshot = store.snapshot();
        let mut scroll = ScrollState::new(10);
        scroll.on_log_grew(snapshot.len());
        let status = StatusReadout::capture(&snapshot, &scroll);
        View {
            messages: snapshot.slice(status.visible.clone()).to_vec(),
            range: status.visible.clone(),
            status,
        }
    }

    #[test]
    fn empty_board_shows_placeholder() {
        let store = MessageStore::new();
        let frame = Frame::compose(&view_of(&store), 60, 10);
        assert_eq!(
            frame.lines(),
            &[
                "Queue: 0 messages  Streaming: 0".to_string(),
                "─".repeat(60),
                EMPTY_BOARD.to_string(),
            ]
        );
    }

    #[test]
    fn streaming_message_is_marked_and_waits_for_content() {
        let store = MessageStore::new();
        store.start("Claude", Receivers::only(["user"]), "");

        let frame = Frame::compose(&view_of(&store), 80, 10);
        let header = &frame.lines()[2];
        assert!(header.starts_with("🤖 Claude → user ("), "{header}");
        assert!(header.ends_with(STREAMING_MARK), "{header}");
        assert_eq!(frame.lines()[3], "  waiting...");
    }

    #[test]
    fn content_is_wrapped_and_indented() {
        let store = MessageStore::new();
        let id = store.start("A", Receivers::All, "alpha beta gamma\ndelta");
        store.complete(id).expect("complete");

        let frame = Frame::compose(&view_of(&store), 14, 20);
        assert_eq!(
            &frame.lines()[3..],
            &[
                "  alpha beta".to_string(),
                "  gamma".to_string(),
                "  delta".to_string(),
            ]
        );
        assert!(!frame.lines()[2].ends_with(STREAMING_MARK));
    }

    #[test]
    fn overflow_keeps_the_newest_rows() {
        let store = MessageStore::new();
        for index in 0..5 {
            let id = store.start("A", Receivers::All, format!("body {index}"));
            store.complete(id).expect("complete");
        }

        let frame = Frame::compose(&view_of(&store), 40, 6);
        assert_eq!(frame.len(), 6);
        assert_eq!(frame.lines().last().map(String::as_str), Some("  body 4"));
    }
}
