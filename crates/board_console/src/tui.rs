use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use agent_board::render::message_header;
use agent_board::{truncate_to_width, wrap_to_width, Frame, Message, Presenter, Terminal, View};

use crate::commands::HELP_TEXT;
use crate::runtime::AgentSummary;

pub const PROMPT: &str = "You: ";
/// Rows below the board: a rule and the input prompt.
pub const PROMPT_ROWS: usize = 2;
pub const HISTORY_LIMIT: usize = 20;

const SAVE_CURSOR: &str = "\x1b7";
const RESTORE_CURSOR: &str = "\x1b8";
const CLEAR_LINE: &str = "\x1b[2K";
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

fn ansi_wrap(text: &str, prefix: &str, suffix: &str) -> String {
    format!("{prefix}{text}{suffix}")
}

fn dim(text: &str) -> String {
    ansi_wrap(text, "\x1b[2m", "\x1b[22m")
}

fn bold(text: &str) -> String {
    ansi_wrap(text, "\x1b[1m", "\x1b[22m")
}

fn move_to(row: usize) -> String {
    format!("\x1b[{row};1H")
}

/// Draws board frames into the upper rows of a terminal, leaving the bottom
/// rows to the input prompt. Only rows that changed since the previous frame
/// are rewritten.
pub struct BoardPresenter<T: Terminal> {
    terminal: T,
    previous: Vec<String>,
    previous_size: (u16, u16),
    invalidated: Arc<AtomicBool>,
}

impl<T: Terminal> BoardPresenter<T> {
    pub fn new(terminal: T) -> Self {
        Self {
            terminal,
            previous: Vec::new(),
            previous_size: (0, 0),
            invalidated: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that forces the next frame to repaint every row. Set it after
    /// something else drew over the screen.
    pub fn invalidation_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.invalidated)
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }
}

impl<T: Terminal> Presenter for BoardPresenter<T> {
    fn present(&mut self, view: &View) {
        let size = (self.terminal.columns(), self.terminal.rows());
        let rows = usize::from(size.1).saturating_sub(PROMPT_ROWS);
        let frame = Frame::compose(view, usize::from(size.0), rows).into_lines();

        let full = self.invalidated.swap(false, Ordering::SeqCst) || size != self.previous_size;
        let mut output = String::new();
        for row in 0..frame.len().max(self.previous.len()).min(rows) {
            let line = frame.get(row);
            if !full && line == self.previous.get(row) {
                continue;
            }
            output.push_str(&move_to(row + 1));
            output.push_str(CLEAR_LINE);
            if let Some(line) = line {
                output.push_str(line);
            }
        }

        self.previous = frame;
        self.previous_size = size;
        if output.is_empty() {
            return;
        }
        self.terminal
            .write(&format!("{SAVE_CURSOR}{output}{RESTORE_CURSOR}"));
    }
}

/// Rule and prompt on the bottom two rows; leaves the cursor after the prompt.
pub fn render_prompt(columns: u16, rows: u16) -> String {
    let rows = usize::from(rows).max(PROMPT_ROWS);
    format!(
        "{}{CLEAR_LINE}{}{}{CLEAR_LINE}{PROMPT}",
        move_to(rows - 1),
        dim(&"─".repeat(usize::from(columns))),
        move_to(rows),
    )
}

pub fn render_history(messages: &[Message], columns: usize) -> Vec<String> {
    if messages.is_empty() {
        return vec!["No conversation history yet.".to_string()];
    }

    let mut lines = vec![
        bold("Conversation History"),
        dim(&format!("last {} completed messages", messages.len())),
        String::new(),
    ];
    let content_width = columns.saturating_sub(2).max(1);
    for message in messages {
        lines.push(truncate_to_width(&message_header(message), columns, "…"));
        for logical in message.content.lines() {
            for row in wrap_to_width(logical, content_width) {
                lines.push(format!("  {row}"));
            }
        }
        lines.push(String::new());
    }
    lines
}

pub fn render_agents(agents: &[AgentSummary]) -> Vec<String> {
    let name_width = agents
        .iter()
        .map(|agent| agent.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());
    let model_width = agents
        .iter()
        .map(|agent| agent.model.chars().count())
        .max()
        .unwrap_or(0)
        .max("Model".len());

    let mut lines = vec![
        bold("Active Agents"),
        format!("{:name_width$}  {:model_width$}  Status", "Name", "Model"),
    ];
    for agent in agents {
        let status = if agent.streaming {
            "Streaming"
        } else {
            "Active"
        };
        lines.push(format!(
            "{:name_width$}  {:model_width$}  {status}",
            agent.name, agent.model
        ));
    }
    lines
}

pub fn render_help() -> Vec<String> {
    HELP_TEXT.lines().map(str::to_string).collect()
}
