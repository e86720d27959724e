use agent_board::{Receivers, ViewCommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    View(ViewCommand),
    Exit,
    Clear,
    History,
    Agents,
    Help,
}

pub const HELP_TEXT: &str = "\
Commands:
  @agent1,agent2 text   send to specific agents (anything else broadcasts)
  up / u, down / d      scroll one message
  pageup / pu           scroll one page towards older messages
  pagedown / pd         scroll one page towards newer messages
  top, bottom / b       jump to oldest / newest (bottom re-enables auto-scroll)
  history               show the last 20 completed messages
  agents                list agents
  clear                 clear the board
  help                  show this help
  exit / quit           leave";

/// Recognizes a whole-line command token. Matching is case-insensitive;
/// anything else is a message.
pub fn parse_console_command(input: &str) -> Option<ConsoleCommand> {
    let token = input.trim().to_ascii_lowercase();

    let parsed = match token.as_str() {
        "exit" | "quit" => ConsoleCommand::Exit,
        "clear" => ConsoleCommand::Clear,
        "history" => ConsoleCommand::History,
        "agents" => ConsoleCommand::Agents,
        "help" => ConsoleCommand::Help,
        "up" | "u" => ConsoleCommand::View(ViewCommand::ScrollUp(1)),
        "down" | "d" => ConsoleCommand::View(ViewCommand::ScrollDown(1)),
        "pageup" | "pu" => ConsoleCommand::View(ViewCommand::PageUp),
        "pagedown" | "pd" => ConsoleCommand::View(ViewCommand::PageDown),
        "top" => ConsoleCommand::View(ViewCommand::Top),
        "bottom" | "b" => ConsoleCommand::View(ViewCommand::Bottom),
        _ => return None,
    };

    Some(parsed)
}

/// User input split into content and addressees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedMessage {
    pub content: String,
    pub receivers: Receivers,
}

/// Parses `@name1,name2 content`.
///
/// Without a leading `@`, without content after the names, or without any
/// usable name, the whole trimmed input is broadcast unchanged.
pub fn parse_routed_message(input: &str) -> RoutedMessage {
    let trimmed = input.trim();
    let broadcast = || RoutedMessage {
        content: trimmed.to_string(),
        receivers: Receivers::All,
    };

    let Some(rest) = trimmed.strip_prefix('@') else {
        return broadcast();
    };
    let Some((names, content)) = rest.split_once(' ') else {
        return broadcast();
    };

    let content = content.trim();
    if content.is_empty() {
        return broadcast();
    }

    match Receivers::only(names.split(',')) {
        Receivers::All => broadcast(),
        receivers => RoutedMessage {
            content: content.to_string(),
            receivers,
        },
    }
}
