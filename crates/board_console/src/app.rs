use agent_board::{Receivers, ViewCommand};

use crate::commands::{parse_console_command, parse_routed_message, ConsoleCommand, RoutedMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Exiting,
}

/// Full-screen panels that temporarily replace the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    History,
    Agents,
    Help,
}

/// Side effects the input controller asks of its host.
pub trait HostOps {
    /// Posts the user's message and starts replies. Returns how many agents
    /// were asked to reply.
    fn submit(&mut self, message: RoutedMessage) -> Result<usize, String>;
    /// Posts a console notice to the board.
    fn notify(&mut self, notice: &str);
    fn view(&mut self, command: ViewCommand);
    fn show(&mut self, panel: Panel);
    fn clear_board(&mut self);
    fn request_stop(&mut self);
}

/// Input-side state of the console: turns typed lines into host calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    pub mode: Mode,
    pub should_exit: bool,
    /// Messages the user sent, oldest first.
    pub sent: Vec<String>,
    agent_names: Vec<String>,
}

impl App {
    pub fn new(agent_names: Vec<String>) -> Self {
        Self {
            mode: Mode::Idle,
            should_exit: false,
            sent: Vec::new(),
            agent_names,
        }
    }

    pub fn agent_names(&self) -> &[String] {
        &self.agent_names
    }

    pub fn on_line(&mut self, line: &str, host: &mut dyn HostOps) {
        if self.should_exit {
            return;
        }

        let line = line.trim();
        if line.is_empty() {
            return;
        }

        if let Some(command) = parse_console_command(line) {
            match command {
                ConsoleCommand::View(command) => host.view(command),
                ConsoleCommand::Exit => self.on_quit(host),
                ConsoleCommand::Clear => host.clear_board(),
                ConsoleCommand::History => host.show(Panel::History),
                ConsoleCommand::Agents => host.show(Panel::Agents),
                ConsoleCommand::Help => host.show(Panel::Help),
            }
            return;
        }

        let routed = parse_routed_message(line);
        let unknown = self.unknown_receivers(&routed.receivers);
        self.sent.push(line.to_string());

        match host.submit(routed) {
            Ok(_) if !unknown.is_empty() => host.notify(&format!(
                "Unknown agent(s): {}. Known agents: {}",
                unknown.join(", "),
                self.agent_names.join(", ")
            )),
            Ok(_) => {}
            Err(error) => host.notify(&format!("Failed to start agents: {error}")),
        }
    }

    pub fn on_quit(&mut self, host: &mut dyn HostOps) {
        self.mode = Mode::Exiting;
        self.should_exit = true;
        host.request_stop();
    }

    fn unknown_receivers(&self, receivers: &Receivers) -> Vec<String> {
        match receivers {
            Receivers::All => Vec::new(),
            Receivers::Only(names) => names
                .iter()
                .filter(|name| *name != "user" && !self.agent_names.contains(name))
                .cloned()
                .collect(),
        }
    }
}
