use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use agent_board::{MessageStore, Receivers, RenderHandle, SenderKind, Terminal, ViewCommand};
use tracing::{debug, info};

use crate::app::{HostOps, Panel};
use crate::commands::RoutedMessage;
use crate::runtime::Dispatcher;
use crate::tui::{
    render_agents, render_help, render_history, render_prompt, CLEAR_SCREEN, HISTORY_LIMIT,
};

pub const USER_NAME: &str = "user";
pub const SYSTEM_NAME: &str = "system";

/// Production host: posts to the board, drives agents, and owns the input
/// stream so panels can wait for Enter.
pub struct ConsoleHost<T: Terminal, R: BufRead> {
    store: Arc<MessageStore>,
    dispatcher: Arc<Dispatcher>,
    render: RenderHandle,
    terminal: T,
    input: R,
    board_invalidated: Arc<AtomicBool>,
    stop_requested: bool,
}

impl<T: Terminal, R: BufRead> ConsoleHost<T, R> {
    pub fn new(
        store: Arc<MessageStore>,
        dispatcher: Arc<Dispatcher>,
        render: RenderHandle,
        terminal: T,
        input: R,
        board_invalidated: Arc<AtomicBool>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            render,
            terminal,
            input,
            board_invalidated,
            stop_requested: false,
        }
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Draws the prompt and reads one line. `Ok(0)` means end of input.
    pub fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        let prompt = render_prompt(self.terminal.columns(), self.terminal.rows());
        self.terminal.write(&prompt);
        self.input.read_line(buf)
    }

    fn repaint_board(&mut self) {
        self.terminal.write(CLEAR_SCREEN);
        self.board_invalidated.store(true, Ordering::SeqCst);
        self.render.resume();
    }
}

impl<T: Terminal, R: BufRead> HostOps for ConsoleHost<T, R> {
    fn submit(&mut self, message: RoutedMessage) -> Result<usize, String> {
        let id = self.store.post(
            USER_NAME,
            SenderKind::User,
            message.receivers,
            message.content,
        );
        let posted = self
            .store
            .get(id)
            .ok_or_else(|| format!("message {id} vanished before routing"))?;
        let started = self.dispatcher.route(&posted)?;
        self.render.request_render();
        Ok(started.len())
    }

    fn notify(&mut self, notice: &str) {
        self.store.post(
            SYSTEM_NAME,
            SenderKind::System,
            Receivers::only([USER_NAME]),
            notice,
        );
        self.render.request_render();
    }

    fn view(&mut self, command: ViewCommand) {
        self.render.dispatch(command);
    }

    fn show(&mut self, panel: Panel) {
        // Returns only after a frame in flight has been drawn.
        self.render.pause();
        let columns = usize::from(self.terminal.columns());
        let lines = match panel {
            Panel::History => render_history(
                &self.store.completed(Some(HISTORY_LIMIT)),
                columns,
            ),
            Panel::Agents => render_agents(&self.dispatcher.summaries()),
            Panel::Help => render_help(),
        };
        debug!(?panel, rows = lines.len(), "showing panel");

        let mut screen = String::from(CLEAR_SCREEN);
        for line in &lines {
            screen.push_str(line);
            screen.push('\n');
        }
        screen.push_str("\nPress Enter to return to the board...");
        self.terminal.write(&screen);

        let mut discard = String::new();
        let _ = self.input.read_line(&mut discard);
        self.repaint_board();
    }

    fn clear_board(&mut self) {
        self.store.reset();
        info!("board cleared");
        self.terminal.write(CLEAR_SCREEN);
        self.board_invalidated.store(true, Ordering::SeqCst);
        self.render.dispatch(ViewCommand::Bottom);
    }

    fn request_stop(&mut self) {
        self.stop_requested = true;
        self.dispatcher.cancel_all();
        self.render.request_stop();
    }
}
