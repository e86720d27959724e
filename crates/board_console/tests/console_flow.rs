mod support;

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use agent_board::{
    LoopOptions, MessageStore, Receivers, RenderHandle, RenderLoop, SenderKind, Status, View,
};
use agent_provider_mock::ScriptedProvider;
use board_console::app::App;
use board_console::host::ConsoleHost;
use board_console::providers::Agent;
use board_console::runtime::Dispatcher;
use pretty_assertions::assert_eq;

use support::SharedTerminal;

struct Console {
    store: Arc<MessageStore>,
    dispatcher: Arc<Dispatcher>,
    render: RenderHandle,
    terminal: SharedTerminal,
    invalidated: Arc<AtomicBool>,
    host: ConsoleHost<SharedTerminal, Cursor<Vec<u8>>>,
    app: App,
}

fn scripted(name: &str, parts: &[&str]) -> Agent {
    Agent {
        name: name.to_string(),
        model: "scripted".to_string(),
        producer: Arc::new(ScriptedProvider::new(
            parts.iter().map(|part| part.to_string()).collect(),
        )),
    }
}

/// Console wired to a render loop that is never run; its handle still
/// records pause state.
fn console(input: &str) -> Console {
    let store = Arc::new(MessageStore::new());
    let dispatcher = Dispatcher::new(
        Arc::clone(&store),
        vec![scripted("A", &["Hel", "lo"]), scripted("B", &["Hi there"])],
    );
    let render_loop = RenderLoop::new(
        Arc::clone(&store),
        |_: &View| {},
        LoopOptions {
            interval: Duration::from_millis(100),
            viewport_size: 10,
        },
    );
    let render = render_loop.handle();
    let terminal = SharedTerminal::new(60, 20);
    let invalidated = Arc::new(AtomicBool::new(false));
    let host = ConsoleHost::new(
        Arc::clone(&store),
        Arc::clone(&dispatcher),
        render.clone(),
        terminal.clone(),
        Cursor::new(input.as_bytes().to_vec()),
        Arc::clone(&invalidated),
    );
    let app = App::new(dispatcher.agent_names());

    Console {
        store,
        dispatcher,
        render,
        terminal,
        invalidated,
        host,
        app,
    }
}

impl Console {
    fn line(&mut self, line: &str) {
        self.app.on_line(line, &mut self.host);
        self.dispatcher.join_all();
    }
}

#[test]
fn targeted_message_streams_reply_from_named_agent_only() {
    let mut console = console("");
    console.line("@A greet me");

    let messages = console.store.snapshot().into_messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender_kind, SenderKind::User);
    assert_eq!(messages[0].content, "greet me");
    assert_eq!(messages[0].receivers, Receivers::Only(vec!["A".to_string()]));
    assert_eq!(messages[1].sender, "A");
    assert_eq!(messages[1].content, "Hello");
    assert_eq!(messages[1].status, Status::Complete);
    assert_eq!(console.app.sent, vec!["@A greet me".to_string()]);
}

#[test]
fn broadcast_reaches_every_agent() {
    let mut console = console("");
    console.line("hello all");

    let mut senders: Vec<_> = console
        .store
        .snapshot()
        .into_messages()
        .into_iter()
        .map(|message| message.sender)
        .collect();
    senders.sort();
    assert_eq!(senders, vec!["A", "B", "user"]);
}

#[test]
fn unknown_agent_gets_system_notice() {
    let mut console = console("");
    console.line("@Nobody are you there");

    let messages = console.store.snapshot().into_messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].sender_kind, SenderKind::System);
    assert_eq!(
        messages[1].content,
        "Unknown agent(s): Nobody. Known agents: A, B"
    );
}

#[test]
fn history_panel_pauses_board_and_waits_for_enter() {
    let mut console = console("\n");
    console.line("@B hi");
    console.line("history");

    let output = console.terminal.output();
    assert!(output.contains("Conversation History"));
    assert!(output.contains("Hi there"));
    assert!(output.contains("Press Enter to return to the board..."));
    assert!(!console.render.is_paused());
    assert!(console.invalidated.load(Ordering::SeqCst));
}

#[test]
fn agents_panel_lists_roster() {
    let mut console = console("\n");
    console.line("agents");

    let output = console.terminal.output();
    assert!(output.contains("Active Agents"));
    assert!(output.contains("A     scripted  Active"));
}

#[test]
fn clear_resets_board() {
    let mut console = console("");
    console.line("hello all");
    assert_eq!(console.store.len(), 3);

    console.line("CLEAR");
    assert!(console.store.is_empty());
    assert!(console.invalidated.load(Ordering::SeqCst));
}

#[test]
fn scroll_tokens_do_not_post_messages() {
    let mut console = console("");
    for token in ["up", "d", "pu", "pagedown", "top", "b"] {
        console.line(token);
    }
    assert!(console.store.is_empty());
    assert!(console.app.sent.is_empty());
}

#[test]
fn exit_stops_console() {
    let mut console = console("");
    console.line("quit");

    assert!(console.app.should_exit);
    assert!(console.host.stop_requested());
}

#[test]
fn read_line_draws_prompt_first() {
    let mut console = console("hello\n");
    let mut line = String::new();

    let read = console.host.read_line(&mut line).expect("read line");

    assert_eq!(read, 6);
    assert_eq!(line, "hello\n");
    assert!(console.terminal.output().ends_with("You: "));
}
