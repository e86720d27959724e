use std::io;
use std::sync::Arc;
use std::thread;

use agent_board::logging::init_tracing;
use agent_board::{
    EnvConfig, LoopOptions, MessageStore, ProcessTerminal, Receivers, RenderLoop, SenderKind,
    Terminal,
};
use board_console::app::App;
use board_console::host::{ConsoleHost, SYSTEM_NAME, USER_NAME};
use board_console::providers::agents_from_roster;
use board_console::roster::roster_from_env;
use board_console::runtime::Dispatcher;
use board_console::tui::{BoardPresenter, CLEAR_SCREEN};
use tracing::info;

fn main() -> io::Result<()> {
    let config = EnvConfig::from_env();
    init_tracing(&config)?;

    let roster = roster_from_env().map_err(io::Error::other)?;
    let agents = agents_from_roster(&roster).map_err(io::Error::other)?;

    let store = Arc::new(MessageStore::new());
    let dispatcher = Dispatcher::new(Arc::clone(&store), agents);
    let agent_names = dispatcher.agent_names();
    info!(agents = ?agent_names, "console starting");

    let presenter = BoardPresenter::new(ProcessTerminal::new());
    let board_invalidated = presenter.invalidation_handle();
    let render_loop = RenderLoop::new(Arc::clone(&store), presenter, LoopOptions::from(&config));
    let render = render_loop.handle();

    let mut terminal = ProcessTerminal::new();
    terminal.write(CLEAR_SCREEN);
    store.post(
        SYSTEM_NAME,
        SenderKind::System,
        Receivers::only([USER_NAME]),
        format!(
            "Agents ready: {}. Type `help` for commands, `@name text` to address agents.",
            agent_names.join(", ")
        ),
    );

    let render_thread = thread::Builder::new()
        .name("board-render".to_string())
        .spawn(move || render_loop.run())?;

    let mut host = ConsoleHost::new(
        Arc::clone(&store),
        Arc::clone(&dispatcher),
        render.clone(),
        terminal,
        io::stdin().lock(),
        board_invalidated,
    );
    let mut app = App::new(agent_names);
    let mut line = String::new();

    while !app.should_exit {
        line.clear();
        if host.read_line(&mut line)? == 0 {
            app.on_quit(&mut host);
            break;
        }
        app.on_line(&line, &mut host);
    }

    dispatcher.cancel_all();
    dispatcher.join_all();
    render.request_stop();
    if render_thread.join().is_err() {
        return Err(io::Error::other("render thread panicked"));
    }

    let mut terminal = ProcessTerminal::new();
    terminal.write(&format!("{CLEAR_SCREEN}Goodbye!\n"));
    info!(messages = store.len(), "console stopped");
    Ok(())
}
