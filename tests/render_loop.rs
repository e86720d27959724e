use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use agent_board::{
    LoopOptions, MessageStore, Presenter, Receivers, RenderLoop, View, ViewCommand,
};

#[derive(Clone, Default)]
struct RecordingPresenter {
    frames: Arc<Mutex<Vec<View>>>,
    delay: Duration,
}

impl RecordingPresenter {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    fn frames(&self) -> MutexGuard<'_, Vec<View>> {
        lock_unpoisoned(&self.frames)
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, view: &View) {
        lock_unpoisoned(&self.frames).push(view.clone());
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn options(interval_ms: u64) -> LoopOptions {
    LoopOptions {
        interval: Duration::from_millis(interval_ms),
        viewport_size: 10,
    }
}

#[test]
fn slow_presenter_collapses_missed_ticks() {
    let store = Arc::new(MessageStore::new());
    let presenter = RecordingPresenter::with_delay(Duration::from_millis(25));
    let render_loop = RenderLoop::new(Arc::clone(&store), presenter.clone(), options(5));
    let handle = render_loop.handle();
    let runner = thread::spawn(move || render_loop.run());

    let id = store.start("A", Receivers::All, "");
    for index in 0..20 {
        store.append(id, &format!("{index},")).expect("append");
        thread::sleep(Duration::from_millis(2));
    }
    store.complete(id).expect("complete");
    thread::sleep(Duration::from_millis(80));
    handle.request_stop();
    let render_loop_presenter = runner.join().expect("render thread");

    let frames = render_loop_presenter.frames();
    // 25ms per frame at a 5ms cadence: far fewer frames than ticks.
    assert!(frames.len() < 20, "rendered {} frames", frames.len());
    let last = frames.last().expect("at least one frame");
    assert!(last.messages[0].content.ends_with("19,"));
    assert!(!last.messages[0].is_streaming());
}

#[test]
fn navigation_commands_redraw_without_waiting_for_tick() {
    let store = Arc::new(MessageStore::new());
    for _ in 0..36 {
        store.start("A", Receivers::All, "");
    }

    let presenter = RecordingPresenter::default();
    let render_loop = RenderLoop::new(Arc::clone(&store), presenter.clone(), options(60_000));
    let handle = render_loop.handle();
    let runner = thread::spawn(move || render_loop.run());

    thread::sleep(Duration::from_millis(30));
    handle.dispatch(ViewCommand::ScrollUp(5));
    thread::sleep(Duration::from_millis(30));
    handle.dispatch(ViewCommand::Top);
    thread::sleep(Duration::from_millis(30));
    handle.request_stop();
    runner.join().expect("render thread");

    let ranges: Vec<_> = presenter
        .frames()
        .iter()
        .map(|view| view.range.clone())
        .collect();
    assert_eq!(ranges, vec![26..36, 21..31, 0..10]);
}

#[test]
fn paused_loop_draws_nothing_until_resumed() {
    let store = Arc::new(MessageStore::new());
    let presenter = RecordingPresenter::default();
    let render_loop = RenderLoop::new(Arc::clone(&store), presenter.clone(), options(5));
    let handle = render_loop.handle();
    handle.pause();
    let runner = thread::spawn(move || render_loop.run());

    store.start("A", Receivers::All, "hidden while paused");
    thread::sleep(Duration::from_millis(40));
    assert!(presenter.frames().is_empty());

    handle.resume();
    thread::sleep(Duration::from_millis(40));
    handle.request_stop();
    runner.join().expect("render thread");

    let frames = presenter.frames();
    assert!(!frames.is_empty());
    assert_eq!(frames[0].status.log_length, 1);
}

#[test]
fn pausing_mid_frame_waits_for_that_frame_to_land() {
    let store = Arc::new(MessageStore::new());
    store.start("A", Receivers::All, "on the board");
    let screen: Arc<Mutex<Vec<&'static str>>> = Arc::default();

    let frame_started = Arc::new(AtomicBool::new(false));

    let board_screen = Arc::clone(&screen);
    let board_started = Arc::clone(&frame_started);
    let presenter = move |_: &View| {
        board_started.store(true, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        lock_unpoisoned(&board_screen).push("BOARD");
    };
    let render_loop = RenderLoop::new(Arc::clone(&store), presenter, options(60_000));
    let handle = render_loop.handle();
    let runner = thread::spawn(move || {
        render_loop.run();
    });

    while !frame_started.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(1));
    }
    thread::sleep(Duration::from_millis(10));
    handle.pause();
    lock_unpoisoned(&screen).push("PANEL");

    thread::sleep(Duration::from_millis(30));
    handle.request_stop();
    runner.join().expect("render thread");

    assert_eq!(*lock_unpoisoned(&screen), vec!["BOARD", "PANEL"]);
}
