//! Fixed-cadence render loop.
//!
//! Each tick takes a fresh store snapshot, folds pending navigation commands
//! into the scroll state and hands the visible slice to a [`Presenter`].
//! Ticks that were missed while a frame was being presented are dropped, not
//! replayed: the next frame always shows the newest state.

use std::ops::Range;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::board::{Message, MessageStore};
use crate::config::EnvConfig;
use crate::scroll::{ScrollState, DEFAULT_VIEWPORT_SIZE};
use crate::status::StatusReadout;

use super::wake::{LoopWake, RenderHandle};

pub const DEFAULT_REFRESH_RATE: u32 = 10;

/// What a presenter receives for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub messages: Vec<Message>,
    pub range: Range<usize>,
    pub status: StatusReadout,
}

/// Sink for rendered views. Implemented by terminal front ends and tests.
pub trait Presenter {
    fn present(&mut self, view: &View);
}

impl<F: FnMut(&View)> Presenter for F {
    fn present(&mut self, view: &View) {
        self(view);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Rendering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopOptions {
    pub interval: Duration,
    pub viewport_size: usize,
}

impl LoopOptions {
    pub fn from_refresh_rate(refresh_rate: u32, viewport_size: usize) -> Self {
        let refresh_rate = if refresh_rate == 0 {
            DEFAULT_REFRESH_RATE
        } else {
            refresh_rate
        };
        Self {
            interval: Duration::from_micros(1_000_000 / u64::from(refresh_rate)),
            viewport_size,
        }
    }
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self::from_refresh_rate(DEFAULT_REFRESH_RATE, DEFAULT_VIEWPORT_SIZE)
    }
}

impl From<&EnvConfig> for LoopOptions {
    fn from(config: &EnvConfig) -> Self {
        Self::from_refresh_rate(config.refresh_rate, config.viewport_size)
    }
}

pub struct RenderLoop<P: Presenter> {
    store: Arc<MessageStore>,
    presenter: P,
    scroll: ScrollState,
    wake: Arc<LoopWake>,
    interval: Duration,
    state: LoopState,
    frames_rendered: u64,
    skipped_ticks: u64,
}

impl<P: Presenter> RenderLoop<P> {
    pub fn new(store: Arc<MessageStore>, presenter: P, options: LoopOptions) -> Self {
        Self {
            store,
            presenter,
            scroll: ScrollState::new(options.viewport_size),
            wake: Arc::new(LoopWake::default()),
            interval: options.interval,
            state: LoopState::Idle,
            frames_rendered: 0,
            skipped_ticks: 0,
        }
    }

    pub fn handle(&self) -> RenderHandle {
        RenderHandle {
            wake: Arc::clone(&self.wake),
        }
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Ticks dropped because a frame overran its slot.
    pub fn skipped_ticks(&self) -> u64 {
        self.skipped_ticks
    }

    /// Produces one frame from the current store state.
    pub fn tick(&mut self) {
        self.state = LoopState::Rendering;

        let snapshot = self.store.snapshot();
        self.scroll.on_log_grew(snapshot.len());
        for command in self.wake.drain_commands() {
            trace!(?command, "view command applied");
            self.scroll.apply(command);
        }

        let status = StatusReadout::capture(&snapshot, &self.scroll);
        let range = status.visible.clone();
        let view = View {
            messages: snapshot.slice(range.clone()).to_vec(),
            range,
            status,
        };
        self.presenter.present(&view);

        self.frames_rendered += 1;
        self.state = LoopState::Idle;
    }

    /// Runs until [`RenderHandle::request_stop`] and returns the presenter.
    pub fn run(mut self) -> P {
        debug!(interval_ms = self.interval.as_millis() as u64, "render loop started");
        let mut next_tick = Instant::now();

        while self.wake.wait_until(next_tick) {
            let now = Instant::now();
            let due = now >= next_tick;
            if due {
                let missed = missed_ticks(now - next_tick, self.interval);
                if missed > 0 {
                    trace!(missed, "collapsed missed ticks");
                    self.skipped_ticks += missed;
                }
                next_tick = now + self.interval;
            }

            let requested = self.wake.take_render_requested() || self.wake.has_pending_commands();
            if !(due || requested) {
                continue;
            }
            let wake = Arc::clone(&self.wake);
            let Some(_frame) = wake.begin_frame() else {
                continue;
            };
            self.tick();
        }

        debug!(
            frames = self.frames_rendered,
            skipped = self.skipped_ticks,
            "render loop stopped"
        );
        self.presenter
    }
}

fn missed_ticks(late_by: Duration, interval: Duration) -> u64 {
    if interval.is_zero() {
        return 0;
    }
    (late_by.as_nanos() / interval.as_nanos()) as u64
}
