use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Instant;

use crate::scroll::ViewCommand;

#[derive(Default)]
struct LoopWakeState {
    pending_commands: Vec<ViewCommand>,
    render_requested: bool,
    paused: bool,
    rendering: bool,
    stop_requested: bool,
}

impl LoopWakeState {
    fn has_work(&self) -> bool {
        self.stop_requested
            || (!self.paused && (self.render_requested || !self.pending_commands.is_empty()))
    }
}

/// Wake cell shared between the render thread and everyone who pokes it.
#[derive(Default)]
pub(crate) struct LoopWake {
    state: Mutex<LoopWakeState>,
    cvar: Condvar,
}

impl LoopWake {
    /// Blocks until `deadline`, a queued command/render request, or stop.
    /// Returns false once stop has been requested.
    pub(crate) fn wait_until(&self, deadline: Instant) -> bool {
        let mut state = self.lock();
        while !state.has_work() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            state = match self.cvar.wait_timeout(state, deadline - now) {
                Ok((state, _)) => state,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }

        !state.stop_requested
    }

    pub(crate) fn dispatch(&self, command: ViewCommand) {
        let mut state = self.lock();
        state.pending_commands.push(command);
        self.cvar.notify_all();
    }

    pub(crate) fn request_render(&self) {
        let mut state = self.lock();
        state.render_requested = true;
        self.cvar.notify_all();
    }

    /// Pausing blocks until a frame already being presented has finished, so
    /// the caller owns the screen once this returns.
    pub(crate) fn set_paused(&self, paused: bool) {
        let mut state = self.lock();
        state.paused = paused;
        if !paused {
            state.render_requested = true;
        }
        self.cvar.notify_all();

        while paused && state.rendering {
            state = match self.cvar.wait(state) {
                Ok(state) => state,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }

    /// Marks a frame as in flight unless the loop is paused. The frame ends
    /// when the returned guard drops.
    pub(crate) fn begin_frame(&self) -> Option<FrameGuard<'_>> {
        let mut state = self.lock();
        if state.paused {
            return None;
        }
        state.rendering = true;
        Some(FrameGuard { wake: self })
    }

    fn end_frame(&self) {
        let mut state = self.lock();
        state.rendering = false;
        self.cvar.notify_all();
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.lock().paused
    }

    pub(crate) fn request_stop(&self) {
        let mut state = self.lock();
        state.stop_requested = true;
        self.cvar.notify_all();
    }

    pub(crate) fn drain_commands(&self) -> Vec<ViewCommand> {
        std::mem::take(&mut self.lock().pending_commands)
    }

    pub(crate) fn take_render_requested(&self) -> bool {
        let mut state = self.lock();
        let requested = state.render_requested;
        state.render_requested = false;
        requested
    }

    pub(crate) fn has_pending_commands(&self) -> bool {
        !self.lock().pending_commands.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, LoopWakeState> {
        match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

pub(crate) struct FrameGuard<'a> {
    wake: &'a LoopWake,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.wake.end_frame();
    }
}

/// Cloneable, thread-safe remote control for a [`RenderLoop`](super::RenderLoop).
#[derive(Clone)]
pub struct RenderHandle {
    pub(crate) wake: Arc<LoopWake>,
}

impl RenderHandle {
    /// Queues a navigation command; the loop applies it and redraws at once.
    pub fn dispatch(&self, command: ViewCommand) {
        self.wake.dispatch(command);
    }

    /// Asks for a frame before the next regular tick.
    pub fn request_render(&self) {
        self.wake.request_render();
    }

    /// Suspends drawing, e.g. while something else owns the screen. Returns
    /// once any frame in flight has been presented.
    pub fn pause(&self) {
        self.wake.set_paused(true);
    }

    /// Resumes drawing and redraws immediately.
    pub fn resume(&self) {
        self.wake.set_paused(false);
    }

    pub fn is_paused(&self) -> bool {
        self.wake.is_paused()
    }

    pub fn request_stop(&self) {
        self.wake.request_stop();
    }
}
