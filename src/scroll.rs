//! Viewport bookkeeping over the message log.
//!
//! `offset` counts messages back from the newest one to the viewport's
//! bottom edge. It only has meaning while `auto_follow` is off; in
//! auto-follow mode the viewport is always the trailing window.

use std::ops::Range;

pub const DEFAULT_VIEWPORT_SIZE: usize = 10;

/// Navigation commands issued by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    ScrollUp(usize),
    ScrollDown(usize),
    PageUp,
    PageDown,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollState {
    auto_follow: bool,
    offset: usize,
    viewport_size: usize,
    log_length: usize,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_SIZE)
    }
}

impl ScrollState {
    /// Creates an auto-following viewport. A zero size is bumped to one.
    pub fn new(viewport_size: usize) -> Self {
        Self {
            auto_follow: true,
            offset: 0,
            viewport_size: viewport_size.max(1),
            log_length: 0,
        }
    }

    pub fn auto_follow(&self) -> bool {
        self.auto_follow
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn viewport_size(&self) -> usize {
        self.viewport_size
    }

    pub fn log_length(&self) -> usize {
        self.log_length
    }

    /// Records a new log length.
    ///
    /// While scrolled back the offset is kept as is, so the window slides
    /// along with growth; it is only re-clamped to stay within the log.
    pub fn on_log_grew(&mut self, new_length: usize) {
        self.log_length = new_length;
        if !self.auto_follow {
            self.clamp_offset();
        }
    }

    /// Moves the viewport by `delta` messages, positive toward older ones.
    pub fn scroll(&mut self, delta: isize) {
        let current = if self.auto_follow { 0 } else { self.offset };
        let moved = if delta >= 0 {
            current.saturating_add(delta.unsigned_abs())
        } else {
            current.saturating_sub(delta.unsigned_abs())
        };

        self.offset = moved.min(self.max_offset());
        if self.offset > 0 {
            self.auto_follow = false;
        }
    }

    pub fn page(&mut self, delta_pages: isize) {
        let size = isize::try_from(self.viewport_size).unwrap_or(isize::MAX);
        self.scroll(delta_pages.saturating_mul(size));
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll(isize::try_from(amount).unwrap_or(isize::MAX));
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll(isize::try_from(amount).map_or(isize::MIN, |amount| -amount));
    }

    pub fn page_up(&mut self) {
        self.page(1);
    }

    pub fn page_down(&mut self) {
        self.page(-1);
    }

    /// Shows the first `viewport_size` messages.
    pub fn jump_to_top(&mut self) {
        self.auto_follow = false;
        self.offset = self.max_offset();
    }

    pub fn jump_to_bottom(&mut self) {
        self.offset = 0;
        self.auto_follow = true;
    }

    pub fn apply(&mut self, command: ViewCommand) {
        match command {
            ViewCommand::ScrollUp(amount) => self.scroll_up(amount),
            ViewCommand::ScrollDown(amount) => self.scroll_down(amount),
            ViewCommand::PageUp => self.page_up(),
            ViewCommand::PageDown => self.page_down(),
            ViewCommand::Top => self.jump_to_top(),
            ViewCommand::Bottom => self.jump_to_bottom(),
        }
    }

    /// Half-open index range to display for a log of `log_length` messages.
    pub fn visible_range(&self, log_length: usize) -> Range<usize> {
        let max_offset = log_length.saturating_sub(self.viewport_size);
        let offset = if self.auto_follow {
            0
        } else {
            self.offset.min(max_offset)
        };

        let end = log_length - offset;
        let start = end.saturating_sub(self.viewport_size);
        start..end
    }

    fn max_offset(&self) -> usize {
        self.log_length.saturating_sub(self.viewport_size)
    }

    fn clamp_offset(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }
}
