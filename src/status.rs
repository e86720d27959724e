//! Read-only status line figures.

use std::fmt;
use std::ops::Range;

use crate::board::Snapshot;
use crate::scroll::ScrollState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReadout {
    pub log_length: usize,
    pub streaming: usize,
    pub visible: Range<usize>,
    pub auto_follow: bool,
    pub offset: usize,
}

impl StatusReadout {
    pub fn capture(snapshot: &Snapshot, scroll: &ScrollState) -> Self {
        let log_length = snapshot.len();
        Self {
            log_length,
            streaming: snapshot.streaming_count(),
            visible: scroll.visible_range(log_length),
            auto_follow: scroll.auto_follow(),
            offset: if scroll.auto_follow() { 0 } else { scroll.offset() },
        }
    }
}

impl fmt::Display for StatusReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Queue: {} messages  Streaming: {}",
            self.log_length, self.streaming
        )?;

        if self.log_length == 0 {
            return Ok(());
        }

        write!(
            f,
            "  Viewing: {}-{} of {}  ",
            self.visible.start + 1,
            self.visible.end,
            self.log_length
        )?;
        if self.auto_follow {
            f.write_str("[AUTO-SCROLL ON]")
        } else {
            write!(f, "[SCROLL: offset={}]", self.offset)
        }
    }
}
