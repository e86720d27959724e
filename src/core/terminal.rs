//! Terminal output abstraction.

use std::io::{self, Write};

/// Minimal terminal interface the board presenter draws through.
pub trait Terminal {
    /// Write output to the terminal.
    fn write(&mut self, data: &str);

    /// Terminal dimensions.
    fn columns(&self) -> u16;
    fn rows(&self) -> u16;
}

/// Stdout-backed terminal. Size comes from `TIOCGWINSZ` on unix and falls
/// back to 80x24.
#[derive(Debug, Default)]
pub struct ProcessTerminal {
    _private: (),
}

impl ProcessTerminal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Terminal for ProcessTerminal {
    fn write(&mut self, data: &str) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(data.as_bytes());
        let _ = stdout.flush();
    }

    fn columns(&self) -> u16 {
        read_winsize().map(|(cols, _)| cols).unwrap_or(80)
    }

    fn rows(&self) -> u16 {
        read_winsize().map(|(_, rows)| rows).unwrap_or(24)
    }
}

#[cfg(unix)]
fn read_winsize() -> Option<(u16, u16)> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut size) };
    if result == 0 && size.ws_col > 0 && size.ws_row > 0 {
        Some((size.ws_col, size.ws_row))
    } else {
        None
    }
}

#[cfg(not(unix))]
fn read_winsize() -> Option<(u16, u16)> {
    None
}
