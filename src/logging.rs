//! Tracing setup.
//!
//! The board owns stdout, so diagnostics only go to the file named by
//! `AGENT_BOARD_LOG`. Without it no subscriber is installed and every
//! `tracing` macro is a no-op.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;

/// Installs the global subscriber. Returns whether one was installed.
///
/// The filter comes from `RUST_LOG`; it defaults to `info`, or `debug` when
/// `AGENT_BOARD_DEBUG=1`.
pub fn init_tracing(config: &EnvConfig) -> io::Result<bool> {
    let Some(path) = config.log_file.as_deref() else {
        return Ok(false);
    };

    let filter = default_filter(config.debug);
    install_file_subscriber(path, filter)?;

    tracing::debug!(
        target: "agent_board::logging",
        path = %path.display(),
        "tracing initialized with file output"
    );
    Ok(true)
}

fn default_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }))
}

fn install_file_subscriber(path: &Path, filter: EnvFilter) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(
            fmt::Layer::new()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_thread_names(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init()
        .map_err(io::Error::other)
}
