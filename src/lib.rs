//! Shared message board for concurrently streaming agents.
//!
//! Invariant: the log only grows. Producers append through
//! [`AgentSession`] handles (or the id-based [`MessageStore`] calls); viewers
//! only ever read [`Snapshot`]s.
//!
//! # Public API Overview
//! - [`MessageStore`]: thread-safe start/append/complete/snapshot.
//! - [`AgentSession`]: one producer's begin/push/finish handle.
//! - [`ScrollState`]: viewport offset and auto-follow bookkeeping.
//! - [`RenderLoop`]: fixed-cadence snapshot/render driver with a
//!   [`RenderHandle`] for navigation commands from other threads.
//! - [`Frame`]: plain-text layout of a [`View`] for terminal presenters.

pub mod config;
pub mod logging;

pub mod board;
pub mod core;
pub mod render;
pub mod runtime;
pub mod scroll;
pub mod session;
pub mod status;

/// Message log types.
pub use crate::board::{
    BoardError, Message, MessageId, MessageStore, Receivers, SenderKind, Snapshot, Status,
};

/// Producer handle.
pub use crate::session::AgentSession;

/// Viewport state and commands.
pub use crate::scroll::{ScrollState, ViewCommand};

/// Render loop and presenter contract.
pub use crate::runtime::{LoopOptions, LoopState, Presenter, RenderHandle, RenderLoop, View};

/// Status line figures.
pub use crate::status::StatusReadout;

/// Terminal interfaces and process-backed implementation.
pub use crate::core::terminal::{ProcessTerminal, Terminal};

/// Frame layout.
pub use crate::render::Frame;

/// Width helpers for plain text.
pub use crate::core::text::width::{truncate_to_width, visible_width, wrap_to_width};

pub use crate::config::EnvConfig;
