//! Terminal console over the shared agent board.
//!
//! ## Agents
//!
//! The roster comes from `BOARD_CONSOLE_AGENTS_PATH` (see [`roster`]) or, when
//! unset, three built-in demo agents. Each typed line is either a console
//! command (`help` lists them) or a message. `@name1,name2 text` addresses
//! specific agents; anything else is broadcast. Every addressed agent streams
//! its reply into the board on its own thread.
//!
//! ## Display
//!
//! The board refreshes at `AGENT_BOARD_REFRESH_RATE` frames per second and
//! shows `AGENT_BOARD_VIEWPORT` messages. Set `AGENT_BOARD_LOG` to a file path
//! to capture tracing output; stdout belongs to the board.

pub mod app;
pub mod commands;
pub mod host;
pub mod providers;
pub mod roster;
pub mod runtime;
pub mod tui;
