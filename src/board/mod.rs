//! Bulletin-board message log.

mod error;
mod message;
mod store;

pub use error::BoardError;
pub use message::{Message, MessageId, Receivers, SenderKind, Status};
pub use store::{MessageStore, Snapshot};
