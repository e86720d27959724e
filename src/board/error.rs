use thiserror::Error;

use super::message::MessageId;

/// Errors surfaced to the producer that issued the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("message {0} does not exist")]
    UnknownMessage(MessageId),

    #[error("message {0} is already complete; chunk rejected")]
    AlreadyComplete(MessageId),
}

impl BoardError {
    #[must_use]
    pub fn message_id(&self) -> MessageId {
        match self {
            Self::UnknownMessage(id) | Self::AlreadyComplete(id) => *id,
        }
    }
}
