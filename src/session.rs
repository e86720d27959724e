//! Producer-side handle over one streamed message.

use std::sync::Arc;

use tracing::warn;

use crate::board::{BoardError, MessageId, MessageStore, Receivers};

/// Owns the lifecycle of a single agent message.
///
/// The handle is deliberately not `Clone`: whoever holds it is the only party
/// that can push into the message. Dropping it without calling
/// [`AgentSession::finish`] leaves the message streaming, which is how an
/// abandoned producer shows up on the board.
#[derive(Debug)]
pub struct AgentSession {
    store: Arc<MessageStore>,
    id: MessageId,
    sender: String,
    finished: bool,
}

impl AgentSession {
    /// Starts an empty streaming message for `sender`.
    pub fn begin(
        store: Arc<MessageStore>,
        sender: impl Into<String>,
        receivers: Receivers,
    ) -> Self {
        let sender = sender.into();
        let id = store.start(sender.clone(), receivers, "");
        Self {
            store,
            id,
            sender,
            finished: false,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn push(&mut self, chunk: &str) -> Result<(), BoardError> {
        if self.finished {
            warn!(
                message_id = self.id.get(),
                sender = %self.sender,
                "chunk pushed after finish"
            );
            return Err(BoardError::AlreadyComplete(self.id));
        }

        self.store.append(self.id, chunk).inspect_err(|error| {
            warn!(sender = %self.sender, %error, "chunk rejected by store");
        })
    }

    /// Seals the message. Later calls are no-ops.
    pub fn finish(&mut self) -> Result<(), BoardError> {
        if self.finished {
            return Ok(());
        }

        self.store.complete(self.id)?;
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::board::Status;

    use super::*;

    #[test]
    fn push_and_finish_drive_one_message() {
        let store = Arc::new(MessageStore::new());
        let mut session =
            AgentSession::begin(Arc::clone(&store), "Claude", Receivers::only(["user"]));

        session.push("streamed ").expect("push");
        session.push("reply").expect("push");
        session.finish().expect("finish");

        let message = store.get(session.id()).expect("message");
        assert_eq!(message.sender, "Claude");
        assert_eq!(message.content, "streamed reply");
        assert_eq!(message.status, Status::Complete);
    }

    #[test]
    fn push_after_finish_is_rejected() {
        let store = Arc::new(MessageStore::new());
        let mut session = AgentSession::begin(Arc::clone(&store), "A", Receivers::All);
        session.push("done").expect("push");
        session.finish().expect("finish");

        assert_eq!(
            session.push("late"),
            Err(BoardError::AlreadyComplete(session.id()))
        );
        assert_eq!(store.get(session.id()).expect("message").content, "done");
    }

    #[test]
    fn second_finish_is_tolerated() {
        let store = Arc::new(MessageStore::new());
        let mut session = AgentSession::begin(store, "A", Receivers::All);
        session.finish().expect("first finish");
        session.finish().expect("second finish");
        assert!(session.is_finished());
    }

    #[test]
    fn dropped_session_stays_streaming() {
        let store = Arc::new(MessageStore::new());
        let id = {
            let mut session = AgentSession::begin(Arc::clone(&store), "A", Receivers::All);
            session.push("partial").expect("push");
            session.id()
        };

        let message = store.get(id).expect("message");
        assert_eq!(message.status, Status::Streaming);
        assert_eq!(message.content, "partial");
        assert_eq!(store.streaming_count(), 1);
    }

    #[test]
    fn reset_under_a_live_session_surfaces_unknown_message() {
        let store = Arc::new(MessageStore::new());
        let mut session = AgentSession::begin(Arc::clone(&store), "A", Receivers::All);
        store.reset();

        assert_eq!(
            session.push("x"),
            Err(BoardError::UnknownMessage(session.id()))
        );
        assert_eq!(
            session.finish(),
            Err(BoardError::UnknownMessage(session.id()))
        );
    }
}
