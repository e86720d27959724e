//! Shared bulletin-board log.
//!
//! Layout: the ordered entry list and the id index sit behind one `RwLock`,
//! taken for writing only when a message is allocated or the log is reset.
//! Each entry keeps its mutable body (content, status) behind its own
//! `Mutex`, so chunks appended to different messages never contend with each
//! other, and a snapshot observes every body either before or after a given
//! append, never halfway through it.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use time::OffsetDateTime;
use tracing::{debug, trace};

use super::error::BoardError;
use super::message::{now, Message, MessageId, Receivers, SenderKind, Status};

struct Body {
    content: String,
    status: Status,
    updated_at: OffsetDateTime,
}

struct Entry {
    id: MessageId,
    sender: String,
    sender_kind: SenderKind,
    receivers: Receivers,
    created_at: OffsetDateTime,
    body: Mutex<Body>,
}

impl Entry {
    fn to_message(&self) -> Message {
        let body = lock_unpoisoned(&self.body);
        Message {
            id: self.id,
            sender: self.sender.clone(),
            sender_kind: self.sender_kind,
            receivers: self.receivers.clone(),
            content: body.content.clone(),
            status: body.status,
            created_at: self.created_at,
            updated_at: body.updated_at,
        }
    }

    fn status(&self) -> Status {
        lock_unpoisoned(&self.body).status
    }
}

#[derive(Default)]
struct Log {
    entries: Vec<Arc<Entry>>,
    index: HashMap<MessageId, usize>,
}

/// Thread-safe append-only message log.
///
/// All methods take `&self`; share the store between producers and the
/// render loop with an `Arc`.
#[derive(Default)]
pub struct MessageStore {
    log: RwLock<Log>,
    next_id: AtomicU64,
}

impl fmt::Debug for MessageStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageStore")
            .field("len", &self.len())
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish()
    }
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new streaming agent message and returns its id.
    pub fn start(
        &self,
        sender: impl Into<String>,
        receivers: Receivers,
        initial_chunk: impl Into<String>,
    ) -> MessageId {
        self.start_as(sender, SenderKind::Agent, receivers, initial_chunk)
    }

    /// Same as [`MessageStore::start`] with an explicit sender kind.
    pub fn start_as(
        &self,
        sender: impl Into<String>,
        sender_kind: SenderKind,
        receivers: Receivers,
        initial_chunk: impl Into<String>,
    ) -> MessageId {
        self.insert(
            sender.into(),
            sender_kind,
            receivers,
            initial_chunk.into(),
            Status::Streaming,
        )
    }

    /// Appends an already complete message (user input, console notices).
    pub fn post(
        &self,
        sender: impl Into<String>,
        sender_kind: SenderKind,
        receivers: Receivers,
        content: impl Into<String>,
    ) -> MessageId {
        self.insert(
            sender.into(),
            sender_kind,
            receivers,
            content.into(),
            Status::Complete,
        )
    }

    fn insert(
        &self,
        sender: String,
        sender_kind: SenderKind,
        receivers: Receivers,
        content: String,
        status: Status,
    ) -> MessageId {
        let created_at = now();
        let mut log = self.write_log();

        // Allocated under the write lock so ids ascend with log position.
        let id = MessageId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let position = log.entries.len();

        debug!(
            message_id = id.get(),
            position,
            sender = %sender,
            receivers = %receivers.display(),
            ?status,
            "message started"
        );

        log.entries.push(Arc::new(Entry {
            id,
            sender,
            sender_kind,
            receivers,
            created_at,
            body: Mutex::new(Body {
                content,
                status,
                updated_at: created_at,
            }),
        }));
        log.index.insert(id, position);

        id
    }

    /// Concatenates `chunk` onto a streaming message.
    pub fn append(&self, id: MessageId, chunk: &str) -> Result<(), BoardError> {
        let entry = self.entry(id)?;
        let mut body = lock_unpoisoned(&entry.body);
        if body.status == Status::Complete {
            debug!(message_id = id.get(), "append rejected: message complete");
            return Err(BoardError::AlreadyComplete(id));
        }

        body.content.push_str(chunk);
        body.updated_at = now();
        trace!(message_id = id.get(), bytes = chunk.len(), "chunk appended");
        Ok(())
    }

    /// Seals a message. Completing an already complete message is a no-op.
    pub fn complete(&self, id: MessageId) -> Result<(), BoardError> {
        let entry = self.entry(id)?;
        let mut body = lock_unpoisoned(&entry.body);
        if body.status == Status::Complete {
            return Ok(());
        }

        body.status = Status::Complete;
        body.updated_at = now();
        debug!(
            message_id = id.get(),
            bytes = body.content.len(),
            "message complete"
        );
        Ok(())
    }

    /// Copies the whole log in insertion order.
    pub fn snapshot(&self) -> Snapshot {
        let entries = self.read_log().entries.clone();
        Snapshot {
            messages: entries.iter().map(|entry| entry.to_message()).collect(),
        }
    }

    /// Copy of a single message.
    pub fn get(&self, id: MessageId) -> Option<Message> {
        self.entry(id).ok().map(|entry| entry.to_message())
    }

    pub fn len(&self) -> usize {
        self.read_log().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn streaming_count(&self) -> usize {
        let entries = self.read_log().entries.clone();
        entries
            .iter()
            .filter(|entry| entry.status() == Status::Streaming)
            .count()
    }

    /// Completed messages only, oldest first, limited to the newest `last_n`
    /// when given.
    pub fn completed(&self, last_n: Option<usize>) -> Vec<Message> {
        let entries = self.read_log().entries.clone();
        let mut completed: Vec<Message> = entries
            .iter()
            .map(|entry| entry.to_message())
            .filter(|message| message.status == Status::Complete)
            .collect();

        if let Some(limit) = last_n {
            let excess = completed.len().saturating_sub(limit);
            completed.drain(..excess);
        }

        completed
    }

    /// Drops every message. Ids handed out earlier become unknown.
    pub fn reset(&self) {
        let mut log = self.write_log();
        let dropped = log.entries.len();
        log.entries.clear();
        log.index.clear();
        debug!(dropped, "message log reset");
    }

    fn entry(&self, id: MessageId) -> Result<Arc<Entry>, BoardError> {
        let log = self.read_log();
        log.index
            .get(&id)
            .and_then(|position| log.entries.get(*position))
            .cloned()
            .ok_or(BoardError::UnknownMessage(id))
    }

    fn read_log(&self) -> RwLockReadGuard<'_, Log> {
        self.log
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_log(&self) -> RwLockWriteGuard<'_, Log> {
        self.log
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Immutable, ordered copy of the log taken by [`MessageStore::snapshot`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    messages: Vec<Message>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    pub fn streaming_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|message| message.is_streaming())
            .count()
    }

    /// Messages in `range`, clamped to the snapshot bounds.
    pub fn slice(&self, range: Range<usize>) -> &[Message] {
        let end = range.end.min(self.messages.len());
        let start = range.start.min(end);
        &self.messages[start..end]
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
