//! Message model shared by producers and viewers.

use std::fmt;

use time::OffsetDateTime;

/// Opaque identifier assigned by the store when a message starts.
///
/// Identifiers are allocated from a monotonic counter and are never reused,
/// not even after [`MessageStore::reset`](crate::MessageStore::reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl MessageId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw counter value, useful for logs.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderKind {
    User,
    Agent,
    System,
}

/// Streaming lifecycle. Transitions only `Streaming -> Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Streaming,
    Complete,
}

/// Addressees of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receivers {
    All,
    Only(Vec<String>),
}

impl Receivers {
    /// Builds an explicit receiver list.
    ///
    /// Names are trimmed, blanks and duplicates are dropped (first occurrence
    /// wins) and an empty result collapses to [`Receivers::All`].
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() || unique.iter().any(|existing| existing == name) {
                continue;
            }
            unique.push(name.to_string());
        }

        if unique.is_empty() {
            Self::All
        } else {
            Self::Only(unique)
        }
    }

    pub fn is_broadcast(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn includes(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.iter().any(|candidate| candidate == name),
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::All => "ALL".to_string(),
            Self::Only(names) => names.join(", "),
        }
    }
}

/// Point-in-time copy of one log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub sender: String,
    pub sender_kind: SenderKind,
    pub receivers: Receivers,
    pub content: String,
    pub status: Status,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Message {
    pub fn is_streaming(&self) -> bool {
        self.status == Status::Streaming
    }

    /// Whether `recipient` should see this message.
    pub fn is_for(&self, recipient: &str) -> bool {
        self.receivers.includes(recipient)
    }

    pub fn receiver_display(&self) -> String {
        self.receivers.display()
    }
}

/// Wall-clock timestamp in the local offset when it can be determined.
pub(crate) fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
