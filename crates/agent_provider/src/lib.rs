//! Minimal producer-agnostic contract for streaming one reply.
//!
//! A producer turns a prompt into a sequence of text chunks terminated by a
//! completion, a failure, or a cancellation. How the chunks are obtained
//! (network stream, local generator, fixture) is the producer's business; the
//! host only sees the emitted [`StreamEvent`]s.

use std::fmt;
use std::sync::{atomic::AtomicBool, Arc};

/// Identifier for one prompt dispatched to one producer.
pub type PromptId = u64;

/// Shared cancellation flag for a stream.
pub type CancelSignal = Arc<AtomicBool>;

/// Error returned while constructing/configuring a producer before any stream starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInitError {
    message: String,
}

impl ProviderInitError {
    /// Creates a new producer initialization error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the underlying error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ProviderInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProviderInitError {}

impl From<String> for ProviderInitError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ProviderInitError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// One earlier exchange an agent remembers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    Prompt { from: String, text: String },
    Reply { text: String },
}

/// Input required to start a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub prompt_id: PromptId,
    /// Name of the agent the reply is produced for.
    pub agent: String,
    /// Identity that sent the prompt (usually `user`).
    pub from: String,
    pub text: String,
    /// Earlier turns of this agent, oldest first.
    pub history: Vec<Turn>,
}

/// Producer-emitted lifecycle event for a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Chunk { prompt_id: PromptId, text: String },
    Finished { prompt_id: PromptId },
    Failed { prompt_id: PromptId, error: String },
    Cancelled { prompt_id: PromptId },
}

impl StreamEvent {
    /// Returns the prompt identifier associated with this event.
    #[must_use]
    pub fn prompt_id(&self) -> PromptId {
        match self {
            Self::Chunk { prompt_id, .. }
            | Self::Finished { prompt_id }
            | Self::Failed { prompt_id, .. }
            | Self::Cancelled { prompt_id } => *prompt_id,
        }
    }

    /// Returns true when this event terminates the stream.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Chunk { .. })
    }
}

/// Immutable metadata describing a producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerProfile {
    pub provider_id: String,
    pub model_id: String,
}

/// Producer interface for streaming one reply.
pub trait ChunkProducer: Send + Sync + 'static {
    /// Returns producer/model identity metadata.
    fn profile(&self) -> ProducerProfile;

    /// Streams a reply and emits events in order.
    ///
    /// Implementations emit exactly one terminal event on the happy path.
    /// Returning `Err` without a terminal event is reported by the host as a
    /// failure of the stream.
    fn produce(
        &self,
        req: PromptRequest,
        cancel: CancelSignal,
        emit: &mut dyn FnMut(StreamEvent),
    ) -> Result<(), String>;
}
