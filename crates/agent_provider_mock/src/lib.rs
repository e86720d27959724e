//! Deterministic producers implementing the shared `agent_provider` contract.
//!
//! This crate contains no transport logic and is intended for local demos and
//! contract-level integration testing.

use std::str::FromStr;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use agent_provider::{
    CancelSignal, ChunkProducer, ProducerProfile, PromptRequest, ProviderInitError, StreamEvent,
};

/// Provider identifier of [`DemoProvider`].
pub const DEMO_PROVIDER_ID: &str = "demo";
/// Provider identifier of [`ScriptedProvider`].
pub const SCRIPTED_PROVIDER_ID: &str = "scripted";

/// Reply size of a [`DemoProvider`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl FromStr for StreamLength {
    type Err = ProviderInitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            other => Err(ProviderInitError::new(format!(
                "Unsupported stream length '{other}'. Expected short, medium, or long"
            ))),
        }
    }
}

/// Streams a canned, prompt-aware reply at a fixed typing speed.
#[derive(Debug, Clone)]
pub struct DemoProvider {
    model_id: String,
    chars_per_second: u32,
    stream_length: StreamLength,
}

impl DemoProvider {
    pub const DEFAULT_CHARS_PER_SECOND: u32 = 50;

    #[must_use]
    pub fn new(
        model_id: impl Into<String>,
        chars_per_second: u32,
        stream_length: StreamLength,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            chars_per_second: chars_per_second.max(1),
            stream_length,
        }
    }

    /// Characters per emitted chunk; about twenty chunks per second.
    fn chunk_chars(&self) -> usize {
        (self.chars_per_second as usize / 20).max(1)
    }

    fn delay_for(&self, chars: usize) -> Duration {
        Duration::from_secs_f64(chars as f64 / f64::from(self.chars_per_second))
    }

    /// Full reply text for a request.
    #[must_use]
    pub fn reply_for(&self, req: &PromptRequest) -> String {
        let name = &req.agent;
        let model = &self.model_id;
        let prompt = req.text.to_lowercase();

        match self.stream_length {
            StreamLength::Short => format!("**{name}**: Quick response to your query! ✨"),
            StreamLength::Medium if prompt.contains("hello") || prompt.contains("hi") => format!(
                "Hello from **{name}**! 👋\n\n\
                 I'm streaming this response chunk by chunk. Notice how I can stream \
                 concurrently with other agents without blocking them!"
            ),
            StreamLength::Medium
                if prompt.contains("concurrent") || prompt.contains("parallel") =>
            {
                format!(
                    "**{name} here!**\n\n\
                     Yes, this console supports truly concurrent streaming! Multiple agents \
                     can stream simultaneously without waiting for each other. ⚡"
                )
            }
            StreamLength::Medium => format!(
                "**{name}** ({model}):\n\n\
                 This is a demo response showing concurrent streaming. The shared board lets \
                 several agents update their messages in parallel! 🎯"
            ),
            StreamLength::Long => format!(
                "**{name}** - Extended Response 📝\n\n\
                 Thank you for your question! This is a **long streaming response** showing how \
                 the board handles extended output.\n\n\
                 **Why a shared board:**\n\n\
                 1. No blocking: this reply streams while other agents stream theirs\n\
                 2. Everyone responds at once instead of taking turns\n\
                 3. Many concurrent streams are fine\n\
                 4. No agent monopolizes the display\n\n\
                 **How it works:**\n\n\
                 Each agent starts a message on the board, appends chunks as they arrive, and \
                 marks it complete when done. The console redraws at a fixed rate and always \
                 shows the latest state of every message.\n\n\
                 - {name} ({model})"
            ),
        }
    }
}

impl Default for DemoProvider {
    fn default() -> Self {
        Self::new("demo", Self::DEFAULT_CHARS_PER_SECOND, StreamLength::Medium)
    }
}

impl ChunkProducer for DemoProvider {
    fn profile(&self) -> ProducerProfile {
        ProducerProfile {
            provider_id: DEMO_PROVIDER_ID.to_string(),
            model_id: self.model_id.clone(),
        }
    }

    fn produce(
        &self,
        req: PromptRequest,
        cancel: CancelSignal,
        emit: &mut dyn FnMut(StreamEvent),
    ) -> Result<(), String> {
        let prompt_id = req.prompt_id;
        let reply: Vec<char> = self.reply_for(&req).chars().collect();

        for chunk in reply.chunks(self.chunk_chars()) {
            if cancel.load(Ordering::SeqCst) {
                emit(StreamEvent::Cancelled { prompt_id });
                return Ok(());
            }

            emit(StreamEvent::Chunk {
                prompt_id,
                text: chunk.iter().collect(),
            });
            thread::sleep(self.delay_for(chunk.len()));
        }

        emit(StreamEvent::Finished { prompt_id });
        Ok(())
    }
}

/// How a [`ScriptedProvider`] ends its stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEnding {
    Finish,
    /// Emits `Failed` with the given reason.
    Fail(String),
    /// Returns `Err` without emitting a terminal event.
    Error(String),
    /// Returns without emitting anything terminal, like a producer that
    /// simply stopped.
    Abandon,
}

/// Replays fixed chunks; used by tests.
#[derive(Debug, Clone)]
pub struct ScriptedProvider {
    chunks: Vec<String>,
    chunk_delay: Duration,
    ending: ScriptEnding,
}

impl ScriptedProvider {
    #[must_use]
    pub fn new(chunks: Vec<String>) -> Self {
        Self {
            chunks,
            chunk_delay: Duration::ZERO,
            ending: ScriptEnding::Finish,
        }
    }

    #[must_use]
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    #[must_use]
    pub fn ending_with(mut self, ending: ScriptEnding) -> Self {
        self.ending = ending;
        self
    }
}

impl ChunkProducer for ScriptedProvider {
    fn profile(&self) -> ProducerProfile {
        ProducerProfile {
            provider_id: SCRIPTED_PROVIDER_ID.to_string(),
            model_id: "scripted".to_string(),
        }
    }

    fn produce(
        &self,
        req: PromptRequest,
        cancel: CancelSignal,
        emit: &mut dyn FnMut(StreamEvent),
    ) -> Result<(), String> {
        let prompt_id = req.prompt_id;

        for chunk in &self.chunks {
            if cancel.load(Ordering::SeqCst) {
                emit(StreamEvent::Cancelled { prompt_id });
                return Ok(());
            }

            emit(StreamEvent::Chunk {
                prompt_id,
                text: chunk.clone(),
            });
            if !self.chunk_delay.is_zero() {
                thread::sleep(self.chunk_delay);
            }
        }

        match &self.ending {
            ScriptEnding::Finish => emit(StreamEvent::Finished { prompt_id }),
            ScriptEnding::Fail(error) => emit(StreamEvent::Failed {
                prompt_id,
                error: error.clone(),
            }),
            ScriptEnding::Error(error) => return Err(error.clone()),
            ScriptEnding::Abandon => {}
        }

        Ok(())
    }
}
