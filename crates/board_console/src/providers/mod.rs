use std::sync::Arc;

use agent_provider::{ChunkProducer, ProviderInitError};
use agent_provider_mock::{DemoProvider, StreamLength, DEMO_PROVIDER_ID};

use crate::roster::AgentEntry;

/// One named participant on the board and the producer that speaks for it.
#[derive(Clone)]
pub struct Agent {
    pub name: String,
    pub model: String,
    pub producer: Arc<dyn ChunkProducer>,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("provider", &self.producer.profile().provider_id)
            .finish()
    }
}

pub fn producer_for_entry(
    entry: &AgentEntry,
) -> Result<Arc<dyn ChunkProducer>, ProviderInitError> {
    match entry.provider.trim() {
        DEMO_PROVIDER_ID => {
            let stream_length: StreamLength = entry.stream_length.parse()?;
            Ok(Arc::new(DemoProvider::new(
                entry.model.clone(),
                entry.chars_per_second,
                stream_length,
            )))
        }
        unknown => Err(ProviderInitError::new(format!(
            "Unsupported provider '{unknown}'. Available providers: {DEMO_PROVIDER_ID}"
        ))),
    }
}

pub fn agents_from_roster(entries: &[AgentEntry]) -> Result<Vec<Agent>, ProviderInitError> {
    entries
        .iter()
        .map(|entry| {
            let producer = producer_for_entry(entry).map_err(|error| {
                ProviderInitError::new(format!("agent '{}': {}", entry.name, error.message()))
            })?;
            Ok(Agent {
                name: entry.name.clone(),
                model: entry.model.clone(),
                producer,
            })
        })
        .collect()
}
