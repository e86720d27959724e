//! Agent roster loading.
//!
//! `BOARD_CONSOLE_AGENTS_PATH` may point to a UTF-8 JSON file:
//!
//! ```json
//! {
//!   "agents": [
//!     { "name": "Claude", "model": "claude-3-opus", "provider": "demo",
//!       "chars_per_second": 90, "stream_length": "medium" }
//!   ]
//! }
//! ```
//!
//! `provider`, `chars_per_second` and `stream_length` are optional. Unknown
//! fields are rejected. Without the variable a built-in demo roster is used.

use std::fs;
use std::path::{Path, PathBuf};

use agent_provider_mock::{DemoProvider, DEMO_PROVIDER_ID};
use serde::Deserialize;
use thiserror::Error;

pub const AGENTS_PATH_ENV_VAR: &str = "BOARD_CONSOLE_AGENTS_PATH";

/// Names an agent may not take; they address the human side of the board.
const RESERVED_NAMES: &[&str] = &["user", "system", "all"];

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read agent roster at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse agent roster at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("agent roster at {path} defines no agents")]
    Empty { path: PathBuf },

    #[error("agent name '{name}' appears more than once")]
    DuplicateAgent { name: String },

    #[error("invalid agent '{name}': {reason}")]
    InvalidAgent { name: String, reason: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RosterFile {
    agents: Vec<AgentEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentEntry {
    pub name: String,
    pub model: String,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_chars_per_second")]
    pub chars_per_second: u32,
    #[serde(default = "default_stream_length")]
    pub stream_length: String,
}

fn default_provider() -> String {
    DEMO_PROVIDER_ID.to_string()
}

fn default_chars_per_second() -> u32 {
    DemoProvider::DEFAULT_CHARS_PER_SECOND
}

fn default_stream_length() -> String {
    "medium".to_string()
}

impl AgentEntry {
    pub fn demo(name: &str, model: &str, chars_per_second: u32) -> Self {
        Self {
            name: name.to_string(),
            model: model.to_string(),
            provider: default_provider(),
            chars_per_second,
            stream_length: default_stream_length(),
        }
    }
}

pub fn default_roster() -> Vec<AgentEntry> {
    vec![
        AgentEntry::demo("GPT-4", "gpt-4-turbo", 80),
        AgentEntry::demo("Claude", "claude-3-opus", 90),
        AgentEntry::demo("Gemini", "gemini-pro", 70),
    ]
}

pub fn roster_from_env() -> Result<Vec<AgentEntry>, RosterError> {
    let path = std::env::var(AGENTS_PATH_ENV_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    match path {
        Some(path) => load_roster(Path::new(&path)),
        None => Ok(default_roster()),
    }
}

pub fn load_roster(path: &Path) -> Result<Vec<AgentEntry>, RosterError> {
    let raw = fs::read_to_string(path).map_err(|source| RosterError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: RosterFile = serde_json::from_str(&raw).map_err(|source| RosterError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if file.agents.is_empty() {
        return Err(RosterError::Empty {
            path: path.to_path_buf(),
        });
    }

    validate(file.agents)
}

fn validate(agents: Vec<AgentEntry>) -> Result<Vec<AgentEntry>, RosterError> {
    let mut seen: Vec<&str> = Vec::with_capacity(agents.len());

    for agent in &agents {
        let name = agent.name.as_str();
        let invalid = |reason: &str| RosterError::InvalidAgent {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if name.chars().any(|ch| ch.is_whitespace() || ch == ',' || ch == '@') {
            return Err(invalid("name must not contain whitespace, ',' or '@'"));
        }
        if RESERVED_NAMES.contains(&name.to_ascii_lowercase().as_str()) {
            return Err(invalid("name is reserved"));
        }
        if agent.model.trim().is_empty() {
            return Err(invalid("model must not be empty"));
        }
        if agent.chars_per_second == 0 {
            return Err(invalid("chars_per_second must be > 0"));
        }
        if seen.contains(&name) {
            return Err(RosterError::DuplicateAgent {
                name: name.to_string(),
            });
        }
        seen.push(name);
    }

    Ok(agents)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    use super::*;

    fn roster_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write roster");
        file
    }

    #[test]
    fn default_roster_has_three_demo_agents() {
        let names: Vec<_> = default_roster()
            .into_iter()
            .map(|agent| (agent.name, agent.chars_per_second))
            .collect();
        assert_eq!(
            names,
            vec![
                ("GPT-4".to_string(), 80),
                ("Claude".to_string(), 90),
                ("Gemini".to_string(), 70),
            ]
        );
    }

    #[test]
    fn load_roster_fills_optional_fields() {
        let file = roster_file(r#"{"agents":[{"name":"Scout","model":"local-1"}]}"#);
        let agents = load_roster(file.path()).expect("roster loads");
        assert_eq!(
            agents,
            vec![AgentEntry {
                name: "Scout".to_string(),
                model: "local-1".to_string(),
                provider: "demo".to_string(),
                chars_per_second: 50,
                stream_length: "medium".to_string(),
            }]
        );
    }

    #[test]
    fn load_roster_rejects_unknown_fields() {
        let file =
            roster_file(r#"{"agents":[{"name":"Scout","model":"m","temperature":0.2}]}"#);
        let error = load_roster(file.path()).expect_err("unknown field");
        assert!(matches!(error, RosterError::Parse { .. }));
        assert!(error.to_string().contains("temperature"));
    }

    #[test]
    fn load_roster_reports_missing_file_with_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.json");
        let error = load_roster(&path).expect_err("missing file");
        assert!(matches!(error, RosterError::Read { .. }));
        assert!(error.to_string().contains("absent.json"));
    }

    #[test]
    fn load_roster_rejects_empty_duplicate_and_reserved_names() {
        let empty = roster_file(r#"{"agents":[]}"#);
        assert!(matches!(
            load_roster(empty.path()),
            Err(RosterError::Empty { .. })
        ));

        let duplicate = roster_file(
            r#"{"agents":[{"name":"A","model":"m"},{"name":"A","model":"n"}]}"#,
        );
        assert!(matches!(
            load_roster(duplicate.path()),
            Err(RosterError::DuplicateAgent { name }) if name == "A"
        ));

        let reserved = roster_file(r#"{"agents":[{"name":"User","model":"m"}]}"#);
        assert!(matches!(
            load_roster(reserved.path()),
            Err(RosterError::InvalidAgent { reason, .. }) if reason == "name is reserved"
        ));

        let spaced = roster_file(r#"{"agents":[{"name":"Deep Thought","model":"m"}]}"#);
        assert!(matches!(
            load_roster(spaced.path()),
            Err(RosterError::InvalidAgent { .. })
        ));
    }
}
