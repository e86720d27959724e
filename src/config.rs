//! Environment configuration.

use std::env;
use std::path::PathBuf;

use crate::runtime::DEFAULT_REFRESH_RATE;
use crate::scroll::DEFAULT_VIEWPORT_SIZE;

pub const REFRESH_RATE_ENV_VAR: &str = "AGENT_BOARD_REFRESH_RATE";
pub const VIEWPORT_ENV_VAR: &str = "AGENT_BOARD_VIEWPORT";
pub const LOG_FILE_ENV_VAR: &str = "AGENT_BOARD_LOG";
pub const DEBUG_ENV_VAR: &str = "AGENT_BOARD_DEBUG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    /// Frames per second of the render loop.
    pub refresh_rate: u32,
    /// Messages shown at once.
    pub viewport_size: usize,
    pub log_file: Option<PathBuf>,
    pub debug: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            refresh_rate: DEFAULT_REFRESH_RATE,
            viewport_size: DEFAULT_VIEWPORT_SIZE,
            log_file: None,
            debug: false,
        }
    }
}

impl EnvConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            refresh_rate: env_positive(REFRESH_RATE_ENV_VAR).unwrap_or(defaults.refresh_rate),
            viewport_size: env_positive(VIEWPORT_ENV_VAR).unwrap_or(defaults.viewport_size),
            log_file: env_string_opt(LOG_FILE_ENV_VAR).map(PathBuf::from),
            debug: env_flag(DEBUG_ENV_VAR),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

/// Parses a strictly positive integer; zero and garbage read as unset.
fn env_positive<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    env_string_opt(key)
        .and_then(|value| value.trim().parse::<T>().ok())
        .filter(|value| *value > T::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock poisoned")
    }

    fn set_env_guard(key: &'static str, value: Option<&str>) -> EnvGuard {
        let previous = env::var(key).ok();
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
        EnvGuard { key, previous }
    }

    #[test]
    fn env_defaults_match_console_cadence() {
        let _lock = env_lock();
        let _g1 = set_env_guard(REFRESH_RATE_ENV_VAR, None);
        let _g2 = set_env_guard(VIEWPORT_ENV_VAR, None);
        let _g3 = set_env_guard(LOG_FILE_ENV_VAR, None);
        let _g4 = set_env_guard(DEBUG_ENV_VAR, None);

        let config = EnvConfig::from_env();
        assert_eq!(config, EnvConfig::default());
        assert_eq!(config.refresh_rate, 10);
        assert_eq!(config.viewport_size, 10);
    }

    #[test]
    fn env_values_override_defaults() {
        let _lock = env_lock();
        let _g1 = set_env_guard(REFRESH_RATE_ENV_VAR, Some("30"));
        let _g2 = set_env_guard(VIEWPORT_ENV_VAR, Some(" 6 "));
        let _g3 = set_env_guard(LOG_FILE_ENV_VAR, Some("/tmp/board.log"));
        let _g4 = set_env_guard(DEBUG_ENV_VAR, Some("1"));

        let config = EnvConfig::from_env();
        assert_eq!(config.refresh_rate, 30);
        assert_eq!(config.viewport_size, 6);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/board.log")));
        assert!(config.debug);
    }

    #[test]
    fn zero_or_invalid_numbers_fall_back() {
        let _lock = env_lock();
        let _g1 = set_env_guard(REFRESH_RATE_ENV_VAR, Some("0"));
        let _g2 = set_env_guard(VIEWPORT_ENV_VAR, Some("lots"));
        let _g3 = set_env_guard(LOG_FILE_ENV_VAR, Some("  "));

        let config = EnvConfig::from_env();
        assert_eq!(config.refresh_rate, 10);
        assert_eq!(config.viewport_size, 10);
        assert!(config.log_file.is_none());
    }
}
