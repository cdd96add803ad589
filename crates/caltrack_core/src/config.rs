//! Tracker configuration.
//!
//! # Responsibility
//! - Read optional TOML configuration for the events file and logging.
//! - Apply environment overrides on top of file values.
//!
//! # Invariants
//! - Every key is optional; absent keys keep their defaults.
//! - Unknown keys are rejected so typos do not silently fall back.

use crate::storage::json_file::DEFAULT_EVENTS_FILE;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Env var naming the config file when no explicit path is given.
pub const CONFIG_ENV: &str = "CALTRACK_CONFIG";
/// Env var overriding `events_file`.
pub const EVENTS_FILE_ENV: &str = "CALTRACK_EVENTS_FILE";
/// Env var overriding `log_level`.
pub const LOG_LEVEL_ENV: &str = "CALTRACK_LOG_LEVEL";

/// Quiet by default so one-shot commands only surface warnings.
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: Option<PathBuf>,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config at `{}`: {source}", path.display())
            }
            Self::Parse {
                path: Some(path),
                message,
            } => write!(f, "invalid config at `{}`: {message}", path.display()),
            Self::Parse {
                path: None,
                message,
            } => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// JSON file backing the event collection.
    pub events_file: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            events_file: PathBuf::from(DEFAULT_EVENTS_FILE),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_dir: None,
        }
    }
}

impl TrackerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|err| ConfigError::Parse {
            path: None,
            message: err.to_string(),
        })
    }

    /// Loads config from `explicit`, else from `$CALTRACK_CONFIG`, else
    /// returns defaults.
    ///
    /// # Errors
    /// - A named file that cannot be read or parsed is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match std::env::var_os(CONFIG_ENV) {
                Some(value) if !value.is_empty() => PathBuf::from(value),
                _ => return Ok(Self::default()),
            },
        };

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|err| match err {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: Some(path),
                message,
            },
            other => other,
        })
    }

    /// Applies `CALTRACK_EVENTS_FILE` and `CALTRACK_LOG_LEVEL`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`; empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(EVENTS_FILE_ENV).filter(|value| !value.is_empty()) {
            self.events_file = PathBuf::from(value);
        }
        if let Some(value) = lookup(LOG_LEVEL_ENV).filter(|value| !value.is_empty()) {
            self.log_level = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, TrackerConfig, EVENTS_FILE_ENV, LOG_LEVEL_ENV};
    use std::path::PathBuf;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = TrackerConfig::from_toml_str("").unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.events_file, PathBuf::from("events.json"));
    }

    #[test]
    fn toml_overrides_selected_keys() {
        let config = TrackerConfig::from_toml_str(
            "events_file = \"/tmp/cal.json\"\nlog_level = \"info\"\nlog_dir = \"/var/log/caltrack\"\n",
        )
        .unwrap();
        assert_eq!(config.events_file, PathBuf::from("/tmp/cal.json"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/caltrack")));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = TrackerConfig::from_toml_str("event_file = \"x.json\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: None, .. }));
    }

    #[test]
    fn load_reports_path_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = TrackerConfig::load(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn load_reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("caltrack.toml");
        std::fs::write(&path, "log_level = \"error\"\n").unwrap();

        let config = TrackerConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.log_level, "error");
    }

    #[test]
    fn overrides_ignore_empty_values() {
        let mut config = TrackerConfig::default();
        config.apply_overrides(|key| match key {
            k if k == EVENTS_FILE_ENV => Some("other.json".to_string()),
            k if k == LOG_LEVEL_ENV => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.events_file, PathBuf::from("other.json"));
        assert_eq!(config.log_level, TrackerConfig::default().log_level);
    }
}
