//! Application settings loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Settings {
    /// JSON file backing the key-value store.
    #[serde(default = "default_store_path")]
    store_path: PathBuf,

    /// Counter settings.
    #[serde(default)]
    counter: CounterSettings,
}

/// Settings for the persisted counter.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct CounterSettings {
    /// Store key holding the count.
    #[serde(default = "default_counter_key")]
    key: String,

    /// Count used when the store has no usable value.
    #[serde(default)]
    initial_count: i64,

    /// Amount added per increment.
    #[serde(default = "default_step")]
    step: i64,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("squares_store.json")
}

fn default_counter_key() -> String {
    "count".to_string()
}

fn default_step() -> i64 {
    1
}

impl Default for CounterSettings {
    fn default() -> Self {
        Self {
            key: default_counter_key(),
            initial_count: 0,
            step: default_step(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            counter: CounterSettings::default(),
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading settings from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let settings: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(store = %settings.store_path.display(), "Settings loaded");
        Ok(settings)
    }

    /// Loads settings from `path`, or returns defaults if the file is absent.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.counter().key(), "count");
        assert_eq!(*settings.counter().step(), 1);
    }

    #[test]
    fn test_partial_counter_table() {
        let settings: Settings = toml::from_str(
            r#"
[counter]
key = "count2"
"#,
        )
        .unwrap();
        assert_eq!(settings.counter().key(), "count2");
        assert_eq!(*settings.counter().initial_count(), 0);
        assert_eq!(settings.store_path(), &PathBuf::from("squares_store.json"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let settings = Settings::load_or_default("no_such_squares.toml").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "counter = 3").unwrap();
        let err = Settings::from_file(&path).unwrap_err();
        assert!(err.message.starts_with("Failed to parse config"));
    }
}
