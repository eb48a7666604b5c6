//! Storage configuration.
//!
//! # Responsibility
//! - Describe which backend to open and where, in a serializable form.
//!
//! # Invariants
//! - A validated config always carries a safe single-component `name` and a
//!   non-empty `connection_url`.

use crate::logging::default_log_level;
use crate::store::backend::is_valid_store_name;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Backend selected by a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    FileCache,
    Sqlite,
}

/// Where and how todo data is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: BackendKind,
    /// File name (JSON document stem or SQLite database file).
    pub name: String,
    /// Directory holding the store, or `:memory:` for SQLite.
    pub connection_url: String,
    #[serde(default)]
    pub log_level: Option<String>,
    /// Absolute directory for rolling logs; logging stays off when unset.
    #[serde(default)]
    pub log_dir: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl StorageConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(value: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(value).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_store_name(self.name.trim()) {
            return Err(ConfigError::Invalid(format!(
                "name `{}` must be a plain file name",
                self.name
            )));
        }
        if self.connection_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "connection_url cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Configured log level, falling back to the build-mode default.
    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }
}

#[cfg(test)]
mod tests {
    use super::{BackendKind, ConfigError, StorageConfig};

    #[test]
    fn parses_snake_case_backend_and_defaults() {
        let config = StorageConfig::from_json_str(
            r#"{"backend":"file_cache","name":"Tasks","connection_url":"/tmp/tm"}"#,
        )
        .unwrap();
        assert_eq!(config.backend, BackendKind::FileCache);
        assert_eq!(config.log_level, None);
        assert!(!config.effective_log_level().is_empty());
    }

    #[test]
    fn rejects_path_like_names() {
        let err = StorageConfig::from_json_str(
            r#"{"backend":"sqlite","name":"../db","connection_url":"/tmp/tm"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_backend() {
        let err = StorageConfig::from_json_str(
            r#"{"backend":"postgres","name":"db","connection_url":"/tmp/tm"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
