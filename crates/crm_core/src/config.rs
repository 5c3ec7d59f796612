//! Runtime configuration for CRM core hosts.
//!
//! # Responsibility
//! - Describe logging, storage backend and seed data location.
//! - Load settings from a JSON file, falling back to defaults.
//!
//! # Invariants
//! - Every field is optional in the file; absent fields take defaults.
//! - `CRM_CONFIG_PATH` pointing at a missing file yields defaults.

use crate::logging::{default_log_level, init_logging, LoggingError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "CRM_CONFIG_PATH";

/// Config loading error.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config file `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Where records are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Mock mode: in-process collections, optionally slowed down.
    Memory {
        #[serde(default)]
        simulated_latency_ms: u64,
    },
    Sqlite { path: PathBuf },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Memory {
            simulated_latency_ms: 0,
        }
    }
}

impl StorageConfig {
    /// Artificial delay for memory storage; `None` when disabled.
    pub fn simulated_latency(&self) -> Option<Duration> {
        match self {
            Self::Memory {
                simulated_latency_ms,
            } if *simulated_latency_ms > 0 => Some(Duration::from_millis(*simulated_latency_ms)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Defaults to `default_log_level()` when unset.
    pub log_level: Option<String>,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub storage: StorageConfig,
    /// Directory holding `<collection>.json` seed files.
    pub seed_dir: Option<PathBuf>,
}

impl CoreConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses one config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(json.as_str())
    }

    /// Loads the file named by `CRM_CONFIG_PATH`, or defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                if path.is_file() {
                    Self::load(&path)
                } else {
                    Ok(Self::default())
                }
            }
            None => Ok(Self::default()),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    /// Starts file logging when `log_dir` is configured.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        match &self.log_dir {
            Some(dir) => init_logging(self.log_level(), dir).map(|()| true),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, StorageConfig};
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn empty_document_uses_defaults() {
        let config = CoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert!(config.storage.simulated_latency().is_none());
        assert!(!config.init_logging().unwrap());
    }

    #[test]
    fn parses_sqlite_storage_and_seed_dir() {
        let config = CoreConfig::from_json_str(
            r#"{"log_level": "warn", "storage": {"kind": "sqlite", "path": "/tmp/crm.db"},
                "seed_dir": "/srv/seed"}"#,
        )
        .unwrap();
        assert_eq!(config.log_level(), "warn");
        assert_eq!(
            config.storage,
            StorageConfig::Sqlite {
                path: PathBuf::from("/tmp/crm.db")
            }
        );
        assert_eq!(config.seed_dir, Some(PathBuf::from("/srv/seed")));
    }

    #[test]
    fn memory_latency_is_exposed_as_duration() {
        let config = CoreConfig::from_json_str(
            r#"{"storage": {"kind": "memory", "simulated_latency_ms": 250}}"#,
        )
        .unwrap();
        assert_eq!(
            config.storage.simulated_latency(),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CoreConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = CoreConfig::from_json_str("{\"storage\": 3}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
