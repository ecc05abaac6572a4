use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FactStoreError, Result};

/// Main configuration structure for factstore
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Backing store configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Search defaults
    #[serde(default)]
    pub search: SearchConfig,
    /// Per-session lock registry configuration
    #[serde(default)]
    pub sessions: SessionsConfig,
    /// Fact extraction configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

impl Config {
    /// Load configuration from `path`, or from the first default location
    /// that exists, falling back to built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            tracing::info!("Loading config from: {}", path.display());
            return Self::from_file(path);
        }

        for candidate in default_config_paths() {
            if candidate.exists() {
                tracing::info!("Loading config from: {}", candidate.display());
                return Self::from_file(&candidate);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FactStoreError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        toml::from_str(&content)
            .map_err(|e| FactStoreError::Config(format!("Failed to parse config: {e}")))
    }
}

/// Config file locations searched when none is given explicitly, in order
pub fn default_config_paths() -> Vec<PathBuf> {
    [
        dirs::home_dir().map(|h| h.join(".factstore").join("config.toml")),
        dirs::config_dir().map(|c| c.join("factstore").join("config.toml")),
        Some(PathBuf::from("config.toml")),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Which [`crate::storage::SessionStore`] implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local, lost on exit
    Memory,
    /// One JSON document per session under `data_dir`
    #[default]
    File,
}

/// Backing store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory holding session documents for the file backend
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".factstore"))
        .unwrap_or_else(|| PathBuf::from(".factstore"))
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Results returned when a caller gives no explicit limit
    #[serde(default = "default_search_limit")]
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_search_limit(),
        }
    }
}

fn default_search_limit() -> usize {
    crate::memory::DEFAULT_SEARCH_LIMIT
}

/// Session lock registry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionsConfig {
    /// Idle per-session locks kept before LRU eviction
    #[serde(default = "default_max_cached_locks")]
    pub max_cached_locks: usize,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            max_cached_locks: default_max_cached_locks(),
        }
    }
}

fn default_max_cached_locks() -> usize {
    crate::store::DEFAULT_LOCK_CAPACITY
}

/// Fact extraction configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionConfig {
    /// Label the verbatim extractor stores utterances under
    #[serde(default = "default_extraction_label")]
    pub label: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            label: default_extraction_label(),
        }
    }
}

fn default_extraction_label() -> String {
    crate::memory::labels::CONVERSATION.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.search.default_limit, 5);
        assert_eq!(config.sessions.max_cached_locks, 1024);
        assert_eq!(config.extraction.label, "conversation");
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
[storage]
backend = "memory"
data_dir = "/tmp/factstore"

[search]
default_limit = 10

[sessions]
max_cached_locks = 64

[extraction]
label = "utterance"
"#;

        let config: Config = toml::from_str(toml_str).expect("Failed to parse TOML");

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/factstore"));
        assert_eq!(config.search.default_limit, 10);
        assert_eq!(config.sessions.max_cached_locks, 64);
        assert_eq!(config.extraction.label, "utterance");
    }

    #[test]
    fn test_toml_partial_deserialization() {
        let toml_str = r#"
[search]
default_limit = 3
"#;

        let config: Config = toml::from_str(toml_str).expect("Failed to parse partial TOML");

        assert_eq!(config.search.default_limit, 3);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.sessions.max_cached_locks, 1024);
        assert_eq!(config.extraction.label, "conversation");
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let toml_str = r#"
[storage]
backend = "postgres"
"#;
        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    fn test_from_file_missing_is_config_error() {
        let result = Config::from_file(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(FactStoreError::Config(_))));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\ndefault_limit = 7\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.search.default_limit, 7);
    }

    #[test]
    fn test_serializes_back_to_toml() {
        let config = Config::default();
        let text = toml::to_string(&config).expect("Failed to serialize config");
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.search.default_limit, config.search.default_limit);
        assert_eq!(back.storage.data_dir, config.storage.data_dir);
    }
}
