//! Engine configuration
//!
//! Loaded from a JSON file; every field is optional and falls back to its
//! default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::SpillConfig;
use crate::query::QueryOptions;
use crate::timeline::DEFAULT_TIMELINE_SIZE;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for this schema
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        /// Config path
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// A value is out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "LOGQ_CONFIG_IO",
            ConfigError::Parse { .. } => "LOGQ_CONFIG_PARSE",
            ConfigError::Invalid(_) => "LOGQ_CONFIG_INVALID",
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory for overflow files (default: system temp dir)
    #[serde(default = "default_spill_dir")]
    pub spill_dir: PathBuf,

    /// Rows kept in memory before spilling (default: 10000)
    #[serde(default = "default_memory_row_threshold")]
    pub memory_row_threshold: usize,

    /// Estimated bytes kept in memory before spilling (default: 64 MiB)
    #[serde(default = "default_memory_byte_threshold")]
    pub memory_byte_threshold: usize,

    /// Timeline notification cadence in milliseconds (default: 2000)
    #[serde(default = "default_timeline_interval_ms")]
    pub timeline_interval_ms: u64,

    /// Buckets per timeline when the client does not say (default: 10)
    #[serde(default = "default_timeline_size")]
    pub default_timeline_size: usize,

    /// Resource prefix of push channels (default: "logstorage")
    #[serde(default = "default_channel_resource")]
    pub channel_resource: String,
}

fn default_spill_dir() -> PathBuf {
    std::env::temp_dir()
}

fn default_memory_row_threshold() -> usize {
    10_000
}

fn default_memory_byte_threshold() -> usize {
    64 * 1024 * 1024
}

fn default_timeline_interval_ms() -> u64 {
    2000
}

fn default_timeline_size() -> usize {
    DEFAULT_TIMELINE_SIZE
}

fn default_channel_resource() -> String {
    "logstorage".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            spill_dir: default_spill_dir(),
            memory_row_threshold: default_memory_row_threshold(),
            memory_byte_threshold: default_memory_byte_threshold(),
            timeline_interval_ms: default_timeline_interval_ms(),
            default_timeline_size: default_timeline_size(),
            channel_resource: default_channel_resource(),
        }
    }
}

impl EngineConfig {
    /// Loads and validates a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects zero thresholds, a zero interval and an empty resource.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory_row_threshold == 0 {
            return Err(ConfigError::Invalid(
                "memory_row_threshold must be at least 1".into(),
            ));
        }
        if self.memory_byte_threshold == 0 {
            return Err(ConfigError::Invalid(
                "memory_byte_threshold must be at least 1".into(),
            ));
        }
        if self.timeline_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "timeline_interval_ms must be at least 1".into(),
            ));
        }
        if self.default_timeline_size == 0 {
            return Err(ConfigError::Invalid(
                "default_timeline_size must be at least 1".into(),
            ));
        }
        if self.channel_resource.trim().is_empty() {
            return Err(ConfigError::Invalid("channel_resource is empty".into()));
        }
        Ok(())
    }

    /// Spill thresholds for result buffers.
    pub fn spill_config(&self) -> SpillConfig {
        SpillConfig {
            dir: self.spill_dir.clone(),
            memory_rows: self.memory_row_threshold,
            memory_bytes: self.memory_byte_threshold,
        }
    }

    /// Per-query execution settings.
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            spill: self.spill_config(),
            timeline_interval: Duration::from_millis(self.timeline_interval_ms),
        }
    }
}
