//! Configuration for the logging stack

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::format::DEFAULT_TIMESTAMP_FORMAT;
use crate::sink::{RotationPolicy, DEFAULT_KEEP_DAYS, DEFAULT_MAX_SIZE_BYTES};

/// Logging configuration
///
/// Every field has a default, so an empty or partial TOML file is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Channel name stamped into every line
    #[serde(default = "default_channel")]
    pub channel: String,

    /// Directory holding the active files and their archives
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Rotation threshold in bytes (default: 5 MiB)
    #[serde(default = "default_max_size_bytes")]
    pub max_size_bytes: u64,

    /// Archive retention in days (default: 30)
    #[serde(default = "default_keep_days")]
    pub keep_days: u64,

    /// chrono pattern for line timestamps (default: seconds-precision local datetime)
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

fn default_channel() -> String {
    "app".to_string()
}

fn default_log_dir() -> PathBuf {
    env::temp_dir().join("logs")
}

fn default_max_size_bytes() -> u64 {
    DEFAULT_MAX_SIZE_BYTES
}

fn default_keep_days() -> u64 {
    DEFAULT_KEEP_DAYS
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            log_dir: default_log_dir(),
            max_size_bytes: default_max_size_bytes(),
            keep_days: default_keep_days(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

impl LogConfig {
    /// Load configuration from a TOML file, or return defaults if absent
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).context("Failed to read log config file")?;
            toml::from_str(&content).context("Failed to parse log config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize log config")?;
        std::fs::write(path, content).context("Failed to write log config file")?;
        Ok(())
    }

    /// Ensure the log directory exists
    ///
    /// Hosts call this once at startup, before the first write.
    pub fn ensure_log_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.log_dir).context("Failed to create log directory")?;
        Ok(())
    }

    /// Rotation limits derived from this configuration
    pub fn policy(&self) -> RotationPolicy {
        RotationPolicy {
            max_size_bytes: self.max_size_bytes,
            keep_days: self.keep_days,
        }
    }
}
