//! Monitor configuration, loaded from an optional JSON file.
//!
//! Every field has a default, so `{}` and a partial file are both valid:
//!
//! ```json
//! { "log_level": "debug", "limits": { "watchpoints": 8 } }
//! ```

use crate::sim::MEMORY_BASE;
use sdb_types::{Limits, Word};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Physical memory size of the simulated machine.
pub const DEFAULT_MEMORY_SIZE: usize = 0x1_0000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub limits: Limits,
    /// Default tracing filter, overridden by `RUST_LOG`.
    pub log_level: String,
    pub memory_base: Word,
    pub memory_size: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            log_level: "warn".to_string(),
            memory_base: MEMORY_BASE,
            memory_size: DEFAULT_MEMORY_SIZE,
        }
    }
}

impl MonitorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load `path` if given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
