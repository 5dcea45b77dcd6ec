//! Service configuration.
//!
//! Settings name the backing table and the reserved columns the expansion
//! layer keys on. Every field has a static default, so an absent or partial
//! config file still yields a working configuration:
//!
//! ```toml
//! table = "events"
//! timestamp_column = "timestamp"
//! time_group_column = "time"
//! hash_column = "primary_hash"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Table the rendered statements read from.
    pub table: String,

    /// Physical timestamp column used for time bucketing and the date
    /// window condition.
    pub timestamp_column: String,

    /// Reserved column name that expands into a time-truncation expression.
    pub time_group_column: String,

    /// Column holding fingerprint hashes for issue expansion.
    pub hash_column: String,

    /// Column holding the project id, used for the mandatory project filter.
    pub project_column: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            table: "events".into(),
            timestamp_column: "timestamp".into(),
            time_group_column: "time".into(),
            hash_column: "primary_hash".into(),
            project_column: "project_id".into(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}
