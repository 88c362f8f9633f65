//! Driver settings
//!
//! ```text
//! ~/.storemetrics/
//!   config.yaml        # base_url, optional ranges file
//!   documents.db       # cached documents
//!   storemetrics.log
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use storemetrics_core::RangeSet;

pub const CONFIG_FILE: &str = "config.yaml";
pub const DATABASE_FILE: &str = "documents.db";

const DEFAULT_BASE_URL: &str = "https://metrics.local";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to serialize settings: {0}")]
    Serialize(String),
}

/// Contents of `config.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Prefix of every cache key
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Range overrides; relative paths resolve against the data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranges: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ranges: None,
        }
    }
}

impl Settings {
    /// Load `config.yaml` from `data_dir`, or the defaults when it is absent.
    pub fn load(data_dir: &Path) -> Result<Self, SettingsError> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        read_yaml(&path)
    }

    pub fn save(&self, data_dir: &Path) -> Result<(), SettingsError> {
        let yaml =
            serde_saphyr::to_string(self).map_err(|e| SettingsError::Serialize(e.to_string()))?;
        let path = data_dir.join(CONFIG_FILE);
        fs::write(&path, yaml).map_err(|source| SettingsError::Io { path, source })
    }

    /// The range tables to generate with: the configured overrides layered
    /// over the built-in defaults.
    pub fn load_ranges(&self, data_dir: &Path) -> Result<RangeSet, SettingsError> {
        match &self.ranges {
            None => Ok(RangeSet::default()),
            Some(path) => read_yaml(&data_dir.join(path)),
        }
    }
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SettingsError> {
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_saphyr::from_str(&content).map_err(|e| SettingsError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
