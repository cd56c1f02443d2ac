//! Configuration file handling for database connections.
//!
//! This module loads `.sistation.json` configuration files. The file holds a
//! map of named connection strings; the executor reads the `ConnectionString`
//! entry, whose value is a database path relative to the working directory.
//!
//! ```json
//! {
//!   "connection_strings": {
//!     "ConnectionString": "data/sistation.db"
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::DEFAULT_CONNECTION_NAME;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".sistation.json";

/// Environment variable overriding the `ConnectionString` entry.
pub const CONNECTION_STRING_ENV: &str = "SISTATION_CONNECTION_STRING";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Named connection strings
    #[serde(default)]
    pub connection_strings: BTreeMap<String, String>,
}

impl ConfigFile {
    /// Load configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file doesn't exist
    /// - The file cannot be read
    /// - The JSON is invalid
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        if !path.exists() {
            return Err(ConfigError::NotFound { path: display });
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: display.clone(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: display,
            source: e,
        })
    }

    /// Resolve configuration from a file and the environment.
    ///
    /// Priority: environment > config file. A missing file is not an error
    /// here; a missing connection string is reported when the executor first
    /// needs it.
    pub fn resolve(path: &Path) -> Result<Self, ConfigError> {
        let mut config = match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::NotFound { .. }) => Self::default(),
            Err(e) => return Err(e),
        };

        if let Ok(value) = std::env::var(CONNECTION_STRING_ENV) {
            config
                .connection_strings
                .insert(DEFAULT_CONNECTION_NAME.to_string(), value);
        }

        Ok(config)
    }

    pub fn with_connection_string(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.connection_strings.insert(name.into(), value.into());
        self
    }

    pub fn connection_string(&self, name: &str) -> Option<&str> {
        self.connection_strings.get(name).map(String::as_str)
    }

    /// Default configuration path under `dir`.
    pub fn default_path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE_NAME)
    }
}
