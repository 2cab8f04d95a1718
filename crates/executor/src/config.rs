//! Connection configuration via `sqlforge.toml`
//!
//! Each named connection is a `[databases.<name>]` table carrying a server
//! type tag and a backend connection string.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Conventional settings file name.
pub const CONFIG_FILE_NAME: &str = "sqlforge.toml";

/// How to reach one database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    /// Server type tag: `"SqlServer"`, `"MsSql"` or `"Sqlite"` (any case)
    pub server_type: String,
    /// Backend-specific connection string
    pub connection_string: String,
}

impl DbConfig {
    pub fn new(server_type: impl Into<String>, connection_string: impl Into<String>) -> Self {
        Self {
            server_type: server_type.into(),
            connection_string: connection_string.into(),
        }
    }
}

/// Named database configurations loaded from `sqlforge.toml`.
///
/// # Example
///
/// ```toml
/// [databases.main]
/// server_type = "Sqlite"
/// connection_string = "Data Source=app.db;"
///
/// [databases.reporting]
/// server_type = "SqlServer"
/// connection_string = "Server=.;Database=Reports;Trusted_Connection=True;"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub databases: BTreeMap<String, DbConfig>,
}

impl Settings {
    /// Read and parse settings from a file path.
    ///
    /// # Errors
    ///
    /// `Error::Config` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            reason: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;
        toml::from_str(&content).map_err(|e| Error::Config {
            reason: format!("Failed to parse config file '{}': {}", path.display(), e),
        })
    }

    /// Configuration registered under `name`.
    ///
    /// # Errors
    ///
    /// `Error::Config` if no such connection is configured.
    pub fn get(&self, name: &str) -> Result<&DbConfig> {
        self.databases.get(name).ok_or_else(|| Error::Config {
            reason: format!("No database named '{}' in {}", name, CONFIG_FILE_NAME),
        })
    }

    pub fn insert(&mut self, name: impl Into<String>, config: DbConfig) {
        self.databases.insert(name.into(), config);
    }

    /// Serialize these settings to TOML and write them to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config {
            reason: format!("Failed to serialize settings: {}", e),
        })?;
        std::fs::write(path, content).map_err(|e| Error::Config {
            reason: format!("Failed to write config file '{}': {}", path.display(), e),
        })
    }
}

impl FromStr for Settings {
    type Err = Error;

    fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config {
            reason: format!("Failed to parse settings: {}", e),
        })
    }
}
