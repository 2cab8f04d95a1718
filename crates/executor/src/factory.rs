//! Executor construction keyed on a server type tag.
//!
//! The factory looks the tag up in a [`ConnectorRegistry`], asks the
//! connector for an unopened connection, and wraps it in an [`Executor`]
//! speaking the connector's dialect. Unsupported tags fail fast with
//! [`Error::DbServerTypeNotImplementedYet`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::backend::{ConnectionState, Connector, SqliteConnector};
use crate::config::{DbConfig, Settings};
use crate::{Error, Executor, Result};

/// Supported server type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServerType {
    /// Microsoft SQL Server (`"SqlServer"` or `"MsSql"`)
    SqlServer,
    /// SQLite (`"Sqlite"`)
    Sqlite,
}

impl ServerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerType::SqlServer => "SqlServer",
            ServerType::Sqlite => "Sqlite",
        }
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlserver" | "mssql" => Ok(ServerType::SqlServer),
            "sqlite" => Ok(ServerType::Sqlite),
            _ => Err(Error::DbServerTypeNotImplementedYet {
                server_type: s.to_string(),
            }),
        }
    }
}

/// Server type → connector map.
///
/// The default registry knows SQLite only. Other backends are plugged in
/// with [`register`](Self::register).
#[derive(Clone)]
pub struct ConnectorRegistry {
    connectors: HashMap<ServerType, Arc<dyn Connector>>,
}

impl ConnectorRegistry {
    /// A registry with no connectors.
    pub fn empty() -> Self {
        Self {
            connectors: HashMap::new(),
        }
    }

    /// Register (or replace) the connector for `server_type`.
    pub fn register(&mut self, server_type: ServerType, connector: impl Connector + 'static) {
        self.connectors.insert(server_type, Arc::new(connector));
    }

    pub fn contains(&self, server_type: ServerType) -> bool {
        self.connectors.contains_key(&server_type)
    }

    /// # Errors
    ///
    /// `DbServerTypeNotImplementedYet` if nothing is registered for the type.
    pub fn get(&self, server_type: ServerType) -> Result<&Arc<dyn Connector>> {
        self.connectors
            .get(&server_type)
            .ok_or_else(|| Error::DbServerTypeNotImplementedYet {
                server_type: server_type.to_string(),
            })
    }
}

impl Default for ConnectorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(ServerType::Sqlite, SqliteConnector);
        registry
    }
}

impl fmt::Debug for ConnectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.connectors.keys().map(ServerType::as_str).collect();
        types.sort_unstable();
        f.debug_struct("ConnectorRegistry")
            .field("server_types", &types)
            .finish()
    }
}

/// Builds executors from configuration.
#[derive(Debug, Clone, Default)]
pub struct ExecutorFactory {
    registry: ConnectorRegistry,
}

impl ExecutorFactory {
    /// Factory over the default registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: ConnectorRegistry) -> Self {
        Self { registry }
    }

    pub fn register(&mut self, server_type: ServerType, connector: impl Connector + 'static) {
        self.registry.register(server_type, connector);
    }

    pub fn registry(&self) -> &ConnectorRegistry {
        &self.registry
    }

    /// Build and open an executor for `config`.
    ///
    /// # Errors
    ///
    /// - `DbServerTypeNotImplementedYet` for an unknown or unregistered tag
    /// - `Connection` if the connector rejects the connection string or the
    ///   connection cannot be opened
    pub fn create(&self, config: &DbConfig) -> Result<Executor> {
        let server_type: ServerType = config.server_type.parse()?;
        let connector = self.registry.get(server_type)?;

        let connection = connector
            .connect(&config.connection_string)
            .map_err(Error::Connection)?;
        let executor = Executor::new(server_type, connector.dialect(), connection)?;

        info!(
            target: "sqlforge::factory",
            server_type = %server_type,
            dialect = executor.dialect().name(),
            "Executor created"
        );
        Ok(executor)
    }

    /// Build an executor for the connection named `name` in `settings`.
    pub fn create_named(&self, settings: &Settings, name: &str) -> Result<Executor> {
        self.create(settings.get(name)?)
    }

    /// Whether an executor built from `config` reaches the open state.
    ///
    /// The probe executor is closed before returning.
    pub fn test_connection(&self, config: &DbConfig) -> bool {
        match self.create(config) {
            Ok(executor) => {
                let open = executor.connection_state() == ConnectionState::Open;
                executor.close();
                open
            }
            Err(e) => {
                warn!(target: "sqlforge::factory", server_type = %config.server_type, error = %e, "Connection test failed");
                false
            }
        }
    }
}

/// Build an executor with the default registry.
pub fn create(config: &DbConfig) -> Result<Executor> {
    ExecutorFactory::new().create(config)
}

/// Probe `config` with the default registry.
pub fn test_connection(config: &DbConfig) -> bool {
    ExecutorFactory::new().test_connection(config)
}
