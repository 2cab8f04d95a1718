//! # sqlforge executor
//!
//! Session-scoped SQL execution over pluggable backends.
//!
//! This is the crate users import. It provides:
//! - [`ExecutorFactory`] - builds an [`Executor`] from a server type tag
//! - [`Executor`] - one connection, one optional transaction, hooks
//! - [`Command`]/[`Output`] - the low-level pipeline interface
//!
//! ## Quick Start
//!
//! ```text
//! use sqlforge_executor::{DbConfig, ExecutorFactory};
//!
//! let db = ExecutorFactory::new().create(&DbConfig::new("Sqlite", "Data Source=app.db;"))?;
//!
//! db.non_query("CREATE TABLE t (x INTEGER)", &[])?;
//! let count = db.scalar("SELECT COUNT(*) FROM t", &[])?;
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `executor` | The [`Executor`] and its typed surface |
//! | `pipeline` | Shared sync/async execution steps |
//! | `transaction` | Explicit `None`/`Active` transaction state |
//! | `connection` | Open-on-demand connection lifecycle |
//! | [`backend`] | [`Connection`]/[`Connector`] strategy traits, SQLite |
//! | `factory` | Server type tags and the connector registry |
//! | `config` | `sqlforge.toml` settings |

mod command;
mod config;
mod connection;
mod error;
mod executor;
mod factory;
mod output;
mod pipeline;
mod transaction;

pub mod backend;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API - Everything users need is re-exported here
// =============================================================================

pub use backend::{Connection, ConnectionState, Connector, SqliteConnection, SqliteConnector};
pub use command::{Command, SNAPSHOT_VALUE_LIMIT};
pub use config::{DbConfig, Settings, CONFIG_FILE_NAME};
pub use error::{codes, Error};
pub use executor::{AfterExecute, BeforeExecute, Executor};
pub use factory::{create, test_connection, ConnectorRegistry, ExecutorFactory, ServerType};
pub use output::{default_table_name, Operation, Output};
pub use transaction::Transaction;

// Re-export from lower crates
pub use sqlforge_core::{
    BackendError, BackendErrorKind, BackendResult, CompareOperator, DataSet, DataTable, DbType,
    IsolationLevel, Parameter, QueryShape, Value,
};
pub use sqlforge_dialect::{
    compile_where, fill_template, infer_parameters, param_declaration, rust_type, Dialect,
    DialectError, Sqlite, SqlServer,
};

/// Re-exported so callers can cancel async operations without a direct
/// `tokio-util` dependency.
pub use tokio_util::sync::CancellationToken;

/// Result type for executor operations.
pub type Result<T> = std::result::Result<T, Error>;
