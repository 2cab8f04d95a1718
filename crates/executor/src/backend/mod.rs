//! Backend strategy interfaces.
//!
//! The execution pipeline only ever talks to a [`Connection`]; how a
//! connection is created for a server type is a [`Connector`]'s business.
//! Implementations use interior mutability so that a connection can be
//! shared with the blocking worker that runs multi-table fills.
//!
//! Async calls receive the caller's [`CancellationToken`]. On cancellation
//! the pipeline also calls [`Connection::interrupt`] and then waits for the
//! call to return, so a backend must not keep working after either signal.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlforge_core::{BackendResult, DataTable, IsolationLevel, Value};
use sqlforge_dialect::Dialect;
use tokio_util::sync::CancellationToken;

use crate::Command;

pub mod sqlite;

pub use sqlite::{SqliteConnection, SqliteConnector};

/// Physical connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Closed,
    Open,
}

/// A physical connection to a relational backend.
///
/// The executor guarantees `open` is called before any other operation and
/// that `begin`/`commit`/`rollback` are balanced.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Current state. May flip to `Closed` on its own (network drop).
    fn state(&self) -> ConnectionState;

    /// Open the connection. Called only when `state()` is `Closed`.
    fn open(&self) -> BackendResult<()>;

    /// Close the connection.
    fn close(&self) -> BackendResult<()>;

    /// Start a transaction on this connection.
    fn begin(&self, isolation: Option<IsolationLevel>) -> BackendResult<()>;

    fn commit(&self) -> BackendResult<()>;

    fn rollback(&self) -> BackendResult<()>;

    /// First column of the first row of the first result set, or NULL.
    fn scalar(&self, command: &Command) -> BackendResult<Value>;

    /// Number of rows affected.
    fn non_query(&self, command: &Command) -> BackendResult<u64>;

    /// First result set.
    fn reader(&self, command: &Command) -> BackendResult<DataTable>;

    /// Every result set, in order. Inherently blocking.
    fn fill(&self, command: &Command) -> BackendResult<Vec<DataTable>>;

    /// [`fill`](Self::fill) that stops early once `cancel` fires. Runs on
    /// the blocking pool.
    fn fill_cancellable(
        &self,
        command: &Command,
        _cancel: &CancellationToken,
    ) -> BackendResult<Vec<DataTable>> {
        self.fill(command)
    }

    /// Abort whatever statement is running. Callable from any thread.
    fn interrupt(&self) {}

    async fn scalar_async(
        &self,
        command: &Command,
        _cancel: &CancellationToken,
    ) -> BackendResult<Value> {
        self.scalar(command)
    }

    async fn non_query_async(
        &self,
        command: &Command,
        _cancel: &CancellationToken,
    ) -> BackendResult<u64> {
        self.non_query(command)
    }

    async fn reader_async(
        &self,
        command: &Command,
        _cancel: &CancellationToken,
    ) -> BackendResult<DataTable> {
        self.reader(command)
    }
}

/// Creates connections for one server type.
pub trait Connector: Send + Sync {
    /// Build an unopened connection from a connection string.
    fn connect(&self, connection_string: &str) -> BackendResult<Box<dyn Connection>>;

    /// Dialect spoken by the connections this connector creates.
    fn dialect(&self) -> &'static dyn Dialect;
}
