//! The Executor - a session-scoped SQL execution context.
//!
//! An executor owns one connection, at most one active transaction, and an
//! optional pair of execution hooks. Callers serialize operations per
//! instance; executors never share a connection or a transaction.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use sqlforge_core::{DataSet, DataTable, IsolationLevel, Parameter, QueryShape, Value};
use sqlforge_dialect::Dialect;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::backend::{Connection, ConnectionState};
use crate::connection::ConnectionManager;
use crate::error::codes;
use crate::factory::ServerType;
use crate::output::Operation;
use crate::transaction::{Transaction, TransactionCoordinator};
use crate::{Command, Result};

/// Called with the prepared command before it reaches the backend.
pub type BeforeExecute = Arc<dyn Fn(&Command) + Send + Sync>;

/// Called with the command and the backend call's duration after it succeeds.
pub type AfterExecute = Arc<dyn Fn(&Command, Duration) + Send + Sync>;

#[derive(Clone, Default)]
pub(crate) struct Hooks {
    pub(crate) before: Option<BeforeExecute>,
    pub(crate) after: Option<AfterExecute>,
}

/// A SQL execution context bound to one backend connection.
///
/// # Example
///
/// ```ignore
/// use sqlforge::{DbConfig, ExecutorFactory, Parameter, DbType};
///
/// let factory = ExecutorFactory::new();
/// let mut db = factory.create(&DbConfig::new("Sqlite", ":memory:"))?;
///
/// db.non_query("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)", &[])?;
///
/// db.begin(None)?;
/// db.non_query(
///     "INSERT INTO users (name) VALUES (@Name)",
///     &[Parameter::new("Name", DbType::NVarChar, "ada")],
/// )?;
/// db.commit()?;
///
/// let users = db.table("SELECT * FROM users", &[])?;
/// ```
pub struct Executor {
    pub(crate) server_type: ServerType,
    pub(crate) dialect: &'static dyn Dialect,
    pub(crate) connection: ConnectionManager,
    pub(crate) transaction: TransactionCoordinator,
    pub(crate) hooks: Hooks,
    disposed: bool,
}

impl Executor {
    /// Wrap `connection` and open it.
    ///
    /// # Errors
    ///
    /// [`Error::Connection`](crate::Error::Connection) when the backend
    /// cannot open the connection.
    pub fn new(
        server_type: ServerType,
        dialect: &'static dyn Dialect,
        connection: Box<dyn Connection>,
    ) -> Result<Self> {
        Ok(Self {
            server_type,
            dialect,
            connection: ConnectionManager::open(connection)?,
            transaction: TransactionCoordinator::default(),
            hooks: Hooks::default(),
            disposed: false,
        })
    }

    pub fn server_type(&self) -> ServerType {
        self.server_type
    }

    pub fn dialect(&self) -> &'static dyn Dialect {
        self.dialect
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Template for `shape` in this executor's dialect.
    pub fn compile(&self, shape: QueryShape, is_sub_query: bool) -> Result<&'static str> {
        Ok(self.dialect.compile(shape, is_sub_query)?)
    }

    // =========================================================================
    // Hooks
    // =========================================================================

    pub fn set_before_execute<F>(&mut self, hook: F)
    where
        F: Fn(&Command) + Send + Sync + 'static,
    {
        self.hooks.before = Some(Arc::new(hook));
    }

    pub fn set_after_execute<F>(&mut self, hook: F)
    where
        F: Fn(&Command, Duration) + Send + Sync + 'static,
    {
        self.hooks.after = Some(Arc::new(hook));
    }

    pub fn clear_hooks(&mut self) {
        self.hooks = Hooks::default();
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Start a transaction. Every command issued until `commit`/`rollback`
    /// runs inside it.
    ///
    /// # Errors
    ///
    /// - `TransactionAlreadyStarted` if a transaction is active
    /// - `Connection` if the connection cannot be reopened
    /// - `Transaction` if the backend refuses to begin
    pub fn begin(&mut self, isolation: Option<IsolationLevel>) -> Result<()> {
        self.transaction.begin(&self.connection, isolation)
    }

    /// Commit the active transaction; no-op without one.
    pub fn commit(&mut self) -> Result<()> {
        self.transaction.commit(&self.connection)
    }

    /// Roll back the active transaction; no-op without one.
    pub fn rollback(&mut self) -> Result<()> {
        self.transaction.rollback(&self.connection)
    }

    pub fn is_active(&self) -> bool {
        self.transaction.is_active()
    }

    /// Snapshot of the active transaction.
    pub fn transaction(&self) -> Option<Transaction> {
        self.transaction.active()
    }

    // =========================================================================
    // Execution surface
    // =========================================================================

    /// First column of the first row, or NULL for an empty result.
    pub fn scalar(&self, sql: &str, params: &[Parameter]) -> Result<Value> {
        self.execute(sql, params, codes::SCALAR, Operation::Scalar)?
            .into_scalar()
    }

    /// Affected row count.
    pub fn non_query(&self, sql: &str, params: &[Parameter]) -> Result<u64> {
        self.execute(sql, params, codes::NON_QUERY, Operation::NonQuery)?
            .into_rows_affected()
    }

    /// First result set, named `T0`.
    pub fn table(&self, sql: &str, params: &[Parameter]) -> Result<DataTable> {
        self.execute(sql, params, codes::TABLE, Operation::Table)?
            .into_table()
    }

    /// Every result set. Tables take `names` in order, then `T{i}`.
    pub fn table_set(&self, sql: &str, params: &[Parameter], names: &[&str]) -> Result<DataSet> {
        self.execute(sql, params, codes::TABLE_SET, table_set_operation(names))?
            .into_table_set()
    }

    pub async fn scalar_async(
        &self,
        sql: &str,
        params: &[Parameter],
        cancel: &CancellationToken,
    ) -> Result<Value> {
        self.execute_async(sql, params, codes::SCALAR, Operation::Scalar, cancel)
            .await?
            .into_scalar()
    }

    pub async fn non_query_async(
        &self,
        sql: &str,
        params: &[Parameter],
        cancel: &CancellationToken,
    ) -> Result<u64> {
        self.execute_async(sql, params, codes::NON_QUERY, Operation::NonQuery, cancel)
            .await?
            .into_rows_affected()
    }

    pub async fn table_async(
        &self,
        sql: &str,
        params: &[Parameter],
        cancel: &CancellationToken,
    ) -> Result<DataTable> {
        self.execute_async(sql, params, codes::TABLE, Operation::Table, cancel)
            .await?
            .into_table()
    }

    /// Runs the fill on the blocking pool.
    pub async fn table_set_async(
        &self,
        sql: &str,
        params: &[Parameter],
        names: &[&str],
        cancel: &CancellationToken,
    ) -> Result<DataSet> {
        self.execute_async(
            sql,
            params,
            codes::TABLE_SET,
            table_set_operation(names),
            cancel,
        )
        .await?
        .into_table_set()
    }

    // =========================================================================
    // Disposal
    // =========================================================================

    /// Roll back any pending transaction and close the connection.
    ///
    /// Cleanup failures are logged and swallowed. Dropping an executor has
    /// the same effect.
    pub fn close(mut self) {
        self.dispose();
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        if let Err(e) = self.transaction.rollback(&self.connection) {
            warn!(target: "sqlforge::txn", error = %e, "Rollback at disposal failed");
        }
        if let Err(e) = self.connection.close() {
            warn!(target: "sqlforge::conn", error = %e, "Close at disposal failed");
        }
    }
}

impl Drop for Executor {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("server_type", &self.server_type)
            .field("dialect", &self.dialect.name())
            .field("connection", &self.connection.state())
            .field("transaction", &self.transaction.active_id())
            .finish()
    }
}

fn table_set_operation(names: &[&str]) -> Operation {
    Operation::TableSet {
        names: names.iter().map(|n| n.to_string()).collect(),
    }
}
