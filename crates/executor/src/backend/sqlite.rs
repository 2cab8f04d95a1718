//! SQLite backend built on `rusqlite`.
//!
//! Every operation walks the command text statement by statement with
//! [`rusqlite::Batch`], so multi-statement templates (key capture, cascades)
//! run through `scalar`, `non_query`, `reader` and `fill` alike. Named
//! placeholders (`@p`, `:p`, `$p`) bind by case-insensitive name; anything
//! left unbound is NULL, except the reserved `MasterId`, which binds the key
//! captured by the `Create` template.
//!
//! Async calls run the same walk on the blocking pool. The walk stops
//! between statements once the caller's token fires, and [`interrupt`]
//! aborts the statement in progress.
//!
//! [`interrupt`]: Connection::interrupt

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{ffi, Batch, InterruptHandle, OptionalExtension, Statement};
use sqlforge_core::{
    strip_prefix, BackendError, BackendErrorKind, BackendResult, DataTable, IsolationLevel,
    Parameter, Value,
};
use sqlforge_dialect::{Dialect, Sqlite};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{Connection, ConnectionState, Connector};
use crate::Command;

/// Path used when a connection string names no data source.
pub const MEMORY_DATA_SOURCE: &str = ":memory:";

/// Keys accepted for the database path in `key=value;` connection strings.
const DATA_SOURCE_KEYS: [&str; 3] = ["data source", "datasource", "filename"];

/// Reserved parameter bound to the key captured by the `Create` template.
const MASTER_ID: &str = "MasterId";

/// Extract the database path from a connection string.
///
/// Accepts `Data Source=path;...`, a bare path, or `:memory:`.
pub fn parse_data_source(connection_string: &str) -> String {
    let trimmed = connection_string.trim();
    if !trimmed.contains('=') {
        return if trimmed.is_empty() {
            MEMORY_DATA_SOURCE.to_string()
        } else {
            trimmed.to_string()
        };
    }

    trimmed
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| {
            let key = key.trim().to_ascii_lowercase();
            DATA_SOURCE_KEYS.contains(&key.as_str())
        })
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| MEMORY_DATA_SOURCE.to_string())
}

/// Connector for [`SqliteConnection`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteConnector;

impl Connector for SqliteConnector {
    fn connect(&self, connection_string: &str) -> BackendResult<Box<dyn Connection>> {
        Ok(Box::new(SqliteConnection::new(parse_data_source(
            connection_string,
        ))))
    }

    fn dialect(&self) -> &'static dyn Dialect {
        &Sqlite
    }
}

/// A single SQLite database handle.
pub struct SqliteConnection {
    shared: Arc<Shared>,
}

/// State shared with blocking workers.
struct Shared {
    path: String,
    inner: Mutex<Option<rusqlite::Connection>>,
    /// Mirrors `inner.is_some()` so `state()` never waits behind a batch.
    open: AtomicBool,
    interrupt: Mutex<Option<InterruptHandle>>,
}

/// Everything a statement walk produced.
#[derive(Default)]
struct BatchOutcome {
    tables: Vec<DataTable>,
    changes: u64,
}

impl BatchOutcome {
    fn first_value(self) -> Value {
        self.tables
            .into_iter()
            .next()
            .and_then(|t| t.rows.into_iter().next())
            .and_then(|row| row.into_iter().next())
            .unwrap_or(Value::Null)
    }

    fn first_table(self) -> DataTable {
        self.tables.into_iter().next().unwrap_or_default()
    }
}

impl SqliteConnection {
    /// Create an unopened connection to `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            shared: Arc::new(Shared {
                path: path.into(),
                inner: Mutex::new(None),
                open: AtomicBool::new(false),
                interrupt: Mutex::new(None),
            }),
        }
    }

    /// Database path.
    pub fn path(&self) -> &str {
        &self.shared.path
    }

    /// Run `command` on the blocking pool.
    async fn offload(
        &self,
        command: &Command,
        cancel: &CancellationToken,
    ) -> BackendResult<BatchOutcome> {
        let shared = Arc::clone(&self.shared);
        let command = command.clone();
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || shared.run(&command, Some(&cancel)))
            .await
            .map_err(|e| BackendError::execute(format!("SQLite worker failed: {}", e)))?
    }
}

impl Shared {
    fn with_conn<T>(
        &self,
        kind: BackendErrorKind,
        f: impl FnOnce(&rusqlite::Connection) -> rusqlite::Result<T>,
    ) -> BackendResult<T> {
        let guard = self.inner.lock();
        let conn = guard.as_ref().ok_or_else(BackendError::closed)?;
        f(conn).map_err(|e| BackendError::new(kind, e.to_string()))
    }

    fn run(
        &self,
        command: &Command,
        cancel: Option<&CancellationToken>,
    ) -> BackendResult<BatchOutcome> {
        let result = self.with_conn(BackendErrorKind::Execute, |conn| {
            run_batch(conn, command, cancel)
        });
        match result {
            Err(e) if e.kind == BackendErrorKind::Execute && is_cancelled(cancel) => {
                Err(BackendError::cancelled())
            }
            other => other,
        }
    }
}

#[async_trait]
impl Connection for SqliteConnection {
    fn state(&self) -> ConnectionState {
        if self.shared.open.load(Ordering::Acquire) {
            ConnectionState::Open
        } else {
            ConnectionState::Closed
        }
    }

    fn open(&self) -> BackendResult<()> {
        let shared = &self.shared;
        let mut guard = shared.inner.lock();
        if guard.is_none() {
            let conn = rusqlite::Connection::open(&shared.path)
                .map_err(|e| BackendError::open(format!("{}: {}", shared.path, e)))?;
            *shared.interrupt.lock() = Some(conn.get_interrupt_handle());
            *guard = Some(conn);
            shared.open.store(true, Ordering::Release);
            debug!(target: "sqlforge::conn", path = %shared.path, "SQLite connection opened");
        }
        Ok(())
    }

    fn close(&self) -> BackendResult<()> {
        let shared = &self.shared;
        let mut guard = shared.inner.lock();
        if let Some(conn) = guard.take() {
            shared.open.store(false, Ordering::Release);
            shared.interrupt.lock().take();
            conn.close()
                .map_err(|(_, e)| BackendError::new(BackendErrorKind::Closed, e.to_string()))?;
            debug!(target: "sqlforge::conn", path = %shared.path, "SQLite connection closed");
        }
        Ok(())
    }

    fn begin(&self, isolation: Option<IsolationLevel>) -> BackendResult<()> {
        let sql = match isolation {
            Some(IsolationLevel::RepeatableRead)
            | Some(IsolationLevel::Serializable)
            | Some(IsolationLevel::Snapshot) => "BEGIN IMMEDIATE",
            _ => "BEGIN DEFERRED",
        };
        self.shared
            .with_conn(BackendErrorKind::Transaction, |conn| conn.execute_batch(sql))
    }

    fn commit(&self) -> BackendResult<()> {
        self.shared.with_conn(BackendErrorKind::Transaction, |conn| {
            conn.execute_batch("COMMIT")
        })
    }

    fn rollback(&self) -> BackendResult<()> {
        self.shared.with_conn(BackendErrorKind::Transaction, |conn| {
            conn.execute_batch("ROLLBACK")
        })
    }

    fn interrupt(&self) {
        if let Some(handle) = self.shared.interrupt.lock().as_ref() {
            handle.interrupt();
        }
    }

    fn scalar(&self, command: &Command) -> BackendResult<Value> {
        Ok(self.shared.run(command, None)?.first_value())
    }

    fn non_query(&self, command: &Command) -> BackendResult<u64> {
        Ok(self.shared.run(command, None)?.changes)
    }

    fn reader(&self, command: &Command) -> BackendResult<DataTable> {
        Ok(self.shared.run(command, None)?.first_table())
    }

    fn fill(&self, command: &Command) -> BackendResult<Vec<DataTable>> {
        Ok(self.shared.run(command, None)?.tables)
    }

    fn fill_cancellable(
        &self,
        command: &Command,
        cancel: &CancellationToken,
    ) -> BackendResult<Vec<DataTable>> {
        Ok(self.shared.run(command, Some(cancel))?.tables)
    }

    async fn scalar_async(
        &self,
        command: &Command,
        cancel: &CancellationToken,
    ) -> BackendResult<Value> {
        Ok(self.offload(command, cancel).await?.first_value())
    }

    async fn non_query_async(
        &self,
        command: &Command,
        cancel: &CancellationToken,
    ) -> BackendResult<u64> {
        Ok(self.offload(command, cancel).await?.changes)
    }

    async fn reader_async(
        &self,
        command: &Command,
        cancel: &CancellationToken,
    ) -> BackendResult<DataTable> {
        Ok(self.offload(command, cancel).await?.first_table())
    }
}

fn is_cancelled(cancel: Option<&CancellationToken>) -> bool {
    cancel.map_or(false, CancellationToken::is_cancelled)
}

fn interrupted() -> rusqlite::Error {
    rusqlite::Error::SqliteFailure(
        ffi::Error::new(ffi::SQLITE_INTERRUPT),
        Some("interrupted".to_string()),
    )
}

fn run_batch(
    conn: &rusqlite::Connection,
    command: &Command,
    cancel: Option<&CancellationToken>,
) -> rusqlite::Result<BatchOutcome> {
    let mut outcome = BatchOutcome::default();
    let changes_before = total_changes(conn)?;
    let mut batch = Batch::new(conn, &command.sql);

    while let Some(mut stmt) = batch.next()? {
        if is_cancelled(cancel) {
            return Err(interrupted());
        }
        bind(conn, &mut stmt, &command.parameters)?;

        if stmt.column_count() == 0 {
            stmt.raw_execute()?;
            continue;
        }

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();
        let mut table = DataTable::new(String::new(), columns);
        let mut rows = stmt.raw_query();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(from_sql(row.get_ref(i)?));
            }
            table.rows.push(values);
        }
        outcome.tables.push(table);
    }

    // Per-statement counts go stale across SAVEPOINT/RELEASE and DDL, so
    // measure the batch as a whole.
    outcome.changes = total_changes(conn)?.saturating_sub(changes_before);
    Ok(outcome)
}

fn total_changes(conn: &rusqlite::Connection) -> rusqlite::Result<u64> {
    conn.query_row("SELECT total_changes()", [], |row| row.get::<_, i64>(0))
        .map(|n| n as u64)
}

fn bind(
    conn: &rusqlite::Connection,
    stmt: &mut Statement<'_>,
    parameters: &[Parameter],
) -> rusqlite::Result<()> {
    for index in 1..=stmt.parameter_count() {
        let name = match stmt.parameter_name(index) {
            Some(name) => strip_prefix(name).to_string(),
            None => continue,
        };
        if let Some(param) = parameters.iter().find(|p| p.is_named(&name)) {
            stmt.raw_bind_parameter(index, to_sql(&param.value))?;
        } else if name.eq_ignore_ascii_case(MASTER_ID) {
            if let Some(key) = captured_key(conn)? {
                stmt.raw_bind_parameter(index, key)?;
            }
        }
    }
    Ok(())
}

/// Key left in `temp.InsertedTable` by the last `Create`, if any.
fn captured_key(conn: &rusqlite::Connection) -> rusqlite::Result<Option<SqlValue>> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_temp_master WHERE type = 'table' AND name = 'InsertedTable')",
        [],
        |row| row.get(0),
    )?;
    if !exists {
        return Ok(None);
    }
    conn.query_row("SELECT Id FROM temp.InsertedTable LIMIT 1", [], |row| {
        row.get::<_, SqlValue>(0)
    })
    .optional()
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Int(i) => SqlValue::Integer(*i),
        Value::Float(f) => SqlValue::Real(*f),
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Bytes(b) => SqlValue::Blob(b.clone()),
    }
}

fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Bytes(b.to_vec()),
    }
}
