//! The execution pipeline.
//!
//! Every call, sync or async, runs the same steps:
//!
//! 1. ensure the connection is open
//! 2. resolve the final parameter list (explicit + inferred)
//! 3. build a [`Command`] tagged with the active transaction
//! 4. run the before-execute hook
//! 5. time the backend call
//! 6. run the after-execute hook with the elapsed time
//!
//! The command is dropped on every exit path. A backend failure in step 5 is
//! rewrapped into [`Error::Execution`] with the caller's error code, the SQL
//! text and a parameter snapshot. An open failure in step 1 surfaces as
//! [`Error::Connection`] since no SQL context exists yet.
//!
//! Step 1 never reopens under an active transaction: the transaction died
//! with its connection, so the call fails and the transaction is abandoned.
//!
//! A cancelled async call interrupts the backend and waits for it to stop
//! before failing, so no statement runs after the caller sees the error.

use std::sync::Arc;
use std::time::{Duration, Instant};

use sqlforge_core::{BackendError, BackendResult, Parameter};
use sqlforge_dialect::infer_parameters;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::backend::{Connection, ConnectionState};
use crate::output::{default_table_name, name_tables, Operation, Output};
use crate::{Command, Error, Executor, Result};

impl Executor {
    /// Run `sql` through the pipeline.
    ///
    /// `error_code` tags any execution failure; `operation` selects what the
    /// backend does with the command.
    pub fn execute(
        &self,
        sql: &str,
        params: &[Parameter],
        error_code: &str,
        operation: Operation,
    ) -> Result<Output> {
        let command = self.prepare(sql, params, error_code)?;

        let started = Instant::now();
        let result = dispatch(&**self.connection.connection(), &command, &operation);
        self.finish(command, error_code, &operation, result, started.elapsed())
    }

    /// Async twin of [`execute`](Self::execute).
    ///
    /// Always yields to the scheduler once before doing any work, so the
    /// returned future never completes on its first poll. The backend call
    /// races `cancel`; a cancelled call fails like any other execution
    /// error.
    pub async fn execute_async(
        &self,
        sql: &str,
        params: &[Parameter],
        error_code: &str,
        operation: Operation,
        cancel: &CancellationToken,
    ) -> Result<Output> {
        tokio::task::yield_now().await;

        let command = self.prepare(sql, params, error_code)?;

        let started = Instant::now();
        let result = if cancel.is_cancelled() {
            Err(BackendError::cancelled())
        } else {
            self.run_cancellable(&command, &operation, cancel).await
        };
        self.finish(command, error_code, &operation, result, started.elapsed())
    }

    async fn run_cancellable(
        &self,
        command: &Command,
        operation: &Operation,
        cancel: &CancellationToken,
    ) -> BackendResult<Output> {
        let connection = self.connection.connection();
        let work = dispatch_async(connection, command, operation, cancel);
        tokio::pin!(work);

        let finished = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            r = &mut work => Some(r),
        };
        if let Some(result) = finished {
            return result;
        }

        connection.interrupt();
        match work.await {
            // Completed before the interrupt landed.
            Ok(output) => Ok(output),
            Err(_) => Err(BackendError::cancelled()),
        }
    }

    /// Steps 1 to 4.
    fn prepare(&self, sql: &str, params: &[Parameter], error_code: &str) -> Result<Command> {
        if self.transaction.is_active() && self.connection.state() == ConnectionState::Closed {
            let command = Command::new(sql, infer_parameters(sql, Some(params)))
                .on_connection(self.server_type.as_str())
                .in_transaction(self.transaction.abandon().map(|txn| txn.id()));
            let lost = BackendError::transaction("connection lost during transaction");
            warn!(
                target: "sqlforge::exec",
                code = error_code,
                error = %lost,
                "Command refused"
            );
            return Err(execution_error(command, error_code, lost));
        }
        self.connection.ensure_open()?;

        let parameters = infer_parameters(sql, Some(params));
        let command = Command::new(sql, parameters)
            .on_connection(self.server_type.as_str())
            .in_transaction(self.transaction.active_id());

        if let Some(hook) = &self.hooks.before {
            hook(&command);
        }
        Ok(command)
    }

    /// Step 6 and error rewrapping.
    fn finish<T>(
        &self,
        command: Command,
        error_code: &str,
        operation: &Operation,
        result: BackendResult<T>,
        elapsed: Duration,
    ) -> Result<T> {
        match result {
            Ok(output) => {
                if let Some(hook) = &self.hooks.after {
                    hook(&command, elapsed);
                }
                debug!(
                    target: "sqlforge::exec",
                    operation = operation.name(),
                    elapsed_us = elapsed.as_micros() as u64,
                    parameters = command.parameters.len(),
                    transaction = ?command.transaction,
                    "Command executed"
                );
                Ok(output)
            }
            Err(e) => {
                warn!(
                    target: "sqlforge::exec",
                    operation = operation.name(),
                    code = error_code,
                    error = %e,
                    "Command failed"
                );
                Err(execution_error(command, error_code, e))
            }
        }
    }
}

fn execution_error(command: Command, error_code: &str, e: BackendError) -> Error {
    Error::Execution {
        code: error_code.to_string(),
        message: e.to_string(),
        parameters: command.parameter_snapshot(),
        sql: command.sql,
    }
}

fn dispatch(
    connection: &dyn Connection,
    command: &Command,
    operation: &Operation,
) -> BackendResult<Output> {
    match operation {
        Operation::Scalar => connection.scalar(command).map(Output::Scalar),
        Operation::NonQuery => connection.non_query(command).map(Output::RowsAffected),
        Operation::Table => connection.reader(command).map(|mut table| {
            table.name = default_table_name(0);
            Output::Table(table)
        }),
        Operation::TableSet { names } => connection
            .fill(command)
            .map(|tables| Output::TableSet(name_tables(tables, names))),
    }
}

async fn dispatch_async(
    connection: &Arc<dyn Connection>,
    command: &Command,
    operation: &Operation,
    cancel: &CancellationToken,
) -> BackendResult<Output> {
    match operation {
        Operation::Scalar => connection
            .scalar_async(command, cancel)
            .await
            .map(Output::Scalar),
        Operation::NonQuery => connection
            .non_query_async(command, cancel)
            .await
            .map(Output::RowsAffected),
        Operation::Table => connection
            .reader_async(command, cancel)
            .await
            .map(|mut table| {
                table.name = default_table_name(0);
                Output::Table(table)
            }),
        Operation::TableSet { names } => {
            let connection = Arc::clone(connection);
            let command = command.clone();
            let cancel = cancel.clone();
            let tables = tokio::task::spawn_blocking(move || {
                connection.fill_cancellable(&command, &cancel)
            })
            .await
            .map_err(|e| BackendError::execute(format!("fill worker failed: {}", e)))??;
            Ok(Output::TableSet(name_tables(tables, names)))
        }
    }
}
