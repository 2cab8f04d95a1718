//! Transaction coordination.
//!
//! An executor has at most one active transaction. The state is an explicit
//! tag, and `begin`/`commit`/`rollback` are total over it:
//!
//! | State | `begin` | `commit` / `rollback` |
//! |-------|---------|-----------------------|
//! | `None` | → `Active` | no-op |
//! | `Active` | `TransactionAlreadyStarted` | → `None` |
//!
//! A transaction whose connection has dropped is abandoned: the state goes
//! back to `None` without touching the backend.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use sqlforge_core::IsolationLevel;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::connection::ConnectionManager;
use crate::{Error, Result};

/// An active transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    id: Uuid,
    isolation: Option<IsolationLevel>,
    started: Instant,
}

impl Transaction {
    fn new(isolation: Option<IsolationLevel>) -> Self {
        Self {
            id: Uuid::new_v4(),
            isolation,
            started: Instant::now(),
        }
    }

    /// Unique id, attached to every command issued inside the transaction.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Isolation level requested at `begin`, if any.
    pub fn isolation(&self) -> Option<IsolationLevel> {
        self.isolation
    }

    /// Time since `begin`.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

#[derive(Debug, Default)]
enum TransactionState {
    #[default]
    None,
    Active(Transaction),
}

/// Tracks the executor's single optional transaction.
///
/// Only the owning executor mutates it. The lock lets the execution pipeline
/// abandon a transaction from `&self`.
#[derive(Debug, Default)]
pub(crate) struct TransactionCoordinator {
    state: Mutex<TransactionState>,
}

impl TransactionCoordinator {
    pub(crate) fn is_active(&self) -> bool {
        matches!(*self.state.lock(), TransactionState::Active(_))
    }

    pub(crate) fn active(&self) -> Option<Transaction> {
        match &*self.state.lock() {
            TransactionState::Active(txn) => Some(txn.clone()),
            TransactionState::None => None,
        }
    }

    pub(crate) fn active_id(&self) -> Option<Uuid> {
        match &*self.state.lock() {
            TransactionState::Active(txn) => Some(txn.id),
            TransactionState::None => None,
        }
    }

    pub(crate) fn begin(
        &self,
        connection: &ConnectionManager,
        isolation: Option<IsolationLevel>,
    ) -> Result<()> {
        let mut state = self.state.lock();
        if matches!(*state, TransactionState::Active(_)) {
            return Err(Error::TransactionAlreadyStarted);
        }

        connection.ensure_open()?;
        connection
            .connection()
            .begin(isolation)
            .map_err(Error::Transaction)?;

        let txn = Transaction::new(isolation);
        debug!(target: "sqlforge::txn", id = %txn.id, isolation = ?isolation, "Transaction started");
        *state = TransactionState::Active(txn);
        Ok(())
    }

    /// Commit the active transaction. The state is cleared even when the
    /// backend commit fails.
    pub(crate) fn commit(&self, connection: &ConnectionManager) -> Result<()> {
        let txn = match self.take() {
            Some(txn) => txn,
            None => return Ok(()),
        };

        match connection.connection().commit() {
            Ok(()) => {
                info!(target: "sqlforge::txn", id = %txn.id, elapsed_us = txn.elapsed().as_micros() as u64, "Transaction committed");
                Ok(())
            }
            Err(e) => {
                warn!(target: "sqlforge::txn", id = %txn.id, error = %e, "Transaction commit failed");
                Err(Error::Transaction(e))
            }
        }
    }

    /// Roll back the active transaction. The state is cleared even when the
    /// backend rollback fails.
    pub(crate) fn rollback(&self, connection: &ConnectionManager) -> Result<()> {
        let txn = match self.take() {
            Some(txn) => txn,
            None => return Ok(()),
        };

        warn!(target: "sqlforge::txn", id = %txn.id, "Transaction rolled back");
        connection
            .connection()
            .rollback()
            .map_err(Error::Transaction)
    }

    /// Forget the active transaction without reaching the backend. Used when
    /// the connection it ran on is gone.
    pub(crate) fn abandon(&self) -> Option<Transaction> {
        let txn = self.take()?;
        warn!(target: "sqlforge::txn", id = %txn.id, "Transaction abandoned: connection lost");
        Some(txn)
    }

    fn take(&self) -> Option<Transaction> {
        match std::mem::take(&mut *self.state.lock()) {
            TransactionState::Active(txn) => Some(txn),
            TransactionState::None => None,
        }
    }
}
