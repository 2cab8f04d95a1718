//! Connection lifecycle.
//!
//! The manager owns the executor's single physical connection. It is opened
//! eagerly at construction, reopened transparently when found closed, and
//! closed exactly once at disposal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use sqlforge_core::BackendResult;
use tracing::{debug, info};

use crate::backend::{Connection, ConnectionState};
use crate::{Error, Result};

pub(crate) struct ConnectionManager {
    connection: Arc<dyn Connection>,
    /// Serializes reopen attempts.
    open_lock: Mutex<()>,
    closed: AtomicBool,
}

impl ConnectionManager {
    /// Take ownership of `connection` and open it.
    ///
    /// # Errors
    ///
    /// [`Error::Connection`] with the backend's own error when opening fails.
    pub(crate) fn open(connection: Box<dyn Connection>) -> Result<Self> {
        let manager = Self {
            connection: Arc::from(connection),
            open_lock: Mutex::new(()),
            closed: AtomicBool::new(false),
        };
        manager.ensure_open()?;
        Ok(manager)
    }

    /// Make sure the connection is open.
    ///
    /// Returns immediately when the connection reports `Open`. Otherwise
    /// takes the open lock and re-checks before opening, so racing callers
    /// open at most once. No retry: an open failure is returned as is.
    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.connection.state() == ConnectionState::Open {
            return Ok(());
        }

        let _guard = self.open_lock.lock();
        if self.connection.state() == ConnectionState::Open {
            return Ok(());
        }

        self.connection.open().map_err(Error::Connection)?;
        self.closed.store(false, Ordering::Release);
        debug!(target: "sqlforge::conn", "Connection opened");
        Ok(())
    }

    pub(crate) fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub(crate) fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    /// Close the connection. Only the first call reaches the backend.
    pub(crate) fn close(&self) -> BackendResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let _guard = self.open_lock.lock();
        self.connection.close()?;
        info!(target: "sqlforge::conn", "Connection closed");
        Ok(())
    }
}
