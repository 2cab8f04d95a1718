//! Error types shared by every backend.
//!
//! [`BackendError`] is the raw error a connection implementation reports.
//! The executor decides how it surfaces: unwrapped for open failures,
//! rewrapped with SQL context for execution failures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which backend operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendErrorKind {
    /// Opening the physical connection
    Open,
    /// Preparing, binding or running a statement
    Execute,
    /// Begin, commit or rollback
    Transaction,
    /// The caller cancelled the operation
    Cancelled,
    /// The connection is closed
    Closed,
}

impl fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BackendErrorKind::Open => "open",
            BackendErrorKind::Execute => "execute",
            BackendErrorKind::Transaction => "transaction",
            BackendErrorKind::Cancelled => "cancelled",
            BackendErrorKind::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Error reported by a backend connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind} failed: {message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
}

impl BackendError {
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn open(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Open, message)
    }

    pub fn execute(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Execute, message)
    }

    pub fn transaction(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Transaction, message)
    }

    pub fn closed() -> Self {
        Self::new(BackendErrorKind::Closed, "connection is closed")
    }

    pub fn cancelled() -> Self {
        Self::new(BackendErrorKind::Cancelled, "operation was cancelled")
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == BackendErrorKind::Cancelled
    }
}

/// Result type for backend operations
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// A declared type name that does not map onto [`DbType`](crate::DbType).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown database type: {name}")]
pub struct UnknownDbType {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let e = BackendError::execute("near \"FAIL\": syntax error");
        assert_eq!(e.to_string(), "execute failed: near \"FAIL\": syntax error");
    }

    #[test]
    fn cancelled_is_detected() {
        assert!(BackendError::cancelled().is_cancelled());
        assert!(!BackendError::closed().is_cancelled());
    }

    #[test]
    fn serializes_kind_snake_case() {
        let json = serde_json::to_string(&BackendError::open("refused")).unwrap();
        assert!(json.contains("\"open\""));
    }
}
