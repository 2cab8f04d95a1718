//! Error types for command execution.
//!
//! All errors surfaced by an [`Executor`](crate::Executor) are represented by
//! the [`Error`] enum. Callers see one error shape regardless of backend:
//! - **Structured**: each variant has typed fields
//! - **Serializable**: can be converted to/from JSON
//! - **Contextual**: execution failures carry the SQL text and a parameter
//!   snapshot, so they can be diagnosed without a debugger

use serde::{Deserialize, Serialize};
use sqlforge_core::{BackendError, QueryShape};
use sqlforge_dialect::DialectError;

/// Default error codes used by the high-level execution surface.
pub mod codes {
    /// `Executor::scalar`
    pub const SCALAR: &str = "DB_SCALAR";
    /// `Executor::non_query`
    pub const NON_QUERY: &str = "DB_NON_QUERY";
    /// `Executor::table`
    pub const TABLE: &str = "DB_TABLE";
    /// `Executor::table_set`
    pub const TABLE_SET: &str = "DB_TABLE_SET";
}

/// Executor errors.
///
/// # Categories
///
/// | Category | Variants | Retried |
/// |----------|----------|---------|
/// | Configuration | `DbServerTypeNotImplementedYet`, `NotImplementedYet`, `Config` | never |
/// | Connection | `Connection` | never |
/// | Transaction discipline | `TransactionAlreadyStarted`, `Transaction` | never |
/// | Execution | `Execution` | never (caller's call) |
/// | System | `UnexpectedOutput`, `Internal` | never |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Configuration ====================
    /// No backend is available for the server type tag
    #[error("database server type not implemented yet: {server_type}")]
    DbServerTypeNotImplementedYet { server_type: String },

    /// The dialect has no template for the query shape
    #[error("query shape not implemented yet for {dialect}: {shape}")]
    NotImplementedYet { dialect: String, shape: QueryShape },

    /// Settings could not be read or parsed
    #[error("configuration error: {reason}")]
    Config { reason: String },

    // ==================== Connection ====================
    /// Opening the physical connection failed; no SQL context exists yet
    #[error("connection error: {0}")]
    Connection(BackendError),

    // ==================== Transaction ====================
    /// `begin` called while a transaction is active
    #[error("transaction already started")]
    TransactionAlreadyStarted,

    /// The backend failed to begin, commit or roll back
    #[error("transaction error: {0}")]
    Transaction(BackendError),

    // ==================== Execution ====================
    /// Preparing or running a command failed
    #[error("[{code}] {message} | sql: {sql} | parameters: {parameters}")]
    Execution {
        /// Caller-supplied error code
        code: String,
        /// Original backend message
        message: String,
        /// SQL text of the failed command
        sql: String,
        /// JSON snapshot of the bound parameters
        parameters: String,
    },

    // ==================== System ====================
    /// The backend produced a different kind of output than requested
    #[error("unexpected output: expected {expected}, got {actual}")]
    UnexpectedOutput { expected: String, actual: String },

    /// Internal error (bug or invariant violation)
    #[error("internal error: {reason}")]
    Internal { reason: String },
}

impl Error {
    /// Error code of an execution failure.
    pub fn code(&self) -> Option<&str> {
        match self {
            Error::Execution { code, .. } => Some(code),
            _ => None,
        }
    }

    /// SQL text of an execution failure.
    pub fn sql(&self) -> Option<&str> {
        match self {
            Error::Execution { sql, .. } => Some(sql),
            _ => None,
        }
    }
}

impl From<DialectError> for Error {
    fn from(e: DialectError) -> Self {
        match e {
            DialectError::NotImplementedYet { dialect, shape } => {
                Error::NotImplementedYet { dialect, shape }
            }
        }
    }
}
