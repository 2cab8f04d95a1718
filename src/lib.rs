//! sqlforge - SQL command execution and template compilation
//!
//! sqlforge runs parameterized SQL against pluggable relational backends
//! behind one uniform interface: a factory keyed on a server type tag, a
//! session-scoped [`Executor`] with explicit transactions and execution
//! hooks, and a dialect layer that turns query shapes into SQL templates.
//!
//! # Quick Start
//!
//! ```ignore
//! use sqlforge::{DbConfig, DbType, ExecutorFactory, Parameter};
//!
//! let db = ExecutorFactory::new().create(&DbConfig::new("Sqlite", ":memory:"))?;
//!
//! db.non_query("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)", &[])?;
//! db.non_query(
//!     "INSERT INTO users (name) VALUES (@Name)",
//!     &[Parameter::new("Name", DbType::NVarChar, "ada")],
//! )?;
//!
//! let users = db.table("SELECT * FROM users WHERE name = @Name", &[])?;
//! ```
//!
//! # Architecture
//!
//! All execution goes through the [`Executor`]'s pipeline. Dialects
//! ([`SqlServer`], [`Sqlite`]) are pure template tables; backends plug in
//! through the [`Connection`] and [`Connector`] traits.

// Re-export the public API from sqlforge-executor
pub use sqlforge_executor::*;
