//! Executor Layer Tests
//!
//! End-to-end tests for the sqlforge executor against the bundled SQLite
//! backend:
//! - Template compilation + execution (create, read, update, delete)
//! - Transactions and disposal
//! - Async surface
//! - Settings files and the factory

mod common;

mod async_sqlite;
mod crud;
mod settings;
mod transactions;
