//! Core types for sqlforge
//!
//! This crate defines the value objects every other layer speaks:
//! - Value: a bound parameter value or a result cell
//! - DbType: declared database type of a parameter or column
//! - Parameter / CompareClause: the parameter model
//! - QueryShape: closed tag set selecting a SQL template
//! - DataTable / DataSet: materialized result sets
//! - BackendError: the raw error a backend connection reports

#![warn(clippy::all)]

pub mod error;
pub mod parameter;
pub mod shape;
pub mod table;
pub mod types;
pub mod value;

pub use error::{BackendError, BackendErrorKind, BackendResult, UnknownDbType};
pub use parameter::{strip_prefix, CompareClause, CompareOperator, Parameter};
pub use shape::QueryShape;
pub use table::{DataSet, DataTable};
pub use types::{DbType, IsolationLevel};
pub use value::Value;
