//! # sqlforge dialects
//!
//! Pure, stateless SQL text services. Everything here is safe to share
//! across executors and threads.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`dialect`] | The [`Dialect`] strategy trait |
//! | [`sqlserver`], [`sqlite`] | Template tables per backend |
//! | [`template`] | `(shape, is_sub_query)` → template selection |
//! | [`filter`] | Comparison operator → where-clause fragment |
//! | [`inference`] | Default parameters for unbound placeholders |
//! | [`type_map`] | Declared type → Rust parameter declaration |

#![warn(clippy::all)]

pub mod dialect;
pub mod error;
pub mod filter;
pub mod inference;
pub mod sqlite;
pub mod sqlserver;
pub mod template;
pub mod type_map;

pub use dialect::{AuxiliaryTemplates, Dialect, TemplateEntry};
pub use error::{DialectError, DialectResult};
pub use filter::{bound_parameter_name, compile_where};
pub use inference::{infer_parameters, scan_placeholders, RESERVED_NAMES};
pub use sqlite::Sqlite;
pub use sqlserver::SqlServer;
pub use template::{compile_template, fill_template, placeholders_in, PLACEHOLDERS};
pub use type_map::{param_declaration, rust_type};
