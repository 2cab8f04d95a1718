//! Dialect errors.

use serde::{Deserialize, Serialize};
use sqlforge_core::QueryShape;

/// Errors raised while compiling templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DialectError {
    /// The dialect has no template for the requested shape
    #[error("query shape not implemented yet for {dialect}: {shape}")]
    NotImplementedYet {
        dialect: String,
        shape: QueryShape,
    },
}

/// Result type for dialect operations
pub type DialectResult<T> = std::result::Result<T, DialectError>;
