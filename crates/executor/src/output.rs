//! Operations and their outputs.
//!
//! Every [`Operation`] produces exactly one [`Output`] variant:
//!
//! | Operation | Output |
//! |-----------|--------|
//! | `Scalar` | `Scalar(Value)` |
//! | `NonQuery` | `RowsAffected(u64)` |
//! | `Table` | `Table(DataTable)` |
//! | `TableSet` | `TableSet(DataSet)` |

use serde::{Deserialize, Serialize};
use sqlforge_core::{DataSet, DataTable, Value};

use crate::{Error, Result};

/// Name given to the `i`-th table when the caller supplied no name for it.
pub fn default_table_name(index: usize) -> String {
    format!("T{}", index)
}

/// What the backend should do with a prepared command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// First column of the first row
    Scalar,
    /// Affected row count
    NonQuery,
    /// First result set
    Table,
    /// Every result set, named in order by `names` then `T{i}`
    TableSet { names: Vec<String> },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Scalar => "scalar",
            Operation::NonQuery => "non_query",
            Operation::Table => "table",
            Operation::TableSet { .. } => "table_set",
        }
    }
}

/// Successful execution results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// Single value (NULL when the result set was empty)
    Scalar(Value),
    /// Affected row count
    RowsAffected(u64),
    /// One materialized row-set
    Table(DataTable),
    /// Several named row-sets
    TableSet(DataSet),
}

impl Output {
    pub fn kind(&self) -> &'static str {
        match self {
            Output::Scalar(_) => "scalar",
            Output::RowsAffected(_) => "rows_affected",
            Output::Table(_) => "table",
            Output::TableSet(_) => "table_set",
        }
    }

    fn unexpected(self, expected: &str) -> Error {
        Error::UnexpectedOutput {
            expected: expected.to_string(),
            actual: self.kind().to_string(),
        }
    }

    pub fn into_scalar(self) -> Result<Value> {
        match self {
            Output::Scalar(v) => Ok(v),
            other => Err(other.unexpected("scalar")),
        }
    }

    pub fn into_rows_affected(self) -> Result<u64> {
        match self {
            Output::RowsAffected(n) => Ok(n),
            other => Err(other.unexpected("rows_affected")),
        }
    }

    pub fn into_table(self) -> Result<DataTable> {
        match self {
            Output::Table(t) => Ok(t),
            other => Err(other.unexpected("table")),
        }
    }

    pub fn into_table_set(self) -> Result<DataSet> {
        match self {
            Output::TableSet(ds) => Ok(ds),
            other => Err(other.unexpected("table_set")),
        }
    }
}

/// Apply caller-supplied names to `tables`, falling back to `T{i}`.
pub(crate) fn name_tables(mut tables: Vec<DataTable>, names: &[String]) -> DataSet {
    for (i, table) in tables.iter_mut().enumerate() {
        table.name = names
            .get(i)
            .cloned()
            .unwrap_or_else(|| default_table_name(i));
    }
    DataSet::new(tables)
}
