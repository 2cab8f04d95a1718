//! Query shapes selecting a compiled SQL template.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The CRUD/read intent a template is compiled for.
///
/// | Shape | Has sub-query variant |
/// |-------|-----------------------|
/// | `Create` | yes |
/// | `ReadList` | yes |
/// | `AggregatedReadList` | no |
/// | `ReadByKey` | no |
/// | `UpdateByKey` | yes |
/// | `Delete` | no |
/// | `DeleteByKey` | yes |
/// | `Procedure` | no |
/// | `TableFunction` | no |
/// | `ScalarFunction` | no |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryShape {
    Create,
    ReadList,
    AggregatedReadList,
    ReadByKey,
    UpdateByKey,
    Delete,
    DeleteByKey,
    Procedure,
    TableFunction,
    ScalarFunction,
}

impl QueryShape {
    /// Every shape, in declaration order.
    pub const ALL: [QueryShape; 10] = [
        QueryShape::Create,
        QueryShape::ReadList,
        QueryShape::AggregatedReadList,
        QueryShape::ReadByKey,
        QueryShape::UpdateByKey,
        QueryShape::Delete,
        QueryShape::DeleteByKey,
        QueryShape::Procedure,
        QueryShape::TableFunction,
        QueryShape::ScalarFunction,
    ];

    /// Shapes whose nested use compiles to a different template.
    pub fn has_sub_query_variant(&self) -> bool {
        matches!(
            self,
            QueryShape::Create
                | QueryShape::ReadList
                | QueryShape::UpdateByKey
                | QueryShape::DeleteByKey
        )
    }

    /// Tag name, as used in error context.
    pub fn name(&self) -> &'static str {
        match self {
            QueryShape::Create => "Create",
            QueryShape::ReadList => "ReadList",
            QueryShape::AggregatedReadList => "AggregatedReadList",
            QueryShape::ReadByKey => "ReadByKey",
            QueryShape::UpdateByKey => "UpdateByKey",
            QueryShape::Delete => "Delete",
            QueryShape::DeleteByKey => "DeleteByKey",
            QueryShape::Procedure => "Procedure",
            QueryShape::TableFunction => "TableFunction",
            QueryShape::ScalarFunction => "ScalarFunction",
        }
    }
}

impl fmt::Display for QueryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
