//! SQL Server (T-SQL) template table.

use sqlforge_core::QueryShape;

use crate::dialect::{AuxiliaryTemplates, Dialect, TemplateEntry};

// =============================================================================
// Shape templates
// =============================================================================

/// Insert capturing the generated key, then run dependent inserts.
///
/// `@InsertedTable` and `@MasterId` are declared here, which is why the
/// parameter inference engine never synthesizes them.
const CREATE: &str = "DECLARE @InsertedTable TABLE (Id {PkTypeSize});
INSERT INTO {TargetTable} ({Columns}) OUTPUT INSERTED.{PkName} INTO @InsertedTable VALUES ({Values});
DECLARE @MasterId sql_variant = (SELECT TOP 1 Id FROM @InsertedTable);
{SubQueries}
SELECT TOP 1 Id FROM @InsertedTable;";

const CREATE_SUB: &str = "INSERT INTO {TargetTable} ({Columns}) VALUES ({Values});";

const READ_LIST: &str = "SELECT {Columns}{Aggregations}{SubQueries} FROM {TargetTable} WITH (NOLOCK) {Lefts} {Where} {Order} {Pagination}";

const READ_LIST_SUB: &str = "(SELECT {Columns}{Aggregations}{SubQueries} FROM {TargetTable} WITH (NOLOCK) {Lefts} {Where} {Order} {Pagination} FOR JSON PATH) AS [{TargetTableAs}]";

const AGGREGATED_READ_LIST: &str = "SELECT {Columns}{Aggregations} FROM {TargetTable} WITH (NOLOCK) {Lefts} {Where} {GroupBy} {Order} {Pagination}";

const READ_BY_KEY: &str = "SELECT {Columns}{SubQueries} FROM {TargetTable} WITH (NOLOCK) {Lefts} {Where}";

const UPDATE_BY_KEY: &str = "{PreQueries}
UPDATE {TargetTable} SET {Sets} {Where};
{SubQueries}";

const UPDATE_BY_KEY_SUB: &str = "UPDATE {TargetTable} SET {Sets} {Where};";

const DELETE: &str = "DELETE FROM {TargetTable} {Where};";

const DELETE_BY_KEY: &str = "{SubQueries}
DELETE FROM {TargetTable} {Where};";

const DELETE_BY_KEY_SUB: &str = "DELETE FROM {TargetTable} {Where};";

const PROCEDURE: &str = "EXEC {StoredProcedureName} {InputParams};";

const TABLE_FUNCTION: &str = "SELECT * FROM {FunctionName}({InputParams});";

const SCALAR_FUNCTION: &str = "SELECT {FunctionName}({InputParams});";

static TEMPLATES: [TemplateEntry; 10] = [
    TemplateEntry::with_sub_query(QueryShape::Create, CREATE, CREATE_SUB),
    TemplateEntry::with_sub_query(QueryShape::ReadList, READ_LIST, READ_LIST_SUB),
    TemplateEntry::new(QueryShape::AggregatedReadList, AGGREGATED_READ_LIST),
    TemplateEntry::new(QueryShape::ReadByKey, READ_BY_KEY),
    TemplateEntry::with_sub_query(QueryShape::UpdateByKey, UPDATE_BY_KEY, UPDATE_BY_KEY_SUB),
    TemplateEntry::new(QueryShape::Delete, DELETE),
    TemplateEntry::with_sub_query(QueryShape::DeleteByKey, DELETE_BY_KEY, DELETE_BY_KEY_SUB),
    TemplateEntry::new(QueryShape::Procedure, PROCEDURE),
    TemplateEntry::new(QueryShape::TableFunction, TABLE_FUNCTION),
    TemplateEntry::new(QueryShape::ScalarFunction, SCALAR_FUNCTION),
];

// =============================================================================
// Auxiliary templates
// =============================================================================

static AUXILIARY: AuxiliaryTemplates = AuxiliaryTemplates {
    pagination: "OFFSET @PageSkip ROWS FETCH NEXT @PageSize ROWS ONLY",
    group_by: "GROUP BY {Columns}",
    order_by: "ORDER BY {Columns}",
    left_join: "LEFT OUTER JOIN {TargetTable} AS {TargetTableAs} WITH (NOLOCK) ON {TargetTableAs}.{TargetColumn} = {MainTable}.{MainColumn}",
    transaction_block: "BEGIN TRAN {TranName};
{SqlBody}
COMMIT TRAN {TranName};",
};

/// Microsoft SQL Server.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServer;

impl Dialect for SqlServer {
    fn name(&self) -> &'static str {
        "SqlServer"
    }

    fn unicode_prefix(&self) -> &'static str {
        "N"
    }

    fn concat_operator(&self) -> &'static str {
        "+"
    }

    fn templates(&self) -> &'static [TemplateEntry] {
        &TEMPLATES
    }

    fn auxiliary(&self) -> &'static AuxiliaryTemplates {
        &AUXILIARY
    }
}
