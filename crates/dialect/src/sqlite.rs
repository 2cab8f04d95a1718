//! SQLite template table.
//!
//! SQLite has no table variables, so key capture goes through a temp table
//! named after the reserved `InsertedTable` pseudo-parameter, and dependent
//! sub-queries read the key back as `@MasterId`. There are no stored
//! procedures: `Procedure` has no entry.

use sqlforge_core::QueryShape;

use crate::dialect::{AuxiliaryTemplates, Dialect, TemplateEntry};

const CREATE: &str = "INSERT INTO {TargetTable} ({Columns}) VALUES ({Values});
CREATE TEMP TABLE IF NOT EXISTS InsertedTable (Id);
DELETE FROM temp.InsertedTable;
INSERT INTO temp.InsertedTable (Id) VALUES (last_insert_rowid());
{SubQueries}
SELECT Id AS {PkName} FROM temp.InsertedTable;";

const CREATE_SUB: &str = "INSERT INTO {TargetTable} ({Columns}) VALUES ({Values});";

const READ_LIST: &str =
    "SELECT {Columns}{Aggregations}{SubQueries} FROM {TargetTable} {Lefts} {Where} {Order} {Pagination}";

const READ_LIST_SUB: &str = "(SELECT json_group_array(json_object({Columns}{Aggregations}{SubQueries})) FROM (SELECT * FROM {TargetTable} {Lefts} {Where} {Order} {Pagination})) AS {TargetTableAs}";

const AGGREGATED_READ_LIST: &str =
    "SELECT {Columns}{Aggregations} FROM {TargetTable} {Lefts} {Where} {GroupBy} {Order} {Pagination}";

const READ_BY_KEY: &str = "SELECT {Columns}{SubQueries} FROM {TargetTable} {Lefts} {Where}";

const UPDATE_BY_KEY: &str = "{PreQueries}
UPDATE {TargetTable} SET {Sets} {Where};
{SubQueries}";

const UPDATE_BY_KEY_SUB: &str = "UPDATE {TargetTable} SET {Sets} {Where};";

const DELETE: &str = "DELETE FROM {TargetTable} {Where};";

const DELETE_BY_KEY: &str = "{SubQueries}
DELETE FROM {TargetTable} {Where};";

const DELETE_BY_KEY_SUB: &str = "DELETE FROM {TargetTable} {Where};";

const TABLE_FUNCTION: &str = "SELECT * FROM {FunctionName}({InputParams});";

const SCALAR_FUNCTION: &str = "SELECT {FunctionName}({InputParams});";

static TEMPLATES: [TemplateEntry; 9] = [
    TemplateEntry::with_sub_query(QueryShape::Create, CREATE, CREATE_SUB),
    TemplateEntry::with_sub_query(QueryShape::ReadList, READ_LIST, READ_LIST_SUB),
    TemplateEntry::new(QueryShape::AggregatedReadList, AGGREGATED_READ_LIST),
    TemplateEntry::new(QueryShape::ReadByKey, READ_BY_KEY),
    TemplateEntry::with_sub_query(QueryShape::UpdateByKey, UPDATE_BY_KEY, UPDATE_BY_KEY_SUB),
    TemplateEntry::new(QueryShape::Delete, DELETE),
    TemplateEntry::with_sub_query(QueryShape::DeleteByKey, DELETE_BY_KEY, DELETE_BY_KEY_SUB),
    TemplateEntry::new(QueryShape::TableFunction, TABLE_FUNCTION),
    TemplateEntry::new(QueryShape::ScalarFunction, SCALAR_FUNCTION),
];

static AUXILIARY: AuxiliaryTemplates = AuxiliaryTemplates {
    pagination: "LIMIT @PageSize OFFSET @PageSkip",
    group_by: "GROUP BY {Columns}",
    order_by: "ORDER BY {Columns}",
    left_join: "LEFT OUTER JOIN {TargetTable} AS {TargetTableAs} ON {TargetTableAs}.{TargetColumn} = {MainTable}.{MainColumn}",
    transaction_block: "SAVEPOINT {TranName};
{SqlBody}
RELEASE {TranName};",
};

/// SQLite 3.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "Sqlite"
    }

    fn unicode_prefix(&self) -> &'static str {
        ""
    }

    fn concat_operator(&self) -> &'static str {
        "||"
    }

    fn templates(&self) -> &'static [TemplateEntry] {
        &TEMPLATES
    }

    fn auxiliary(&self) -> &'static AuxiliaryTemplates {
        &AUXILIARY
    }
}
