//! CRUD Tests
//!
//! Templates compiled by the SQLite dialect, filled and executed through the
//! pipeline.

use crate::common::*;
use sqlforge::{
    compile_where, fill_template, CompareOperator, DbType, Dialect, Error, Parameter, QueryShape,
    Sqlite, Value,
};

fn insert_user(db: &sqlforge::Executor, name: &str, age: i64) -> Value {
    let sql = render(
        db,
        QueryShape::Create,
        &[
            ("TargetTable", "users"),
            ("Columns", "name, age"),
            ("Values", "@Name, @Age"),
            ("SubQueries", ""),
            ("PkName", "id"),
        ],
    );
    db.scalar(
        &sql,
        &[
            Parameter::new("Name", DbType::NVarChar, name),
            Parameter::new("Age", DbType::Int, age),
        ],
    )
    .unwrap()
}

// ============================================================================
// Create
// ============================================================================

#[test]
fn create_returns_generated_key() {
    let db = memory_executor();
    create_users(&db);

    assert_eq!(insert_user(&db, "ada", 36), Value::Int(1));
    assert_eq!(insert_user(&db, "grace", 45), Value::Int(2));
    assert_eq!(user_count(&db), 2);
}

#[test]
fn create_runs_dependent_inserts_with_the_captured_key() {
    let db = memory_executor();
    create_users(&db);
    db.non_query(
        "CREATE TABLE orders (id INTEGER PRIMARY KEY, user_id INTEGER, item TEXT)",
        &[],
    )
    .unwrap();
    insert_user(&db, "ada", 36);

    let child = fill_template(
        db.compile(QueryShape::Create, true).unwrap(),
        &[
            ("TargetTable", "orders"),
            ("Columns", "user_id, item"),
            ("Values", "@MasterId, @Item"),
        ],
    );
    let sql = render(
        &db,
        QueryShape::Create,
        &[
            ("TargetTable", "users"),
            ("Columns", "name, age"),
            ("Values", "@Name, @Age"),
            ("SubQueries", child.as_str()),
            ("PkName", "id"),
        ],
    );

    let key = db
        .scalar(
            &sql,
            &[
                Parameter::new("Name", DbType::NVarChar, "grace"),
                Parameter::new("Age", DbType::Int, 45),
                Parameter::new("Item", DbType::NVarChar, "compiler"),
            ],
        )
        .unwrap();
    assert_eq!(key, Value::Int(2));

    let orders = db.table("SELECT user_id, item FROM orders", &[]).unwrap();
    assert_eq!(
        orders.rows,
        vec![vec![Value::Int(2), Value::String("compiler".into())]]
    );
}

// ============================================================================
// Read
// ============================================================================

#[test]
fn read_list_with_filter_order_and_pagination() {
    let db = memory_executor();
    create_users(&db);
    for (name, age) in [("alan", 41), ("ada", 36), ("grace", 45), ("alonzo", 92)] {
        insert_user(&db, name, age);
    }

    let filter = compile_where(
        &Sqlite,
        CompareOperator::StartsWith,
        "users",
        "users.name",
        "name",
        DbType::NVarChar,
    );
    let pagination = Sqlite.auxiliary().pagination;
    let where_clause = format!("WHERE {}", filter);
    let sql = render(
        &db,
        QueryShape::ReadList,
        &[
            ("TargetTable", "users"),
            ("Columns", "id, name, age"),
            ("Aggregations", ""),
            ("SubQueries", ""),
            ("Lefts", ""),
            ("Where", where_clause.as_str()),
            ("Order", "ORDER BY name"),
            ("Pagination", pagination),
        ],
    );

    let table = db
        .table(
            &sql,
            &[
                Parameter::new("users_name", DbType::NVarChar, "al"),
                Parameter::new("PageSize", DbType::Int, 10),
                Parameter::new("PageSkip", DbType::Int, 1),
            ],
        )
        .unwrap();

    assert_eq!(table.name, "T0");
    assert_eq!(table.columns, vec!["id", "name", "age"]);
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0, "name"), Some(&Value::String("alonzo".into())));
}

#[test]
fn aggregated_read_list_groups_rows() {
    let db = memory_executor();
    create_users(&db);
    for (name, age) in [("a", 30), ("b", 30), ("c", 40)] {
        insert_user(&db, name, age);
    }

    let sql = render(
        &db,
        QueryShape::AggregatedReadList,
        &[
            ("TargetTable", "users"),
            ("Columns", "age"),
            ("Aggregations", ", COUNT(*) AS n"),
            ("Lefts", ""),
            ("Where", ""),
            ("GroupBy", "GROUP BY age"),
            ("Order", "ORDER BY age"),
            ("Pagination", ""),
        ],
    );

    let table = db.table(&sql, &[]).unwrap();
    assert_eq!(table.rows, vec![
        vec![Value::Int(30), Value::Int(2)],
        vec![Value::Int(40), Value::Int(1)],
    ]);
}

#[test]
fn read_by_key_missing_parameter_binds_null() {
    let db = memory_executor();
    create_users(&db);
    insert_user(&db, "ada", 36);

    let sql = render(
        &db,
        QueryShape::ReadByKey,
        &[
            ("TargetTable", "users"),
            ("Columns", "id, name"),
            ("SubQueries", ""),
            ("Lefts", ""),
            ("Where", "WHERE id = @Id"),
        ],
    );

    // @Id is inferred as NULL, which matches nothing
    assert!(db.table(&sql, &[]).unwrap().is_empty());

    let found = db.table(&sql, &[Parameter::new("Id", DbType::Int, 1)]).unwrap();
    assert_eq!(found.len(), 1);
}

#[test]
fn scalar_function_template() {
    let db = memory_executor();

    let sql = render(
        &db,
        QueryShape::ScalarFunction,
        &[("FunctionName", "upper"), ("InputParams", "@Text")],
    );

    let value = db
        .scalar(&sql, &[Parameter::new("Text", DbType::NVarChar, "ada")])
        .unwrap();
    assert_eq!(value, Value::String("ADA".into()));
}

// ============================================================================
// Update / Delete
// ============================================================================

#[test]
fn update_and_delete_by_key() {
    let db = memory_executor();
    create_users(&db);
    insert_user(&db, "ada", 36);
    insert_user(&db, "grace", 45);

    let update = render(
        &db,
        QueryShape::UpdateByKey,
        &[
            ("PreQueries", ""),
            ("TargetTable", "users"),
            ("Sets", "age = @Age"),
            ("Where", "WHERE id = @Id"),
            ("SubQueries", ""),
        ],
    );
    let changed = db
        .non_query(
            &update,
            &[
                Parameter::new("Age", DbType::Int, 37),
                Parameter::new("Id", DbType::Int, 1),
            ],
        )
        .unwrap();
    assert_eq!(changed, 1);
    assert_eq!(
        db.scalar("SELECT age FROM users WHERE id = 1", &[]).unwrap(),
        Value::Int(37)
    );

    let delete = render(
        &db,
        QueryShape::DeleteByKey,
        &[
            ("SubQueries", ""),
            ("TargetTable", "users"),
            ("Where", "WHERE id = @Id"),
        ],
    );
    let deleted = db
        .non_query(&delete, &[Parameter::new("Id", DbType::Int, 2)])
        .unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(user_count(&db), 1);
}

// ============================================================================
// Result sets and errors
// ============================================================================

#[test]
fn table_set_names_each_result_set() {
    let db = memory_executor();
    create_users(&db);
    insert_user(&db, "ada", 36);

    let set = db
        .table_set(
            "SELECT id, name FROM users; SELECT COUNT(*) AS n FROM users",
            &[],
            &["users"],
        )
        .unwrap();

    assert_eq!(set.names(), vec!["users", "T1"]);
    assert_eq!(set.table("T1").unwrap().get(0, "n"), Some(&Value::Int(1)));
}

#[test]
fn backend_error_is_wrapped() {
    let db = memory_executor();

    let err = db
        .table(
            "SELECT * FROM missing WHERE id = @Id",
            &[Parameter::new("Id", DbType::Int, 5)],
        )
        .unwrap_err();

    match err {
        Error::Execution {
            code,
            message,
            sql,
            parameters,
        } => {
            assert_eq!(code, "DB_TABLE");
            assert!(message.contains("no such table"));
            assert_eq!(sql, "SELECT * FROM missing WHERE id = @Id");
            assert_eq!(parameters, r#"[{"name":"Id","value":"5"}]"#);
        }
        other => panic!("expected execution error, got {:?}", other),
    }
}

#[test]
fn procedure_shape_is_not_available_on_sqlite() {
    let db = memory_executor();

    let err = db.compile(QueryShape::Procedure, false).unwrap_err();
    assert!(matches!(
        err,
        Error::NotImplementedYet { shape: QueryShape::Procedure, .. }
    ));
}
