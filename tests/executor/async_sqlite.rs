//! Async Tests
//!
//! The async surface over the real SQLite backend.

use std::time::{Duration, Instant};

use crate::common::*;
use sqlforge::{BackendError, CancellationToken, DbType, Error, Parameter, Value};

/// Counts far enough to run for many seconds unless interrupted.
const SLOW_COUNT: &str = "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 300000000) SELECT COUNT(*) FROM c";

fn cancel_after(cancel: &CancellationToken, delay: Duration) {
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        trigger.cancel();
    });
}

#[tokio::test]
async fn async_round_trip() {
    let db = memory_executor();
    let cancel = CancellationToken::new();
    create_users(&db);

    let rows = db
        .non_query_async(
            "INSERT INTO users (name, age) VALUES (@Name, @Age)",
            &[
                Parameter::new("Name", DbType::NVarChar, "ada"),
                Parameter::new("Age", DbType::Int, 36),
            ],
            &cancel,
        )
        .await
        .unwrap();
    assert_eq!(rows, 1);

    let age = db
        .scalar_async("SELECT age FROM users WHERE name = @Name", &[Parameter::new("Name", DbType::NVarChar, "ada")], &cancel)
        .await
        .unwrap();
    assert_eq!(age, Value::Int(36));

    let table = db
        .table_async("SELECT * FROM users", &[], &cancel)
        .await
        .unwrap();
    assert_eq!(table.len(), 1);
}

#[tokio::test]
async fn async_table_set_on_blocking_pool() {
    let db = memory_executor();
    let cancel = CancellationToken::new();

    let set = db
        .table_set_async("SELECT 1 AS a; SELECT 2 AS b; SELECT 3 AS c", &[], &["one"], &cancel)
        .await
        .unwrap();

    assert_eq!(set.names(), vec!["one", "T1", "T2"]);
    assert_eq!(set.table("T2").unwrap().get(0, "c"), Some(&Value::Int(3)));
}

#[tokio::test]
async fn cancelled_call_is_wrapped() {
    let db = memory_executor();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = db
        .scalar_async("SELECT 1", &[], &cancel)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Execution { ref code, ref sql, .. } if code == "DB_SCALAR" && sql == "SELECT 1"
    ));
}

#[tokio::test]
async fn cancel_interrupts_a_running_statement() {
    let db = memory_executor();
    let cancel = CancellationToken::new();
    // Runs on the test's single runtime thread, so it only fires if the
    // query is not blocking that thread.
    cancel_after(&cancel, Duration::from_millis(50));

    let started = Instant::now();
    let err = db.scalar_async(SLOW_COUNT, &[], &cancel).await.unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(10));
    match err {
        Error::Execution { code, message, .. } => {
            assert_eq!(code, "DB_SCALAR");
            assert_eq!(message, BackendError::cancelled().to_string());
        }
        other => panic!("expected execution error, got {:?}", other),
    }

    // The connection is still usable
    assert_eq!(db.scalar("SELECT 1", &[]).unwrap(), Value::Int(1));
}

#[tokio::test]
async fn cancelled_table_set_leaves_no_later_writes() {
    let db = memory_executor();
    let cancel = CancellationToken::new();
    create_users(&db);
    cancel_after(&cancel, Duration::from_millis(50));

    let sql = format!(
        "{}; INSERT INTO users (name, age) VALUES ('ghost', 1); SELECT 1",
        SLOW_COUNT
    );
    let result = db.table_set_async(&sql, &[], &[], &cancel).await;

    assert!(matches!(result, Err(Error::Execution { ref code, .. }) if code == "DB_TABLE_SET"));
    assert_eq!(user_count(&db), 0);
}
