//! Transaction Tests
//!
//! Commit, rollback and disposal against a file-backed SQLite database, so
//! effects can be observed from a second executor.

use crate::common::*;
use sqlforge::{
    create, fill_template, DbType, Dialect, Error, IsolationLevel, Parameter, Sqlite,
};
use tempfile::TempDir;

fn insert(db: &sqlforge::Executor, name: &str) {
    db.non_query(
        "INSERT INTO users (name) VALUES (@Name)",
        &[Parameter::new("Name", DbType::NVarChar, name)],
    )
    .unwrap();
}

#[test]
fn commit_persists_changes() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);

    let mut db = create(&config).unwrap();
    create_users(&db);
    db.begin(None).unwrap();
    insert(&db, "ada");
    db.commit().unwrap();
    assert!(!db.is_active());
    db.close();

    let reader = create(&config).unwrap();
    assert_eq!(user_count(&reader), 1);
}

#[test]
fn rollback_discards_changes() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);

    let mut db = create(&config).unwrap();
    create_users(&db);
    db.begin(Some(IsolationLevel::Serializable)).unwrap();
    insert(&db, "ada");
    assert_eq!(user_count(&db), 1);
    db.rollback().unwrap();

    assert!(!db.is_active());
    assert_eq!(user_count(&db), 0);
}

#[test]
fn second_begin_fails_fast() {
    let mut db = memory_executor();
    db.begin(None).unwrap();

    assert_eq!(db.begin(None).unwrap_err(), Error::TransactionAlreadyStarted);
    assert!(db.is_active());
    db.rollback().unwrap();
}

#[test]
fn dropping_executor_rolls_back_pending_transaction() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);

    let mut db = create(&config).unwrap();
    create_users(&db);
    db.begin(None).unwrap();
    insert(&db, "ada");
    drop(db);

    let reader = create(&config).unwrap();
    assert_eq!(user_count(&reader), 0);
}

#[test]
fn transaction_block_template_runs_atomically() {
    let db = memory_executor();
    create_users(&db);

    let body = "INSERT INTO users (name) VALUES (@A);\nINSERT INTO users (name) VALUES (@B);";
    let sql = fill_template(
        Sqlite.auxiliary().transaction_block,
        &[("TranName", "batch1"), ("SqlBody", body)],
    );

    let rows = db
        .non_query(
            &sql,
            &[
                Parameter::new("A", DbType::NVarChar, "ada"),
                Parameter::new("B", DbType::NVarChar, "grace"),
            ],
        )
        .unwrap();

    assert_eq!(rows, 2);
    assert_eq!(user_count(&db), 2);
}
