//! Common test utilities for executor tests

use std::sync::Once;

use sqlforge::{create, fill_template, DbConfig, Executor, QueryShape};
use tempfile::TempDir;

static INIT_TRACING: Once = Once::new();

/// Route executor logs to the test harness (`RUST_LOG` filters them)
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Executor over a private in-memory database
pub fn memory_executor() -> Executor {
    init_tracing();
    create(&DbConfig::new("Sqlite", ":memory:")).unwrap()
}

/// Config for a database file inside `dir`
pub fn file_config(dir: &TempDir) -> DbConfig {
    init_tracing();
    let path = dir.path().join("test.db");
    DbConfig::new("Sqlite", format!("Data Source={};", path.display()))
}

/// Create the `users` table used by most tests
pub fn create_users(db: &Executor) {
    db.non_query(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, age INTEGER)",
        &[],
    )
    .unwrap();
}

/// Compile `shape` in the executor's dialect and fill the placeholders
pub fn render(db: &Executor, shape: QueryShape, replacements: &[(&str, &str)]) -> String {
    fill_template(db.compile(shape, false).unwrap(), replacements)
}

/// Count rows in `users`
pub fn user_count(db: &Executor) -> i64 {
    db.scalar("SELECT COUNT(*) FROM users", &[])
        .unwrap()
        .as_int()
        .unwrap()
}
