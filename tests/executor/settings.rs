//! Settings Tests
//!
//! `sqlforge.toml` loading and factory resolution by name.

use crate::common::*;
use sqlforge::{
    test_connection, DbConfig, Error, ExecutorFactory, Settings, CONFIG_FILE_NAME,
};
use tempfile::TempDir;

#[test]
fn create_named_from_settings_file() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("app.db");
    let settings_path = dir.path().join(CONFIG_FILE_NAME);

    std::fs::write(
        &settings_path,
        format!(
            "[databases.main]\nserver_type = \"sqlite\"\nconnection_string = \"Data Source={};\"\n",
            db_path.display()
        ),
    )
    .unwrap();

    let settings = Settings::from_file(&settings_path).unwrap();
    let db = ExecutorFactory::new().create_named(&settings, "main").unwrap();
    create_users(&db);
    db.close();

    assert!(db_path.exists());
}

#[test]
fn settings_round_trip_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    let mut settings = Settings::default();
    settings.insert("main", file_config(&dir));
    settings.insert("scratch", DbConfig::new("Sqlite", ":memory:"));
    settings.write_to_file(&path).unwrap();

    let loaded = Settings::from_file(&path).unwrap();
    assert_eq!(loaded, settings);
    assert!(test_connection(loaded.get("scratch").unwrap()));
}

#[test]
fn unknown_server_type_in_settings() {
    let settings: Settings = "[databases.old]\nserver_type = \"Oracle\"\nconnection_string = \"x\"\n"
        .parse()
        .unwrap();

    let err = ExecutorFactory::new().create_named(&settings, "old").unwrap_err();
    assert_eq!(
        err,
        Error::DbServerTypeNotImplementedYet {
            server_type: "Oracle".to_string()
        }
    );
    assert!(!test_connection(settings.get("old").unwrap()));
}
