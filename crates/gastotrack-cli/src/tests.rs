//! CLI command tests

use crate::commands;

#[test]
fn test_cmd_init_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");

    commands::cmd_init(&db_path).unwrap();
    assert!(db_path.exists());

    // Idempotent: running init again is fine
    commands::cmd_init(&db_path).unwrap();
}

#[test]
fn test_cmd_status_without_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("missing.db");

    // Reports the uninitialized state without creating the file
    commands::cmd_status(&db_path).unwrap();
    assert!(!db_path.exists());
}

#[test]
fn test_cmd_status_with_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");

    commands::cmd_init(&db_path).unwrap();
    commands::cmd_status(&db_path).unwrap();
}

#[test]
fn test_open_db_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");

    let db = commands::open_db(&db_path).unwrap();
    assert_eq!(db.count_expenses().unwrap(), 0);
}
