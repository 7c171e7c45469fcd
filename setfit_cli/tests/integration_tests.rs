//! Integration tests for the setfit binary.
//!
//! These tests verify end-to-end behavior including:
//! - Plan management
//! - The guided session workflow (auto-completed)
//! - Backup export/import
//! - Settings persistence

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("setfit"))
}

/// Create a one-exercise plan in the given data dir
fn add_plan(data_dir: &std::path::Path, name: &str) {
    cli()
        .arg("plan")
        .arg("add")
        .arg(name)
        .arg("--exercise")
        .arg("Bench Press:3x8-12")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Get Set Fit workout tracker"));
}

#[test]
fn test_plan_add_and_list() {
    let temp_dir = setup_test_dir();
    add_plan(temp_dir.path(), "Push Day");

    cli()
        .arg("plan")
        .arg("list")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Push Day"))
        .stdout(predicate::str::contains("Bench Press — 3 x 8-12"));
}

#[test]
fn test_plan_add_rejects_bad_exercise_spec() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("plan")
        .arg("add")
        .arg("Broken")
        .arg("--exercise")
        .arg("no separator here")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_plan_remove() {
    let temp_dir = setup_test_dir();
    add_plan(temp_dir.path(), "Push Day");

    cli()
        .arg("plan")
        .arg("remove")
        .arg("push day")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("plan")
        .arg("list")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No plans yet"));
}

#[test]
fn test_auto_completed_session_logs_workout() {
    let temp_dir = setup_test_dir();
    add_plan(temp_dir.path(), "Push Day");

    cli()
        .arg("start")
        .arg("Push Day")
        .arg("--auto-complete")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout complete"));

    // One log lands in the store
    let logs_path = temp_dir.path().join("store/workout_logs.json");
    let raw = fs::read_to_string(&logs_path).expect("logs file written");
    let logs: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(logs.as_array().unwrap().len(), 1);
    assert_eq!(logs[0]["planName"], "Push Day");

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Push Day"));
}

#[test]
fn test_start_unknown_plan_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("start")
        .arg("No Such Plan")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_history_empty_and_clear() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts completed yet"));

    add_plan(temp_dir.path(), "Push Day");
    cli()
        .arg("start")
        .arg("Push Day")
        .arg("--auto-complete")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("history")
        .arg("--clear")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts completed yet"));
}

#[test]
fn test_stats_after_session() {
    let temp_dir = setup_test_dir();
    add_plan(temp_dir.path(), "Push Day");

    cli()
        .arg("start")
        .arg("Push Day")
        .arg("--auto-complete")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("stats")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total workouts:   1"))
        .stdout(predicate::str::contains("Favorite plan:    Push Day"));
}

#[test]
fn test_export_and_import_roundtrip() {
    let temp_dir = setup_test_dir();
    add_plan(temp_dir.path(), "Push Day");

    let backup = temp_dir.path().join("backup.json");
    cli()
        .arg("export")
        .arg(&backup)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    let fresh_dir = setup_test_dir();
    cli()
        .arg("import")
        .arg(&backup)
        .arg("--data-dir")
        .arg(fresh_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 plans"));

    cli()
        .arg("plan")
        .arg("list")
        .arg("--data-dir")
        .arg(fresh_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Push Day"));
}

#[test]
fn test_import_malformed_backup_rejected() {
    let temp_dir = setup_test_dir();
    add_plan(temp_dir.path(), "Push Day");

    let bad = temp_dir.path().join("bad.json");
    fs::write(&bad, r#"{"plans": "not-an-array"}"#).unwrap();

    cli()
        .arg("import")
        .arg(&bad)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("MalformedBackup"));

    // Stored plans untouched
    cli()
        .arg("plan")
        .arg("list")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Push Day"));
}

#[test]
fn test_suggest_uses_fallback_without_api_key() {
    let temp_dir = setup_test_dir();

    cli()
        .env_remove("SETFIT_API_KEY")
        .arg("suggest")
        .arg("chest")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Push-ups"))
        .stdout(predicate::str::contains("built-in suggestions"));
}

#[test]
fn test_suggest_unknown_group_falls_back_to_core() {
    let temp_dir = setup_test_dir();

    cli()
        .env_remove("SETFIT_API_KEY")
        .arg("suggest")
        .arg("forearms")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Plank"));
}

#[test]
fn test_settings_update_persists() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("settings")
        .arg("--rest-time")
        .arg("90")
        .arg("--units")
        .arg("imperial")
        .arg("--auto-start-timer")
        .arg("on")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("default rest time: 90s"));

    cli()
        .arg("settings")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("default rest time: 90s"))
        .stdout(predicate::str::contains("Imperial"))
        .stdout(predicate::str::contains("auto-start timer:  true"));
}

#[test]
fn test_settings_rejects_bad_auto_start_value() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("settings")
        .arg("--auto-start-timer")
        .arg("sometimes")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_session_rest_duration_comes_from_settings() {
    // With a stored rest time of 0 the session never enters a rest
    // countdown, so a non-interactive run finishes instantly even
    // without --auto-complete's rest skipping.
    let temp_dir = setup_test_dir();
    add_plan(temp_dir.path(), "Push Day");

    cli()
        .arg("settings")
        .arg("--rest-time")
        .arg("0")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("start")
        .arg("Push Day")
        .arg("--auto-complete")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0s rest between exercises"));
}
