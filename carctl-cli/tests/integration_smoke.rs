//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_serve() {
    let mut cmd = Command::cargo_bin("carctl").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("carctl").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--db-database"))
        .stdout(predicate::str::contains("DB_POOL_SIZE"))
        .stdout(predicate::str::contains("time_zone applied"));
}

#[test]
fn test_serve_requires_database_name() {
    let dir = std::env::temp_dir();
    let mut cmd = Command::cargo_bin("carctl").unwrap();
    cmd.current_dir(dir)
        .env_remove("DB_DATABASE")
        .arg("serve")
        .arg("--port")
        .arg("0");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("DB_DATABASE not set"));
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("carctl").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
