//! End-to-end CLI tests for xg.
//!
//! These run the actual binary and cover everything that must work without
//! a live Redis: help/version output, argument validation, and input
//! validation that fails before a connection is opened.

use assert_cmd::Command;
use predicates::prelude::*;

fn xg() -> Command {
    let mut cmd = Command::cargo_bin("xg").expect("binary builds");
    // Keep test output stable regardless of the host environment.
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("REDIS_URL");
    cmd.env_remove("XG_REDIS_URL");
    cmd
}

#[test]
fn help_lists_all_commands() {
    xg().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("groups"))
        .stdout(predicate::str::contains("tweets"))
        .stdout(predicate::str::contains("mentions"))
        .stdout(predicate::str::contains("ingest"));
}

#[test]
fn version_flag_works() {
    xg().arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("xg"));
}

#[test]
fn create_group_with_empty_name_fails_fast() {
    // Validation must run before any Redis connection is attempted.
    xg().args(["groups", "create", "", "binance kyb"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Name and keywords are required"));
}

#[test]
fn create_group_with_empty_keywords_fails_fast() {
    xg().args(["groups", "create", "KYB", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Name and keywords are required"));
}

#[test]
fn rename_with_empty_keywords_fails_fast() {
    xg().args(["groups", "rename", "KYB", "Cards", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Name and keywords are required"));
}

#[test]
fn tweets_rejects_page_size_outside_fixed_set() {
    xg().args(["tweets", "KYB", "--page-size", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid page size"));
}

#[test]
fn tweets_rejects_page_zero() {
    // Pages are 1-based; 0 must not silently alias page 1.
    xg().args(["tweets", "KYB", "--page", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pages start at 1"));
}

#[test]
fn tweets_rejects_unknown_sort_field() {
    xg().args(["tweets", "KYB", "--sort", "likes"])
        .assert()
        .failure();
}

#[test]
fn ingest_missing_file_fails_before_connecting() {
    xg().args(["ingest", "/definitely/not/here.json", "--group", "KYB"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read ingest file"));
}

#[test]
fn ingest_rejects_capture_without_data_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capture.json");
    std::fs::write(&path, r#"{"meta": {}}"#).unwrap();

    xg().args(["ingest", path.to_str().unwrap(), "--group", "KYB"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("data"));
}

#[test]
fn groups_subcommand_is_required() {
    xg().arg("groups").assert().failure();
}
