//! Integration tests for init, config and seed commands

#![allow(deprecated)]

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

mod common;
use common::{lifeos_cmd, workspace};

#[test]
fn test_init_creates_config() {
    let temp = TempDir::new().unwrap();

    lifeos_cmd()
        .arg("init")
        .arg(temp.path())
        .args(["--owner", "Robin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized lifeos workspace"))
        .stdout(predicate::str::contains("Owner: Robin"));

    assert!(temp.path().join(".lifeos/stores").is_dir());

    let content = fs::read_to_string(temp.path().join(".lifeos/config.toml")).unwrap();
    assert!(content.contains("owner = \"Robin\""));
    assert!(content.contains("upcoming_days = 7"));
}

#[test]
fn test_init_already_initialized_fails() {
    let temp = workspace();

    lifeos_cmd()
        .arg("init")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn test_init_with_seed_writes_snapshots() {
    let temp = TempDir::new().unwrap();

    lifeos_cmd()
        .arg("init")
        .arg(temp.path())
        .arg("--seed")
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded 14 stores"));

    let snapshot = fs::read_to_string(temp.path().join(".lifeos/stores/productivity.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
    assert_eq!(value["version"], 1);
    assert!(value["state"].as_array().is_some_and(|tasks| !tasks.is_empty()));
}

#[test]
fn test_seed_skips_non_empty_stores() {
    let temp = workspace();
    common::add_record(temp.path(), "tasks", r#"{"title": "mine"}"#);

    lifeos_cmd()
        .current_dir(temp.path())
        .arg("seed")
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped (not empty): productivity"));

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["list", "tasks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mine"))
        .stdout(predicate::str::contains("\n").count(1));
}

#[test]
fn test_config_get_and_set() {
    let temp = workspace();

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["config", "owner"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tester"));

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["config", "upcoming_days", "14"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set upcoming_days = 14"));

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["config", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("owner = tester"))
        .stdout(predicate::str::contains("upcoming_days = 14"))
        .stdout(predicate::str::contains("created").not());
}

#[test]
fn test_config_rejects_created_and_unknown_keys() {
    let temp = workspace();

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["config", "created", "2020-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("read-only"));

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["config", "editor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_command_outside_workspace_exits_2() {
    let temp = TempDir::new().unwrap();

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["list", "tasks"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Not a lifeos directory"))
        .stderr(predicate::str::contains("lifeos init"));
}

#[test]
fn test_root_env_var_selects_workspace() {
    let temp = workspace();
    let elsewhere = TempDir::new().unwrap();

    lifeos_cmd()
        .current_dir(elsewhere.path())
        .env("LIFEOS_ROOT", temp.path())
        .args(["config", "owner"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tester"));
}

#[test]
fn test_discovers_workspace_from_subdirectory() {
    let temp = workspace();
    let nested = temp.path().join("notes/2025");
    fs::create_dir_all(&nested).unwrap();

    lifeos_cmd()
        .current_dir(&nested)
        .args(["list", "tasks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No records found"));
}
