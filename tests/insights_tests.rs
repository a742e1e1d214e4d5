//! Integration tests for derived views: agenda, signals, balance and friends

#![allow(deprecated)]

use chrono::{Duration, Utc};
use predicates::prelude::*;

mod common;
use common::{add_record, lifeos_cmd, workspace};

#[test]
fn test_upcoming_combines_sources() {
    let temp = workspace();
    let soon = Utc::now() + Duration::days(2);
    let later = Utc::now() + Duration::days(40);
    add_record(
        temp.path(),
        "events",
        &format!(r#"{{"title": "Dentist", "starts_at": "{}"}}"#, soon.to_rfc3339()),
    );
    add_record(
        temp.path(),
        "events",
        &format!(r#"{{"title": "Conference", "starts_at": "{}"}}"#, later.to_rfc3339()),
    );
    add_record(
        temp.path(),
        "family-events",
        &format!(
            r#"{{"title": "Recital", "date": "{}"}}"#,
            (Utc::now() + Duration::days(3)).date_naive()
        ),
    );

    lifeos_cmd()
        .current_dir(temp.path())
        .arg("upcoming")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dentist"))
        .stdout(predicate::str::contains("Family: Recital"))
        .stdout(predicate::str::contains("Conference").not());

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["upcoming", "--days", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Conference"));
}

#[test]
fn test_upcoming_and_stale_contacts_accept_huge_windows() {
    let temp = workspace();
    let far = Utc::now() + Duration::days(3650);
    add_record(
        temp.path(),
        "events",
        &format!(r#"{{"title": "Reunion", "starts_at": "{}"}}"#, far.to_rfc3339()),
    );
    add_record(temp.path(), "relationships", r#"{"name": "Silent Sam"}"#);

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["upcoming", "--days", "4294967295"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reunion"));

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["stale-contacts", "--days", "4294967295"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Silent Sam"));
}

#[test]
fn test_upcoming_empty() {
    let temp = workspace();

    lifeos_cmd()
        .current_dir(temp.path())
        .arg("upcoming")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing upcoming"));
}

#[test]
fn test_signals_by_category() {
    let temp = workspace();
    add_record(temp.path(), "signals", r#"{"title": "Rate cut", "category": "markets"}"#);
    add_record(temp.path(), "signals", r#"{"title": "Heatwave", "category": "climate"}"#);

    lifeos_cmd()
        .current_dir(temp.path())
        .arg("signals")
        .assert()
        .success()
        .stdout(predicate::str::contains("#markets"))
        .stdout(predicate::str::contains("#climate"));

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["signals", "--category", "climate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Heatwave"))
        .stdout(predicate::str::contains("Rate cut").not());

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["signals", "--category", "gossip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid signal category"));
}

#[test]
fn test_balance_with_date_range() {
    let temp = workspace();
    add_record(
        temp.path(),
        "transactions",
        r#"{"description": "Salary", "amount_cents": 300000, "flow": "income", "date": "2025-03-01"}"#,
    );
    add_record(
        temp.path(),
        "transactions",
        r#"{"description": "Rent", "amount_cents": 120050, "flow": "expense", "date": "2025-03-02"}"#,
    );
    add_record(
        temp.path(),
        "finance",
        r#"{"description": "Bonus", "amount_cents": 50000, "flow": "income", "date": "2025-04-15"}"#,
    );

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["balance", "--from", "01-03-2025", "--to", "31-03-2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Income:  3000.00"))
        .stdout(predicate::str::contains("Expense: 1200.50"))
        .stdout(predicate::str::contains("Net:     1799.50"));

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["balance", "--from", "2025-03-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DD-MM-YYYY"));
}

#[test]
fn test_stale_contacts() {
    let temp = workspace();
    let recent = (Utc::now() - Duration::days(5)).date_naive();
    add_record(
        temp.path(),
        "relationships",
        &format!(r#"{{"name": "Recent Rita", "last_contact": "{}"}}"#, recent),
    );
    add_record(temp.path(), "relationships", r#"{"name": "Silent Sam"}"#);

    lifeos_cmd()
        .current_dir(temp.path())
        .arg("stale-contacts")
        .assert()
        .success()
        .stdout(predicate::str::contains("Silent Sam"))
        .stdout(predicate::str::contains("Recent Rita").not());

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["stale-contacts", "--days", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recent Rita"));
}

#[test]
fn test_toggle_device() {
    let temp = workspace();
    let id = add_record(
        temp.path(),
        "devices",
        r#"{"name": "Lamp", "room": "Living room", "kind": "light"}"#,
    );

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["toggle", &id[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains("Living room / Lamp is now on"));

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["toggle", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("is now off"));
}

#[test]
fn test_check_host() {
    let temp = workspace();
    add_record(
        temp.path(),
        "guards",
        r#"{"pattern": "*.youtube.com", "category": "entertainment", "daily_limit_minutes": 20}"#,
    );

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["check", "www.YouTube.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is blocked by"))
        .stdout(predicate::str::contains("*.youtube.com"));

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["check", "docs.rs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("docs.rs is allowed"));
}

#[test]
fn test_logs_filter_and_clear() {
    let temp = workspace();
    add_record(temp.path(), "logs", r#"{"level": "info", "message": "Backup finished"}"#);
    add_record(temp.path(), "logs", r#"{"level": "error", "message": "Sync failed"}"#);

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["logs", "--min-level", "warn"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sync failed"))
        .stdout(predicate::str::contains("Backup finished").not());

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["logs", "--clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 2 log entries"));

    lifeos_cmd()
        .current_dir(temp.path())
        .arg("logs")
        .assert()
        .success()
        .stdout(predicate::str::contains("No records found"));
}

#[test]
fn test_overview_after_seed() {
    let temp = workspace();
    lifeos_cmd()
        .current_dir(temp.path())
        .arg("seed")
        .assert()
        .success();

    lifeos_cmd()
        .current_dir(temp.path())
        .arg("overview")
        .assert()
        .success()
        .stdout(predicate::str::contains("lifeos for tester"))
        .stdout(predicate::str::contains("Open tasks:"))
        .stdout(predicate::str::contains("relationships"));
}

#[test]
fn test_verbose_logs_go_to_stderr() {
    let temp = workspace();

    lifeos_cmd()
        .current_dir(temp.path())
        .args(["-vv", "add", "tasks", r#"{"title": "Quiet stdout"}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("event=").not())
        .stderr(predicate::str::contains("event=save"))
        .stderr(predicate::str::contains("Quiet stdout").not());
}
