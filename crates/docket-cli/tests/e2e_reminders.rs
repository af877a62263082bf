//! E2E CLI tests covering:
//! - Post-save reminder notices from `dk update`
//! - One-shot scans (`dk reminders`) and the permission opt-out
//! - Upcoming adjournment listings (`dk upcoming`) and dashboard alerts
//! - Interval scanning (`dk watch --ticks`)

use assert_cmd::Command;
use chrono::{Duration, Utc};
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

fn dk_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dk"));
    cmd.current_dir(dir);
    cmd.env("DOCKET_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join(".xdg"));
    cmd.env_remove("DOCKET_USER");
    cmd.env_remove("FORMAT");
    cmd
}

fn setup() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    dk_cmd(dir.path()).args(["init"]).assert().success();
    dir
}

fn json_of(dir: &Path, args: &[&str]) -> Value {
    let output = dk_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("dk should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("--json should produce valid JSON")
}

fn days_from_today(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days)).to_string()
}

/// Record an ongoing update on `case` adjourned `days` from today.
fn adjourn(dir: &Path, case: &str, days: i64, position: &str) -> Value {
    let date = days_from_today(-1);
    let adjourn = days_from_today(days);
    json_of(
        dir,
        &[
            "update",
            case,
            "--date",
            &date,
            "--action",
            "Hearing held",
            "--position",
            position,
            "--status",
            "ongoing",
            "--adjourn",
            &adjourn,
        ],
    )
}

// ---------------------------------------------------------------------------
// Post-save scan
// ---------------------------------------------------------------------------

#[test]
fn update_inside_window_emits_a_notice() {
    let dir = setup();
    let date = days_from_today(-1);
    let soon = days_from_today(3);

    dk_cmd(dir.path())
        .args([
            "update",
            "case-001",
            "--date",
            &date,
            "--action",
            "Hearing held",
            "--position",
            "Awaiting ruling",
            "--status",
            "ongoing",
            "--adjourn",
            &soon,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Update saved"))
        .stdout(predicate::str::contains(
            "Upcoming adjournment for 2025-LCM-0001",
        ))
        .stdout(predicate::str::contains(format!("{soon}: Awaiting ruling")));
}

#[test]
fn update_outside_window_emits_nothing() {
    let saved = adjourn(setup().path(), "case-001", 10, "Later");
    assert_eq!(saved["reminders"].as_array().map(Vec::len), Some(0));
}

#[test]
fn update_with_no_notify_emits_nothing() {
    let dir = setup();
    let date = days_from_today(-1);
    let soon = days_from_today(2);
    let saved = json_of(
        dir.path(),
        &[
            "update",
            "case-002",
            "--date",
            &date,
            "--action",
            "Mention",
            "--position",
            "Fixed for trial",
            "--status",
            "court",
            "--adjourn",
            &soon,
            "--no-notify",
        ],
    );
    assert_eq!(saved["reminders"].as_array().map(Vec::len), Some(0));
}

// ---------------------------------------------------------------------------
// One-shot scans
// ---------------------------------------------------------------------------

#[test]
fn reminders_groups_notices_per_case() {
    let dir = setup();
    adjourn(dir.path(), "case-001", 1, "First hearing");
    adjourn(dir.path(), "case-001", 5, "Second hearing");
    adjourn(dir.path(), "case-002", 7, "Trial");

    let report = json_of(dir.path(), &["reminders"]);
    assert_eq!(report["enabled"], true);
    assert_eq!(report["window_days"], 7);

    let notices = report["notices"].as_array().expect("notices");
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0]["case_id"], "case-001");
    let body = notices[0]["body"].as_str().expect("body");
    assert!(body.contains("First hearing"));
    assert!(body.contains("Second hearing"));
    assert_eq!(notices[1]["case_id"], "case-002");
}

#[test]
fn reminders_without_permission_are_off() {
    let dir = setup();
    adjourn(dir.path(), "case-001", 1, "Hearing");

    let report = json_of(dir.path(), &["reminders", "--no-notify"]);
    assert_eq!(report["enabled"], false);
    assert_eq!(report["notices"].as_array().map(Vec::len), Some(0));
}

// ---------------------------------------------------------------------------
// Upcoming and dashboard
// ---------------------------------------------------------------------------

#[test]
fn upcoming_empty_reports_window() {
    let dir = setup();
    dk_cmd(dir.path())
        .args(["upcoming"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No upcoming adjournments in the next 30 days",
        ));
}

#[test]
fn upcoming_lists_entries_soonest_first() {
    let dir = setup();
    adjourn(dir.path(), "case-002", 20, "Trial");
    adjourn(dir.path(), "case-001", 4, "Ruling");
    adjourn(dir.path(), "case-001", 45, "Too far");

    let upcoming = json_of(dir.path(), &["upcoming"]);
    assert_eq!(upcoming["days"], 30);
    let positions: Vec<&str> = upcoming["entries"]
        .as_array()
        .expect("entries")
        .iter()
        .filter_map(|e| e["position"].as_str())
        .collect();
    assert_eq!(positions, ["Ruling", "Trial"]);
}

#[test]
fn dashboard_flags_imminent_hearings() {
    let dir = setup();
    adjourn(dir.path(), "case-002", 2, "Mention");

    let dashboard = json_of(dir.path(), &["dashboard"]);
    let rows = dashboard["rows"].as_array().expect("rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["case_id"], "case-002");

    let alerts = dashboard["alerts"].as_array().expect("alerts");
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["case_number"], "2025-LCM-0002");
    assert_eq!(alerts[0]["days_left"], 2);
}

// ---------------------------------------------------------------------------
// Watch
// ---------------------------------------------------------------------------

#[test]
fn watch_stops_after_requested_ticks() {
    let dir = setup();
    adjourn(dir.path(), "case-001", 1, "Hearing");

    let output = dk_cmd(dir.path())
        .args(["watch", "--interval", "1", "--ticks", "2", "--json"])
        .timeout(std::time::Duration::from_secs(30))
        .output()
        .expect("watch should not crash");
    assert!(output.status.success());

    let lines: Vec<Value> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("JSON line"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|n| n["case_id"] == "case-001"));
}
