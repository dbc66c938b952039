//! End-to-end checks for the read-side commands: list, stats, calendar, and
//! output modes.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const NOW: &str = "2024-01-02T12:00";

fn tkt_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tkt"));
    cmd.current_dir(dir);
    cmd.env("XDG_CONFIG_HOME", dir.join(".xdg"));
    cmd.env_remove("FORMAT");
    cmd.env("TICKETIME_NOW", NOW);
    cmd.env("TICKETIME_LOG", "error");
    cmd
}

fn json(dir: &Path, args: &[&str]) -> Value {
    let output = tkt_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("tkt should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

/// Project with two faults, a requirement, and an unscheduled special ticket.
fn seeded_project() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    tkt_cmd(dir.path()).arg("init").assert().success();
    for (number, category, case) in [
        ("B-200", "fault", "2024-01-02T08:30"),
        ("A-300", "requirement", "2024-01-02T09:00"),
        ("C-100", "fault", "2024-01-02T11:00"),
        ("S-900", "special", "2024-01-02T10:00"),
    ] {
        tkt_cmd(dir.path())
            .args(["create", number, "-c", category, "--case-at", case])
            .assert()
            .success();
    }
    dir
}

fn numbers(list: &Value) -> Vec<&str> {
    list.as_array()
        .expect("array")
        .iter()
        .map(|t| t["ticket_number"].as_str().expect("number"))
        .collect()
}

#[test]
fn list_filters_and_sorts() {
    let dir = seeded_project();

    let all = json(dir.path(), &["list"]);
    assert_eq!(numbers(&all), ["B-200", "A-300", "C-100", "S-900"]);

    let faults = json(dir.path(), &["list", "--category", "falla", "--sort", "number"]);
    assert_eq!(numbers(&faults), ["B-200", "C-100"]);

    let searched = json(dir.path(), &["list", "--search", "00", "--sort", "created-desc"]);
    assert_eq!(numbers(&searched), ["C-100", "S-900", "A-300", "B-200"]);

    // B-200 expired at 10:30; nothing else has.
    let overdue = json(dir.path(), &["list", "--overdue"]);
    assert_eq!(numbers(&overdue), ["B-200"]);
}

#[test]
fn list_text_mode_prints_tab_separated_rows() {
    let dir = seeded_project();
    let output = tkt_cmd(dir.path())
        .args(["list", "--format", "text", "--category", "fault"])
        .output()
        .expect("list");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "ID\tNUMBER\tCATEGORY\tEXPIRES\tSTATUS\tNEXT");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("\tB-200\tfault\t2024-01-02 10:30\texpired\t"));
    assert!(lines[2].contains("\tC-100\tfault\t2024-01-02 13:00\tpending\t"));
}

#[test]
fn empty_list_is_an_empty_array() {
    let dir = TempDir::new().expect("tempdir");
    tkt_cmd(dir.path()).arg("init").assert().success();
    assert_eq!(json(dir.path(), &["list"]), serde_json::json!([]));
}

#[test]
fn stats_counts_categories() {
    let dir = seeded_project();
    let stats = json(dir.path(), &["stats"]);
    assert_eq!(stats["total"], 4);
    assert_eq!(stats["fault"], 2);
    assert_eq!(stats["requirement"], 1);
    assert_eq!(stats["special"], 1);
    assert_eq!(stats["unscheduled"], 1);
    assert_eq!(stats["overdue"], 1);

    tkt_cmd(dir.path())
        .args(["stats", "--format", "text"])
        .assert()
        .success()
        .stdout("total=4 fault=2 requirement=1 special=1 unscheduled=1 overdue=1\n");
}

#[test]
fn pretty_show_lists_every_deadline() {
    let dir = seeded_project();
    tkt_cmd(dir.path())
        .args(["show", "A-300", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A-300 (requirement)"))
        .stdout(predicate::str::contains("Internal follow-up"))
        .stdout(predicate::str::contains("Case expiration"))
        .stdout(predicate::str::contains("2024-01-02 13:00"))
        .stdout(predicate::str::contains("1h 0m"));
}

#[test]
fn calendar_classifies_and_walks() {
    let dir = seeded_project();

    let friday = json(dir.path(), &["calendar", "2024-01-05T16:00", "--add", "120"]);
    assert_eq!(friday["working"], true);
    assert_eq!(friday["next_working"], "2024-01-05T16:00:00-05:00");
    assert_eq!(friday["walk"]["result"], "2024-01-08T09:00:00-05:00");

    let monday = json(dir.path(), &["calendar", "2024-01-08T09:00", "--subtract", "120"]);
    assert_eq!(monday["walk"]["minutes"], -120);
    assert_eq!(monday["walk"]["result"], "2024-01-05T16:00:00-05:00");

    let holiday = json(dir.path(), &["calendar", "2024-11-04T10:00", "--holidays"]);
    assert_eq!(holiday["working"], false);
    assert_eq!(holiday["next_working"], "2024-11-05T08:00:00-05:00");
    assert_eq!(holiday["holidays"], serde_json::json!(["2024-11-04", "2024-12-25"]));
}

#[test]
fn project_config_changes_the_calendar() {
    let dir = TempDir::new().expect("tempdir");
    tkt_cmd(dir.path()).arg("init").assert().success();
    fs::write(
        dir.path().join(".ticketime/config.toml"),
        "[calendar]\nday_start = \"09:00\"\nday_end = \"18:00\"\nholidays = [\"2024-01-08\"]\n",
    )
    .expect("write config");

    let report = json(dir.path(), &["calendar", "2024-01-05T17:30"]);
    assert_eq!(report["working"], true);

    let report = json(dir.path(), &["calendar", "2024-01-06T10:00"]);
    assert_eq!(report["next_working"], "2024-01-09T09:00:00-05:00");
}

#[test]
fn malformed_holiday_config_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    tkt_cmd(dir.path()).arg("init").assert().success();
    fs::write(
        dir.path().join(".ticketime/config.toml"),
        "[calendar]\nholidays = [\"2024-2-30\"]\n",
    )
    .expect("write config");

    tkt_cmd(dir.path())
        .args(["calendar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1003"))
        .stderr(predicate::str::contains("2024-2-30"));
}

#[test]
fn bad_offset_reports_calendar_code() {
    let dir = TempDir::new().expect("tempdir");
    tkt_cmd(dir.path()).arg("init").assert().success();
    fs::write(
        dir.path().join(".ticketime/config.toml"),
        "[calendar]\nutc_offset_minutes = 5000\n",
    )
    .expect("write config");

    tkt_cmd(dir.path())
        .args(["calendar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1004"))
        .stderr(predicate::str::contains("E1003").not());
}

#[test]
fn zone_label_follows_configured_offset() {
    let dir = TempDir::new().expect("tempdir");
    tkt_cmd(dir.path()).arg("init").assert().success();
    fs::write(
        dir.path().join(".ticketime/config.toml"),
        "[calendar]\nutc_offset_minutes = 60\n",
    )
    .expect("write config");
    tkt_cmd(dir.path())
        .args(["create", "INC-5", "-c", "fault", "--case-at", "2024-01-02T09:00"])
        .assert()
        .success();

    tkt_cmd(dir.path())
        .args(["show", "INC-5", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("UTC+01:00"))
        .stdout(predicate::str::contains("UTC-05:00").not());
}
