//! Integration tests for the `freetime` CLI binary.
//!
//! These use `assert_cmd` and `predicates` to drive the free, group and
//! intersect subcommands through the actual binary, against JSON fixtures.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn freetime() -> Command {
    Command::cargo_bin("freetime").unwrap()
}

/// Run the command, assert success and parse stdout as a JSON array.
fn run_json(cmd: &mut Command) -> Vec<Value> {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice::<Vec<Value>>(&output).expect("stdout must be a JSON array")
}

fn span(slot: &Value) -> (&str, &str, i64) {
    (
        slot["start"].as_str().unwrap(),
        slot["end"].as_str().unwrap(),
        slot["duration"].as_i64().unwrap(),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// free
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn free_from_file() {
    let slots = run_json(freetime().args([
        "free",
        "-e",
        &fixture("events.json"),
        "--now",
        "2026-03-16T08:00",
        "--days",
        "2",
    ]));

    // The 17th is a holiday; the broken record is skipped.
    assert_eq!(slots.len(), 3);
    assert_eq!(span(&slots[0]), ("2026-03-16T08:00", "2026-03-16T09:00", 60));
    assert_eq!(span(&slots[1]), ("2026-03-16T09:30", "2026-03-16T12:00", 150));
    assert_eq!(span(&slots[2]), ("2026-03-16T13:00", "2026-03-16T21:00", 480));
}

#[test]
fn free_from_stdin() {
    let events = std::fs::read_to_string(fixture("events.json")).unwrap();

    let slots = run_json(
        freetime()
            .args(["free", "--now", "2026-03-16T08:00", "--days", "2"])
            .write_stdin(events),
    );

    assert_eq!(slots.len(), 3);
}

#[test]
fn free_rounds_second_precision_bounds_inward() {
    let events = r#"[{"start":{"dateTime":"2026-03-16T09:00"},
                      "end":{"dateTime":"2026-03-16T10:00:30"}}]"#;

    let slots = run_json(
        freetime()
            .args(["free", "--now", "2026-03-16T06:00", "--days", "1"])
            .write_stdin(events),
    );

    assert_eq!(slots.len(), 2);
    assert_eq!(span(&slots[0]), ("2026-03-16T07:00", "2026-03-16T09:00", 120));
    assert_eq!(span(&slots[1]), ("2026-03-16T10:01", "2026-03-16T21:00", 659));
}

#[test]
fn free_with_min_duration() {
    let slots = run_json(freetime().args([
        "free",
        "-e",
        &fixture("events.json"),
        "--now",
        "2026-03-16T08:00",
        "--days",
        "2",
        "--min-duration",
        "120",
    ]));

    assert_eq!(slots.len(), 2);
    assert_eq!(span(&slots[0]).2, 150);
    assert_eq!(span(&slots[1]).2, 480);
}

#[test]
fn free_empty_calendar_covers_every_day() {
    let slots = run_json(
        freetime()
            .args(["free", "--now", "2026-03-16T06:00"])
            .write_stdin("[]"),
    );

    assert_eq!(slots.len(), 7, "default horizon is a week");
    assert_eq!(span(&slots[6]), ("2026-03-22T07:00", "2026-03-22T21:00", 840));
}

#[test]
fn free_to_output_file() {
    let out = std::env::temp_dir().join(format!("freetime-out-{}.json", std::process::id()));
    let out_path = out.to_str().unwrap();

    freetime()
        .args(["free", "--now", "2026-03-16T20:00", "--days", "1", "-o", out_path])
        .write_stdin("[]")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written: Vec<Value> =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    std::fs::remove_file(&out).ok();
    assert_eq!(written.len(), 1);
    assert_eq!(span(&written[0]), ("2026-03-16T20:00", "2026-03-16T21:00", 60));
}

#[test]
fn free_with_config_file() {
    // UTC, 09:00-17:00, one day.
    let slots = run_json(freetime().args([
        "--config",
        &fixture("engine.toml"),
        "free",
        "-e",
        &fixture("events.json"),
        "--now",
        "2026-03-16T08:00",
    ]));

    // Lunch is 09:00-10:00 UTC.
    assert_eq!(slots.len(), 1);
    assert_eq!(span(&slots[0]), ("2026-03-16T10:00", "2026-03-16T17:00", 420));
}

#[test]
fn utc_offset_flag_overrides_config() {
    let slots = run_json(
        freetime()
            .args([
                "--utc-offset-minutes",
                "-300",
                "free",
                "--now",
                "2026-03-16T00:00:00Z",
                "--days",
                "1",
            ])
            .write_stdin("[]"),
    );

    // 00:00Z is 19:00 on the 15th at UTC-5.
    assert_eq!(span(&slots[0]), ("2026-03-15T19:00", "2026-03-15T21:00", 120));
}

#[test]
fn verbose_logs_to_stderr() {
    freetime()
        .args(["-v", "free", "--now", "2026-03-16T08:00", "--days", "1"])
        .write_stdin("[]")
        .assert()
        .success()
        .stderr(predicate::str::contains("computed day"));
}

// ─────────────────────────────────────────────────────────────────────────────
// group / intersect
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn group_from_member_events() {
    let slots = run_json(freetime().args([
        "group",
        "--member",
        &fixture("alice.json"),
        "--member",
        &fixture("bob.json"),
        "--now",
        "2026-03-16T08:00",
        "--days",
        "1",
    ]));

    // Alice free 08:00-13:00, Bob free 10:00-21:00.
    assert_eq!(slots.len(), 1);
    assert_eq!(span(&slots[0]), ("2026-03-16T10:00", "2026-03-16T13:00", 180));
}

#[test]
fn intersect_stored_slots() {
    let slots = run_json(freetime().args([
        "intersect",
        "--slots",
        &fixture("alice-free.json"),
        "--slots",
        &fixture("bob-free.json"),
        "--reference-date",
        "2026-03-16",
    ]));

    assert_eq!(slots.len(), 1);
    assert_eq!(span(&slots[0]), ("2026-03-16T10:00", "2026-03-16T12:00", 120));
}

#[test]
fn intersect_single_member_is_identity() {
    let slots = run_json(freetime().args([
        "intersect",
        "--slots",
        &fixture("alice-free.json"),
        "--reference-date",
        "2026-03-16",
    ]));

    assert_eq!(slots.len(), 2);
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn zero_day_horizon_fails() {
    freetime()
        .args(["free", "--now", "2026-03-16T08:00", "--days", "0"])
        .write_stdin("[]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to compute free time"));
}

#[test]
fn invalid_now_fails() {
    freetime()
        .args(["free", "--now", "next tuesday"])
        .write_stdin("[]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --now"));
}

#[test]
fn events_not_an_array_fails() {
    freetime()
        .args(["free", "--now", "2026-03-16T08:00"])
        .write_stdin(r#"{"items": []}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse calendar events"));
}

#[test]
fn missing_events_file_fails() {
    freetime()
        .args(["free", "-e", "/nonexistent/events.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn invalid_config_fails() {
    freetime()
        .args(["--config", &fixture("bad-engine.toml"), "free"])
        .write_stdin("[]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid engine configuration"));
}

#[test]
fn intersect_bad_reference_date_fails() {
    freetime()
        .args([
            "intersect",
            "--slots",
            &fixture("bob-free.json"),
            "--reference-date",
            "16/03/2026",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid datetime"));
}

#[test]
fn subcommand_required() {
    freetime().assert().failure();
}
