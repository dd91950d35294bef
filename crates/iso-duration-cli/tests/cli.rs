use assert_cmd::Command;
use predicates::prelude::*;

const REFERENCE: &str = "2023-01-01T12:00:00Z";

fn isodur() -> Command {
    let mut cmd = Command::cargo_bin("isodur").unwrap();
    cmd.env_remove("ISODUR_REFERENCE")
        .env_remove("ISODUR_TIMEZONE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_prints_total_seconds() {
    isodur()
        .args(["--reference", REFERENCE, "PT1.5H"])
        .assert()
        .success()
        .stdout("5400\n");
}

#[test]
fn test_calendar_months_from_reference() {
    // Jan (31) + Feb (28)
    isodur()
        .args(["--reference", REFERENCE, "P2M"])
        .assert()
        .success()
        .stdout(format!("{}\n", 59 * 86_400));
}

#[test]
fn test_negative_duration_as_positional() {
    isodur()
        .args(["--reference", REFERENCE, "-P1DT2H"])
        .assert()
        .success()
        .stdout("-93600\n");
}

#[test]
fn test_human_format() {
    isodur()
        .args(["--reference", REFERENCE, "--format", "human", "P1DT2H30M"])
        .assert()
        .success()
        .stdout("1 day, 2 hours, 30 minutes\n");
}

#[test]
fn test_json_format() {
    let output = isodur()
        .args(["--reference", REFERENCE, "--format", "json", "P1Y"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["total_seconds"], 365 * 86_400);
    assert_eq!(report["days"], 365);
    assert_eq!(report["adjusted_utc"], "2024-01-01T12:00:00+00:00");
    assert_eq!(report["timezone"], "UTC");
}

#[test]
fn test_reference_from_env() {
    isodur()
        .env("ISODUR_REFERENCE", "2020-02-01T12:00:00Z")
        .arg("P1M")
        .assert()
        .success()
        .stdout(format!("{}\n", 29 * 86_400));
}

#[test]
fn test_timezone_keeps_wall_clock_across_dst() {
    isodur()
        .args([
            "--reference",
            "2026-03-07T22:00:00-05:00",
            "--timezone",
            "America/New_York",
            "P1D",
        ])
        .assert()
        .success()
        .stdout(format!("{}\n", 23 * 3600));
}

#[test]
fn test_timezone_reference_in_repeated_hour() {
    // 01:30 EDT on the US fall-back day; the next day's 01:30 is EST
    isodur()
        .args([
            "--reference",
            "2026-11-01T01:30:00-04:00",
            "--timezone",
            "America/New_York",
            "--format",
            "json",
            "P1D",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_seconds\": 90000"))
        .stdout(predicate::str::contains("2026-11-02T01:30:00-05:00"));
}

#[test]
fn test_timezone_month_step_through_repeated_hour() {
    isodur()
        .args([
            "--reference",
            "2026-10-01T01:30:00-04:00",
            "--timezone",
            "America/New_York",
            "P1M1D",
        ])
        .assert()
        .success()
        .stdout(format!("{}\n", 32 * 86_400 + 3600));
}

#[test]
fn test_invalid_duration_fails() {
    isodur()
        .args(["--reference", REFERENCE, "P1X"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Invalid duration format"));
}

#[test]
fn test_fractional_month_fails() {
    isodur()
        .args(["--reference", REFERENCE, "P1.5M"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Fractional months are not supported"));
}

#[test]
fn test_invalid_timezone_fails() {
    isodur()
        .args(["--reference", REFERENCE, "--timezone", "Invalid/Zone", "P1D"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn test_defaults_to_now() {
    // Time-only durations do not depend on the reference
    isodur().arg("PT30S").assert().success().stdout("30\n");
}
