//! Command-line tests for the good-day-to-learn binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn bin() -> Command {
    Command::cargo_bin("good-day-to-learn").unwrap()
}

#[test]
fn test_help() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pomodoro timer"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_version() {
    bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_command_prints_help() {
    bin()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_completions_bash() {
    bin()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("good-day-to-learn"));
}

#[test]
fn test_run_rejects_out_of_range_work() {
    bin()
        .args(["run", "--work", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--work"));
}

#[test]
fn test_run_rejects_out_of_range_short_break() {
    bin()
        .args(["run", "--short-break", "61"])
        .assert()
        .failure();
}

#[test]
fn test_run_rejects_missing_music_file() {
    bin()
        .args(["run", "--music-file", "/nonexistent/rain.wav"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No such file"));
}

#[test]
fn test_run_quits_on_command() {
    bin()
        .args(["run", "--no-sound"])
        .write_stdin("status\nsettings\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Good Day To Learn"))
        .stdout(predicate::str::contains("Work Time - Interval 1/4"))
        .stdout(predicate::str::contains("Work time:    25 min"));
}

#[test]
fn test_run_reports_invalid_setting() {
    bin()
        .args(["run", "--no-sound"])
        .write_stdin("settings short=0\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Short break must be between 1 and 60 minutes",
        ));
}
