//! Integration tests for argument parsing, help and version output.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn wifiprov() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wifiprov"));
    cmd.env("NO_COLOR", "1");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    wifiprov().assert().code(2).stderr(predicate::str::contains(
        "Headless wifi provisioning through a temporary access point",
    ));
}

#[test]
fn test_cli_help_flag_lists_commands() {
    wifiprov()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("service"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    wifiprov()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wifiprov"));
}

#[test]
fn test_version_command_shows_version() {
    wifiprov()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wifiprov 0.3.0"));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = wifiprov()
        .args(["version", "--json"])
        .output()
        .expect("run wifiprov");
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["version"], "0.3.0");
}

#[test]
fn test_version_ignores_unreadable_config() {
    wifiprov()
        .args(["--config", "/nonexistent/dir/that/is/not/there.yaml", "version"])
        .assert()
        .success();
}

#[test]
fn test_no_color_env_accepts_conventional_values() {
    for value in ["1", "true", "yes", "0", ""] {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wifiprov"));
        cmd.env("NO_COLOR", value)
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains("wifiprov 0.3.0"));
    }
}

#[test]
fn test_no_color_flag_without_env() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wifiprov"));
    cmd.env_remove("NO_COLOR")
        .args(["--no-color", "version"])
        .assert()
        .success();
}

// --- Argument validation ---

#[test]
fn test_unknown_privilege_mode_is_rejected_by_parser() {
    wifiprov()
        .args(["--privilege", "root", "status"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown privilege mode 'root'"));
}

#[test]
fn test_service_requires_a_unit_name() {
    wifiprov()
        .args(["service", "enable"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<UNIT>"));
}

#[test]
fn test_service_help_lists_actions() {
    wifiprov()
        .args(["service", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("enable"))
        .stdout(predicate::str::contains("disable"))
        .stdout(predicate::str::contains("restart"))
        .stdout(predicate::str::contains("reload"));
}
