//! Integration tests for `wifiprov config`.
//!
//! Every test points `WIFIPROV_CONFIG` or `--config` at a temp path so the
//! system config under `/etc` is never read.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn wifiprov() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wifiprov"));
    cmd.env("NO_COLOR", "1").env_remove("WIFIPROV_CONFIG");
    cmd
}

/// Returns a `TempDir` and the path string for a config file inside it.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("config.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

// ---------------------------------------------------------------------------
// `wifiprov config path`
// ---------------------------------------------------------------------------

#[test]
fn test_config_path_defaults_to_etc() {
    wifiprov()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/etc/wifiprov/config.yaml"));
}

#[test]
fn test_config_path_honours_env_var() {
    let (_dir, path) = temp_config_path();
    wifiprov()
        .args(["config", "path"])
        .env("WIFIPROV_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains(path.as_str()));
}

#[test]
fn test_config_flag_takes_precedence_over_env_var() {
    let (_dir, path) = temp_config_path();
    wifiprov()
        .args(["config", "path", "--config", &path])
        .env("WIFIPROV_CONFIG", "/tmp/elsewhere.yaml")
        .assert()
        .success()
        .stdout(predicate::str::contains(path.as_str()))
        .stdout(predicate::str::contains("elsewhere").not());
}

#[test]
fn test_config_path_works_with_invalid_file() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "access_point: [not, a, map]\n").unwrap();
    wifiprov()
        .args(["config", "path", "--json"])
        .env("WIFIPROV_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""path""#));
}

// ---------------------------------------------------------------------------
// `wifiprov config show`
// ---------------------------------------------------------------------------

#[test]
fn test_config_show_without_file_prints_defaults() {
    let (_dir, path) = temp_config_path();
    wifiprov()
        .args(["config", "show"])
        .env("WIFIPROV_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("ssid: MyDeviceSetup"))
        .stdout(predicate::str::contains("privilege: elevated"));
}

#[test]
fn test_config_show_merges_file_over_defaults() {
    let (_dir, path) = temp_config_path();
    std::fs::write(
        &path,
        "access_point:\n  ssid: KitchenSensor\n  channel: 11\n",
    )
    .unwrap();

    let output = wifiprov()
        .args(["config", "show", "--json"])
        .env("WIFIPROV_CONFIG", &path)
        .output()
        .expect("run wifiprov");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON");
    assert_eq!(value["access_point"]["ssid"], "KitchenSensor");
    assert_eq!(value["access_point"]["channel"], 11);
    assert_eq!(value["connectivity"]["port"], 80);
}

#[test]
fn test_config_show_applies_privilege_override() {
    let (_dir, path) = temp_config_path();
    wifiprov()
        .args(["config", "show", "--privilege", "inherited"])
        .env("WIFIPROV_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("privilege: inherited"));
}

#[test]
fn test_config_show_rejects_invalid_channel() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "access_point:\n  channel: 42\n").unwrap();
    wifiprov()
        .args(["config", "show"])
        .env("WIFIPROV_CONFIG", &path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("access_point.channel"));
}

#[test]
fn test_config_show_rejects_unparseable_yaml() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "access_point: [not, a, map]\n").unwrap();
    wifiprov()
        .args(["config", "show"])
        .env("WIFIPROV_CONFIG", &path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse"));
}

#[test]
fn test_config_show_json_error_is_machine_readable() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "access_point:\n  ssid: \"\"\n").unwrap();

    let output = wifiprov()
        .args(["config", "show", "--json"])
        .env("WIFIPROV_CONFIG", &path)
        .output()
        .expect("run wifiprov");
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("JSON");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "invalid_config");
    assert!(
        value["message"]
            .as_str()
            .expect("message")
            .contains("access_point.ssid must not be empty")
    );
}
