//! Tests for the `navsync` binary.

mod common;

use std::process::Command;

use common::{temp_file, GUARDED_SCENARIO};
use serde_json::Value;

fn navsync_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_navsync"));
    cmd.env_remove("NAVSYNC_LOG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    let output = navsync_cmd()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("replay"));
    assert!(stdout.contains("routes"));
}

#[test]
fn test_replay_prints_report() {
    let (dir, scenario) = temp_file("guarded.toml", GUARDED_SCENARIO);
    let config = dir.path().join("no-config.toml");

    let output = navsync_cmd()
        .arg("replay")
        .arg(&scenario)
        .arg("--config")
        .arg(&config)
        .output()
        .expect("Failed to execute command");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(report["final_url"], "/a");
    assert_eq!(report["actions"].as_array().map(Vec::len), Some(3));
    assert_eq!(report["actions"][2]["type"], "ROUTE_ERROR");
}

#[test]
fn test_state_key_override() {
    let (dir, scenario) = temp_file("guarded.toml", GUARDED_SCENARIO);

    let output = navsync_cmd()
        .arg("replay")
        .arg(&scenario)
        .arg("--config")
        .arg(dir.path().join("no-config.toml"))
        .args(["--state-key", "nav", "--serializer", "minimal"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(report["final_state"]["nav"]["navigationId"], 3);
}

#[test]
fn test_invalid_state_key_exits_with_error() {
    let (dir, scenario) = temp_file("guarded.toml", GUARDED_SCENARIO);

    let output = navsync_cmd()
        .arg("replay")
        .arg(&scenario)
        .arg("--config")
        .arg(dir.path().join("no-config.toml"))
        .args(["--state-key", "app.router"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must not contain '.'"), "stderr: {}", stderr);
}

#[test]
fn test_missing_scenario_exits_with_error() {
    let dir = tempfile::TempDir::new().unwrap();

    let output = navsync_cmd()
        .arg("replay")
        .arg(dir.path().join("missing.toml"))
        .arg("--config")
        .arg(dir.path().join("no-config.toml"))
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read scenario file"));
}

#[test]
fn test_routes_lists_table() {
    let (_dir, scenario) = temp_file("guarded.toml", GUARDED_SCENARIO);

    let output = navsync_cmd()
        .arg("routes")
        .arg(&scenario)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let routes: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(routes.as_array().map(Vec::len), Some(3));
    assert_eq!(routes[1]["can_activate"], false);
    assert_eq!(routes[2]["resolve_error"], "resolver failed for /d");
}
