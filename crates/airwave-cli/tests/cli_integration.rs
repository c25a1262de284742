//! CLI Integration Tests
//!
//! These tests verify the CLI binary output formats and command behaviors.
//! Some tests require actual hardware and are marked with #[ignore].
//!
//! Run mock tests:
//! ```
//! cargo test --package airwave-cli --test cli_integration
//! ```
//!
//! Run hardware tests:
//! ```
//! AIRWAVE_DEVICE="AA:BB:CC:DD:EE:FF" cargo test --package airwave-cli --test cli_integration -- --ignored --nocapture
//! ```

use std::env;
use std::path::Path;
use std::process::{Command, Output};

/// Run the airwave binary with a clean environment and an isolated config.
fn run_airwave(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_airwave"))
        .env_remove("AIRWAVE_DEVICE")
        .env_remove("NO_COLOR")
        .env("AIRWAVE_CONFIG", config)
        .args(args)
        .output()
        .expect("Failed to run airwave binary")
}

/// Run with a config path that does not exist yet.
fn run_fresh(args: &[&str]) -> (tempfile::TempDir, Output) {
    let dir = tempfile::tempdir().unwrap();
    let output = run_airwave(&dir.path().join("config.toml"), args);
    (dir, output)
}

/// Get device from environment
fn get_device() -> Option<String> {
    env::var("AIRWAVE_DEVICE").ok().filter(|s| !s.is_empty())
}

// =============================================================================
// Help and Version Tests (no hardware required)
// =============================================================================

#[test]
fn test_help_command() {
    let (_dir, output) = run_fresh(&["--help"]);

    assert!(output.status.success(), "Help should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Airthings"), "Help should mention Airthings");
    for command in ["scan", "read", "watch", "config", "completions"] {
        assert!(stdout.contains(command), "Help should list {command} command");
    }
}

#[test]
fn test_version_command() {
    let (_dir, output) = run_fresh(&["--version"]);

    assert!(output.status.success(), "Version should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("airwave "), "unexpected version: {stdout}");
}

#[test]
fn test_subcommand_help() {
    for (subcommand, flag) in [
        ("scan", "--all"),
        ("read", "--imperial"),
        ("watch", "--interval"),
    ] {
        let (_dir, output) = run_fresh(&[subcommand, "--help"]);
        assert!(output.status.success(), "{subcommand} --help should succeed");
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains(flag), "{subcommand} help should mention {flag}");
    }
}

#[test]
fn test_completions() {
    let (_dir, output) = run_fresh(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("airwave"));
}

// =============================================================================
// Config Tests (no hardware required)
// =============================================================================

#[test]
fn test_config_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let output = run_airwave(&path, &["config", "path"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), path.display().to_string());
}

#[test]
fn test_config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let init = run_airwave(&path, &["config", "init"]);
    assert!(init.status.success(), "init failed: {:?}", init);
    assert!(path.exists());

    let show = run_airwave(&path, &["config", "show"]);
    assert!(show.status.success());
    let stdout = String::from_utf8_lossy(&show.stdout);
    assert!(stdout.contains("[[sensors]]"));
    assert!(stdout.contains("AA:BB:CC:DD:EE:FF"));

    // A second init must not clobber the file without --force
    let again = run_airwave(&path, &["config", "init"]);
    assert!(!again.status.success());
    let forced = run_airwave(&path, &["config", "init", "--force"]);
    assert!(forced.status.success());
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[[sensors]]\nmac = \"AA:BB:CC:DD:EE:FF\"\nmin_update_interval = 1\n",
    )
    .unwrap();

    let output = run_airwave(&path, &["config", "show"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("min_update_interval"), "stderr: {stderr}");
}

// =============================================================================
// Argument Errors (no hardware required)
// =============================================================================

#[test]
fn test_read_without_device_fails() {
    let (_dir, output) = run_fresh(&["read"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No device specified"), "stderr: {stderr}");
}

#[test]
fn test_read_rejects_bad_address() {
    let (_dir, output) = run_fresh(&["read", "--device", "kitchen"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("mac"), "stderr: {stderr}");
}

#[test]
fn test_watch_rejects_short_interval() {
    let (_dir, output) = run_fresh(&["watch", "--device", "AA:BB:CC:DD:EE:FF", "-i", "1"]);
    assert!(!output.status.success());
}

#[test]
fn test_invalid_subcommand() {
    let (_dir, output) = run_fresh(&["history"]);
    assert!(!output.status.success());
}

// =============================================================================
// Hardware Tests
// =============================================================================

#[test]
#[ignore = "requires BLE hardware"]
fn test_scan_json_output() {
    let (_dir, output) = run_fresh(&["scan", "--timeout", "5", "--format", "json"]);
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("scan output should be JSON");
    assert!(json["count"].is_u64());
    assert!(json["devices"].is_array());
}

#[test]
#[ignore = "requires BLE hardware and device"]
fn test_read_json_output() {
    let Some(device) = get_device() else {
        eprintln!("AIRWAVE_DEVICE not set, skipping");
        return;
    };
    let (_dir, output) = run_fresh(&["read", "--device", &device, "--format", "json"]);
    assert!(output.status.success(), "read failed: {:?}", output);

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("read output should be JSON");
    assert!(json["values"].is_array());
    assert!(json["updated_at"].is_string());
}

#[test]
#[ignore = "requires BLE hardware and device"]
fn test_read_csv_no_header() {
    let Some(device) = get_device() else {
        eprintln!("AIRWAVE_DEVICE not set, skipping");
        return;
    };
    let (_dir, output) = run_fresh(&[
        "read",
        "--device",
        &device,
        "--format",
        "csv",
        "--no-header",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.starts_with("timestamp,"));
    assert!(stdout.lines().all(|l| l.split(',').count() == 6));
}

#[test]
#[ignore = "requires BLE hardware and device - slow"]
fn test_watch_limited_count() {
    let Some(device) = get_device() else {
        eprintln!("AIRWAVE_DEVICE not set, skipping");
        return;
    };
    let (_dir, output) = run_fresh(&[
        "watch", "--device", &device, "--interval", "10", "--count", "2",
    ]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Completed 2 polls."));
}
