//! Integration tests for banker CLI

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// Command isolated from the user's config, environment and terminal
fn banker(home: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_banker"));
    command
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("BANKER_OUTPUT", "plain")
        .env("BANKER_COLOR", "never")
        .env_remove("BANKER_SCENARIO")
        .env_remove("RUST_LOG");
    command
}

fn run(args: &[&str]) -> Output {
    let home = TempDir::new().unwrap();
    banker(home.path())
        .args(args)
        .output()
        .expect("Failed to execute banker")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_cli_version() {
    let output = run(&["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("banker"));
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Banker's-algorithm deadlock avoidance"));
    assert!(text.contains("check"));
    assert!(text.contains("request"));
    assert!(text.contains("menu"));
}

#[test]
fn test_cli_invalid_command() {
    let output = run(&["invalid-command"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unrecognized subcommand"));
}

#[test]
fn test_request_requires_units() {
    let output = run(&["request", "1"]);
    assert!(!output.status.success());
}

#[test]
fn test_show_prints_state_block() {
    let output = run(&["show"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("n = 5 # Number of processes\nm = 3 # Number of resources types\n"));
    assert!(text.contains("# Need Matrix (Max - Allocation)\n[[7, 4, 3],\n [1, 2, 2],"));
}

#[test]
fn test_check_reports_safe_sequence() {
    let output = run(&["check"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "System is in a SAFE state.\nSafe Sequence: [1, 3, 4, 0, 2]\n\n"
    );
}

#[test]
fn test_denied_requests_exit_zero() {
    let output = run(&["request", "1", "4", "0", "0"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Error: Request exceeds remaining need for P1."));

    let output = run(&["request", "4", "4", "0", "0"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Resources not available. Process P4 must wait."));
}

#[test]
fn test_granted_request_prints_new_state() {
    let output = run(&["request", "1", "1", "0", "2"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("Request granted.\nSafe Sequence: [1, 3, 4, 0, 2]\n\n"));
    assert!(text.contains("# Available Vector (initially total resources available)\n[2, 3, 0]\n"));
}

#[test]
fn test_malformed_request_is_an_error() {
    let output = run(&["request", "9", "0", "0", "0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error:"));

    let output = run(&["request", "0", "1", "0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("request.dimension_mismatch"));
}

#[test]
fn test_verify_sequence() {
    let output = run(&["verify", "1", "3", "4", "0", "2"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("[1, 3, 4, 0, 2] is a safe sequence."));

    let output = run(&["verify", "0", "1", "2", "3", "4"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("is not a safe sequence."));
    assert!(text.contains("P0 cannot finish at step 0"));
}

#[test]
fn test_json_output() {
    let output = run(&["--json", "check"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["type"], "safety");
    assert_eq!(value["status"], "safe");
    assert_eq!(value["sequence"], serde_json::json!([1, 3, 4, 0, 2]));
}

#[test]
fn test_json_request_outcome() {
    let output = run(&["--json", "request", "4", "4", "0", "0"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["type"], "request");
    assert_eq!(value["outcome"], "not_available");
    assert_eq!(value["available"], 3);
    assert_eq!(value["state"]["available"], serde_json::json!([3, 3, 2]));
}

#[test]
fn test_scenario_file() {
    let home = TempDir::new().unwrap();
    let scenario = home.path().join("deadlock.toml");
    std::fs::write(
        &scenario,
        "available = [0]\nmaximum = [[2], [2]]\nallocation = [[1], [1]]\n",
    )
    .unwrap();

    let output = banker(home.path())
        .arg("--scenario")
        .arg(&scenario)
        .arg("check")
        .output()
        .expect("Failed to execute banker");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "System is in an UNSAFE state.\n\n");
}

#[test]
fn test_scenario_from_environment() {
    let home = TempDir::new().unwrap();
    let scenario = home.path().join("small.toml");
    std::fs::write(
        &scenario,
        "processes = 1\nresources = 2\navailable = [1, 1]\nmaximum = [[1, 1]]\nallocation = [[0, 0]]\n",
    )
    .unwrap();

    let output = banker(home.path())
        .env("BANKER_SCENARIO", &scenario)
        .arg("check")
        .output()
        .expect("Failed to execute banker");
    assert!(output.status.success());
    assert!(stdout(&output).contains("Safe Sequence: [0]"));
}

#[test]
fn test_invalid_scenario_fails() {
    let home = TempDir::new().unwrap();
    let scenario = home.path().join("bad.toml");
    std::fs::write(
        &scenario,
        "available = [1]\nmaximum = [[1]]\nallocation = [[2]]\n",
    )
    .unwrap();

    let output = banker(home.path())
        .arg("--scenario")
        .arg(&scenario)
        .arg("show")
        .output()
        .expect("Failed to execute banker");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error:"));

    let output = run(&["--scenario", "/nonexistent/banker.toml", "show"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_interactive_menu() {
    let home = TempDir::new().unwrap();
    let mut child = banker(home.path())
        .arg("menu")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute banker");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"1\n2\n7\n2\n1\n1 0 2\n2\n0\n0 2 0\n9\n3\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.starts_with("n = 5 # Number of processes\n"));
    assert!(text.contains("Banker's Algorithm Test Menu:\n1. Check for safe sequence\n"));
    assert!(text.contains("System is in a SAFE state.\nSafe Sequence: [1, 3, 4, 0, 2]\n\n"));
    assert!(text.contains("Enter process ID (0-4): Invalid PID.\n\n"));
    assert!(text.contains("Enter request for P1 (3 integers): Request granted.\n"));
    assert!(text.contains("Error: Request would lead to an unsafe state.\n\n"));
    assert!(text.contains("Invalid choice.\n\n"));
    assert!(text.ends_with("Enter your choice (1-3): "));
}

#[test]
fn test_menu_stops_at_end_of_input() {
    let home = TempDir::new().unwrap();
    let mut child = banker(home.path())
        .arg("menu")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to execute banker");

    child.stdin.take().unwrap().write_all(b"2\n1\n1 0").unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert!(!stdout(&output).contains("Request granted."));
}
