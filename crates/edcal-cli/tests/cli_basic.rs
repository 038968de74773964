//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs.

use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-p", "edcal-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (code, stdout, stderr)
}

#[test]
fn test_system_generate() {
    let (code, stdout, _) = run_cli(&["system", "generate", "2025"]);
    assert_eq!(code, 0, "system generate failed");

    let events: serde_json::Value = serde_json::from_str(&stdout).expect("JSON output");
    let events = events.as_array().expect("JSON array");
    assert!(!events.is_empty());
    assert!(events.iter().all(|e| e["kind"] == "system"));
}

#[test]
fn test_system_resolve_dynamic_rule() {
    let (code, stdout, _) = run_cli(&["system", "resolve", "mothers_day", "2025"]);
    assert_eq!(code, 0, "system resolve failed");
    assert!(stdout.contains("2025-05-11"), "got: {stdout}");
}

#[test]
fn test_system_resolve_unknown_key_fails() {
    let (code, _, stderr) = run_cli(&["system", "resolve", "nope", "2025"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Unknown template key"));
}

#[test]
fn test_event_list() {
    let (code, stdout, _) = run_cli(&["event", "list"]);
    assert_eq!(code, 0, "event list failed");
    assert!(serde_json::from_str::<serde_json::Value>(&stdout).is_ok());
}

#[test]
fn test_book_example_roundtrips_through_preview() {
    let (code, stdout, _) = run_cli(&["book", "example"]);
    assert_eq!(code, 0, "book example failed");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    std::fs::write(&path, stdout).unwrap();

    let (code, stdout, _) = run_cli(&["book", "preview", path.to_str().unwrap()]);
    assert_eq!(code, 0, "book preview failed");
    let events: serde_json::Value = serde_json::from_str(&stdout).expect("JSON output");
    assert_eq!(events.as_array().map(|a| a.len()), Some(1));
    assert_eq!(events[0]["origin"], "book_task");
}

#[test]
fn test_sync_status() {
    let (code, stdout, _) = run_cli(&["sync", "status"]);
    assert_eq!(code, 0, "sync status failed");
    assert!(stdout.contains("is_connected"));
}

#[test]
fn test_remind_upcoming() {
    let (code, stdout, _) = run_cli(&["remind", "upcoming", "--hours", "1"]);
    assert_eq!(code, 0, "remind upcoming failed");
    assert!(serde_json::from_str::<serde_json::Value>(&stdout).is_ok());
}
