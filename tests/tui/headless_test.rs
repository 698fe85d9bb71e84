//! Integration tests for headless mode plumbing.

use super::common::{run_events, run_headless};

#[test]
fn test_headless_basic_execution() {
    let (code, stdout) = run_events("key:esc");

    assert_eq!(code, 0, "Expected exit code 0");
    assert!(
        stdout.contains("Events: 1 executed"),
        "Should show events executed"
    );
    assert!(stdout.contains("Search for a location"));
}

#[test]
fn test_headless_type_event_json() {
    let (code, stdout, _) = run_headless(&["--events", "type:Lyon", "--output", "json"]);

    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["state"]["query"], "Lyon");
    assert_eq!(parsed["state"]["fetch_count"], 0);
    assert_eq!(parsed["events_executed"], 1);
}

#[test]
fn test_headless_assertion_failure_exit_code() {
    let (code, stdout) = run_events("type:Lyon,assert:contains:Tokyo");

    assert_eq!(code, 1, "Failed assertion should exit 1");
    assert!(stdout.contains("Assertions: 0 passed, 1 failed"));
    assert!(stdout.contains("FAILED assert:contains:Tokyo"));
}

#[test]
fn test_headless_fail_fast() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "assert:contains:Tokyo,type:Lyon",
        "--fail-fast",
        "--output",
        "json",
    ]);

    assert_eq!(code, 1);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["events_executed"], 1);
    assert_eq!(parsed["state"]["query"], "");
}

#[test]
fn test_headless_frames_output() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "type:Par,wait:500ms",
        "--output",
        "frames",
    ]);

    assert_eq!(code, 0);
    assert!(stdout.contains("=== FRAME 0 (initial) ==="));
    assert!(stdout.contains("=== FRAME 1 (type:Par) ==="));
    assert!(stdout.contains("=== FRAME 2 (wait:500ms) ==="));
    assert!(stdout.contains("Total: 3 frames"));
}

#[test]
fn test_headless_script_file() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("pick.txt");
    std::fs::write(
        &script,
        "# Pick Kreuzberg\ntype:Kreuz\nwait:500ms\nkey:enter\nassert:state:chosen=district.kreuzberg\n",
    )
    .unwrap();

    let (code, stdout, _) = run_headless(&["--script", script.to_str().unwrap()]);

    assert_eq!(code, 0, "{stdout}");
    assert!(stdout.contains("Kreuzberg, Berlin, Germany"));
}

#[test]
fn test_headless_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("result.json");

    let (code, stdout, _) = run_headless(&[
        "--events",
        "type:Soho",
        "--output",
        "json",
        "--output-file",
        out.to_str().unwrap(),
    ]);

    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains(r#""query": "Soho""#));
}

#[test]
fn test_headless_requires_events() {
    let (code, _, stderr) = run_headless(&[]);

    assert_eq!(code, 1);
    assert!(stderr.contains("requires --events or --script"));
}

#[test]
fn test_headless_invalid_event() {
    let (code, _, stderr) = run_headless(&["--events", "teleport:paris"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown event type"));
}

#[test]
fn test_missing_token_is_config_error() {
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_geosearch"))
        .args([
            "--headless",
            "--provider",
            "mapbox",
            "--config",
            "/nonexistent/geosearch.toml",
            "--events",
            "key:esc",
        ])
        .env_remove("MAPBOX_ACCESS_TOKEN")
        .env_remove("GEOSEARCH_PROVIDER")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("access token not configured"));
}
