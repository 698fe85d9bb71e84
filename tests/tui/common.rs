//! Common test utilities for TUI tests.

use std::process::Command;

/// Runs geosearch in headless mode against the mock gazetteer.
///
/// Returns (exit code, stdout, stderr).
pub fn run_headless(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_geosearch"))
        .args(["--headless", "--provider", "mock", "--config", "/nonexistent/geosearch.toml"])
        .args(args)
        .env_remove("GEOSEARCH_PROVIDER")
        .env_remove("MAPBOX_ACCESS_TOKEN")
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

/// Runs a comma-separated event script and returns (exit code, stdout).
pub fn run_events(events: &str) -> (i32, String) {
    let (code, stdout, _) = run_headless(&["--events", events]);
    (code, stdout)
}
