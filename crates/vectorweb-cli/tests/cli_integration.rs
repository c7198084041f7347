//! CLI integration tests: run the actual vectorweb binary.
//!
//! No search service is needed; "unreachable" is a local port nothing
//! listens on.

use std::process::Command;

const UNREACHABLE: &str = "http://127.0.0.1:9";

fn vectorweb() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_vectorweb"));
    cmd.current_dir(std::env::temp_dir())
        .env("VECTORWEB__SEARCH__MOCK_DELAY_MS", "10")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_cli_config_prints_toml() {
    let output = vectorweb().arg("config").output().expect("failed to execute");
    assert!(
        output.status.success(),
        "vectorweb config failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[service]"));
    assert!(stdout.contains("[search]"));
    assert!(stdout.contains("mock_delay_ms = 10"));
}

#[test]
fn test_cli_base_url_override() {
    let output = vectorweb()
        .args(["--base-url", "search.internal:9000/", "config"])
        .output()
        .expect("failed to execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(r#"base_url = "http://search.internal:9000""#),
        "unexpected config: {stdout}"
    );
}

#[test]
fn test_cli_search_unreachable_falls_back_to_preview() {
    let output = vectorweb()
        .args([
            "--base-url",
            UNREACHABLE,
            "search",
            "https://example.com",
            "test",
            "--json",
        ])
        .output()
        .expect("failed to execute");
    assert!(
        output.status.success(),
        "search failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("invalid JSON output");
    assert_eq!(value["origin"], "preview");
    assert_eq!(value["status"], "disconnected");
    let results = value["results"].as_array().expect("results array");
    assert_eq!(results.len(), 5);
    let content = results[0]["content"].as_str().unwrap();
    assert!(content.contains("https://example.com"));
    assert!(content.contains("test"));
}

#[test]
fn test_cli_search_text_shows_preview_banner() {
    let output = vectorweb()
        .args(["--base-url", UNREACHABLE, "search", "https://example.com", "test"])
        .output()
        .expect("failed to execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Preview Mode"));
    assert!(stdout.contains("5 Matches"));
}

#[test]
fn test_cli_search_rejects_empty_query() {
    let output = vectorweb()
        .args(["--base-url", UNREACHABLE, "search", "https://example.com", "   "])
        .output()
        .expect("failed to execute");
    assert!(!output.status.success(), "empty query should fail");
}

#[test]
fn test_cli_health_unreachable() {
    let output = vectorweb()
        .args(["--base-url", UNREACHABLE, "health", "--json"])
        .output()
        .expect("failed to execute");
    assert!(!output.status.success(), "unreachable service should fail");

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("invalid JSON output");
    assert_eq!(value["status"], "disconnected");
    assert_eq!(value["endpoint"], UNREACHABLE);
    assert!(value["report"].is_null());
}
