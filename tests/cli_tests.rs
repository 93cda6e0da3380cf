//! CLI tests for rustible-etcd
//!
//! Covers argument parsing errors, output formats, config file loading and
//! end-to-end lookups against a mock etcd keys API.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::io::Write;
use std::sync::OnceLock;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Empty HOME and working directory so no config file on the machine is found.
fn sandbox() -> &'static TempDir {
    static SANDBOX: OnceLock<TempDir> = OnceLock::new();
    SANDBOX.get_or_init(|| tempfile::tempdir().unwrap())
}

// Helper to get a command for testing
fn etcd_cmd() -> Command {
    let mut cmd = Command::cargo_bin("rustible-etcd").unwrap();
    cmd.current_dir(sandbox().path())
        .env("HOME", sandbox().path())
        .env_remove("RUSTIBLE_ETCD_URL")
        .env_remove("RUSTIBLE_ETCD_VERSION")
        .env_remove("RUSTIBLE_ETCD_CONFIG")
        .env_remove("RUSTIBLE_ETCD_TIMEOUT")
        .env_remove("RUSTIBLE_ETCD_LOG_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}

async fn mock_store() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/keys/app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "action": "get",
            "node": {
                "key": "/app",
                "dir": true,
                "nodes": [
                    {"key": "/app/port", "value": "8080"},
                    {"key": "/app/db", "dir": true, "nodes": [
                        {"key": "/app/db/host", "value": "pg"}
                    ]}
                ]
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/keys/app/port"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "node": {"key": "/app/port", "value": "8080"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/keys/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    server
}

/// Run the binary off the async runtime and return its stdout as JSON.
async fn run_json(args: Vec<String>) -> serde_json::Value {
    let output = tokio::task::spawn_blocking(move || {
        etcd_cmd().args(&args).assert().success().get_output().stdout.clone()
    })
    .await
    .unwrap();

    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_help() {
    etcd_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("lookup"))
        .stdout(predicate::str::contains("get"));
}

#[test]
fn test_version() {
    etcd_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_lookup_requires_keys() {
    etcd_cmd().arg("lookup").assert().failure();
}

#[test]
fn test_invalid_label_rejected() {
    etcd_cmd()
        .args(["lookup", "--label", "no-equals-sign"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NAME=KEY"));
}

#[test]
fn test_invalid_api_version_rejected() {
    etcd_cmd()
        .args(["--api-version", "v7", "get", "/app"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported etcd API version"));
}

#[test]
fn test_missing_config_file_fails() {
    etcd_cmd()
        .args(["-c", "/nonexistent/etcd.toml", "get", "/app"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_unreachable_store_prints_empty_string() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    etcd_cmd()
        .args(["--url", &url, "get", "/app"])
        .assert()
        .success()
        .stdout("\"\"\n");
}

#[tokio::test]
async fn test_get_prints_flattened_tree() {
    let server = mock_store().await;

    let value = run_json(vec![
        "--url".into(),
        server.uri(),
        "get".into(),
        "/app".into(),
    ])
    .await;

    assert_eq!(value, json!({"port": "8080", "db": {"host": "pg"}}));
}

#[tokio::test]
async fn test_lookup_bare_and_labeled_keys() {
    let server = mock_store().await;

    let value = run_json(vec![
        "--url".into(),
        server.uri(),
        "lookup".into(),
        "/app".into(),
    ])
    .await;
    assert_eq!(
        value,
        json!([
            {"key": "db", "value": {"host": "pg"}},
            {"key": "port", "value": "8080"}
        ])
    );

    let value = run_json(vec![
        "--url".into(),
        server.uri(),
        "lookup".into(),
        "-l".into(),
        "listen=/app/port".into(),
    ])
    .await;
    assert_eq!(value, json!([{"key": "listen", "value": "8080"}]));
}

#[tokio::test]
async fn test_url_from_config_file() {
    let server = mock_store().await;

    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config, "[etcd]\nurl = \"{}\"\nversion = \"v2\"", server.uri()).unwrap();
    let config_path = config.path().to_string_lossy().to_string();

    let value = run_json(vec![
        "-c".into(),
        config_path,
        "get".into(),
        "/app/port".into(),
    ])
    .await;

    assert_eq!(value, json!("8080"));
}

#[tokio::test]
async fn test_yaml_output() {
    let server = mock_store().await;
    let uri = server.uri();

    tokio::task::spawn_blocking(move || {
        etcd_cmd()
            .args(["--url", &uri, "--output", "yaml", "get", "/app/port"])
            .assert()
            .success()
            .stdout("'8080'\n");
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_malformed_body_fails() {
    let server = mock_store().await;
    let uri = server.uri();

    tokio::task::spawn_blocking(move || {
        etcd_cmd()
            .args(["--url", &uri, "get", "/broken"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Failed to resolve '/broken'"));
    })
    .await
    .unwrap();
}

#[test]
fn test_invalid_config_contents_fail() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[etcd\nurl =").unwrap();

    etcd_cmd()
        .args(["-c", file.path().to_str().unwrap(), "get", "/app"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_config_in_working_directory_is_used() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("rustible-etcd.toml"),
        "[etcd]\nurl = \"not a url\"\n",
    )
    .unwrap();

    etcd_cmd()
        .current_dir(dir.path())
        .args(["get", "/app"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid etcd URL 'not a url'"));
}

#[test]
fn test_bad_env_log_level_exits_with_config_code() {
    etcd_cmd()
        .env("RUSTIBLE_ETCD_LOG_LEVEL", "loud")
        .args(["get", "/app"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("logging.level"));
}

#[test]
fn test_invalid_log_format_rejected() {
    etcd_cmd()
        .args(["--log-format", "xml", "get", "/app"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format 'xml'"));
}
