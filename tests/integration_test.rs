//! Integration tests for the certinfo HTTP server and CLI binary.
//!
//! The server tests serve the real router on an ephemeral loopback port and
//! talk to it with `reqwest`. None of them reach the public internet: every
//! request is rejected before a TLS connection would be attempted.

mod helpers;

use std::io::Write;
use std::process::Command;
use std::sync::Arc;

use certinfo::config::MAX_REQUEST_BODY_SIZE;
use certinfo::server::{router, AppState};
use certinfo::{ChainFetcher, Config};
use helpers::{fixture_path, fixture_pem, REFERENCE_CHAIN};

async fn spawn_server() -> String {
    let fetcher = ChainFetcher::new(&Config::default()).expect("TLS client");
    let app = router(AppState {
        fetcher: Arc::new(fetcher),
        allow_private_hosts: false,
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/certs")
}

fn assert_cors(response: &reqwest::Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
}

#[tokio::test]
async fn test_preflight() {
    let url = spawn_server().await;
    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, &url)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 204);
    assert_cors(&response);
}

#[tokio::test]
async fn test_rejections_carry_cors_headers() {
    let url = spawn_server().await;
    let client = reqwest::Client::new();

    let cases = [
        ("{not json", "Invalid request body"),
        (r#"{"domain": "http://example.com"}"#, "expected https"),
        (r#"{"domain": "https://192.168.1.1"}"#, "non-public"),
        (r#"{"domain": "not a url"}"#, "Invalid URL"),
    ];
    for (body, expected) in cases {
        let response = client.post(&url).body(body).send().await.unwrap();
        assert_eq!(response.status(), 400, "{body}");
        assert_cors(&response);
        let text = response.text().await.unwrap();
        assert!(text.contains(expected), "{body} -> {text}");
    }
}

#[tokio::test]
async fn test_wrong_method_and_oversized_body() {
    let url = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client.get(&url).send().await.unwrap();
    assert_eq!(response.status(), 405);
    assert_cors(&response);

    let huge = format!(
        r#"{{"domain": "https://example.com/{}"}}"#,
        "a".repeat(MAX_REQUEST_BODY_SIZE)
    );
    let response = client.post(&url).body(huge).send().await.unwrap();
    assert_eq!(response.status(), 413);
    assert_cors(&response);
}

fn certinfo() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_certinfo"));
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_describe_single_file() {
    let output = certinfo()
        .args(["describe"])
        .arg(fixture_path("leaf_ed25519.pem"))
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["certs"][0]["subject"]["common_name"], "example.test");
    assert_eq!(json["cert_chain"], fixture_pem("leaf_ed25519.pem"));
}

#[test]
fn test_cli_describe_bundle_pretty() {
    let mut bundle = tempfile::NamedTempFile::new().unwrap();
    for name in REFERENCE_CHAIN {
        bundle.write_all(fixture_pem(name).as_bytes()).unwrap();
    }

    let output = certinfo()
        .args(["describe", "--pretty"])
        .arg(bundle.path())
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("\n  \"certs\": ["));
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["certs"].as_array().unwrap().len(), 3);
}

#[test]
fn test_cli_describe_missing_file_fails() {
    let output = certinfo()
        .args(["describe", "/nonexistent/chain.pem"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("certinfo error: Failed to read"), "{stderr}");
}

#[test]
fn test_cli_fetch_rejects_http_before_connecting() {
    let output = certinfo()
        .args(["fetch", "http://example.com"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("expected https"), "{stderr}");
}

#[test]
fn test_cli_invalid_config_exits_with_2() {
    let output = certinfo()
        .args(["--handshake-timeout-secs", "0", "describe"])
        .arg(fixture_path("root_rsa.pem"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid handshake-timeout-secs"), "{stderr}");
}
