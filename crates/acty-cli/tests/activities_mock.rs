//! Activity commands against a mock API server.

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_token(home: &Path, token: &str) {
    fs::write(
        home.join("cookies.json"),
        json!({"token": {"value": token, "path": "/"}}).to_string(),
    )
    .unwrap();
}

fn api_url(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

#[tokio::test]
async fn test_list_sends_bearer_token_and_prints_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activities"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "content": "Walk the dog", "date": "2024-01-01"},
            {"id": 2, "content": "Buy milk", "date": "2024-01-02"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    write_token(home.path(), "abc123");

    cargo_bin_cmd!("acty")
        .env("ACTY_HOME", home.path())
        .env("ACTY_API_URL", api_url(&server))
        .args(["activities", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Walk the dog"))
        .stdout(predicate::str::contains("Buy milk"))
        .stdout(predicate::str::contains("2024-01-02"));
}

#[tokio::test]
async fn test_list_is_the_default_command() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();

    cargo_bin_cmd!("acty")
        .env("ACTY_HOME", home.path())
        .env("ACTY_API_URL", api_url(&server))
        .assert()
        .success()
        .stdout(predicate::str::contains("No activities."));
}

#[tokio::test]
async fn test_list_without_session_sends_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let home = tempdir().unwrap();

    cargo_bin_cmd!("acty")
        .env("ACTY_HOME", home.path())
        .env("ACTY_API_URL", api_url(&server))
        .args(["activities", "list"])
        .assert()
        .success();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_expired_session_redirects_to_signin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/activities"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    write_token(home.path(), "stale-token");

    cargo_bin_cmd!("acty")
        .env("ACTY_HOME", home.path())
        .env("ACTY_API_URL", api_url(&server))
        .args(["activities", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Session expired").count(1))
        .stderr(predicate::str::contains("acty signin"))
        .stderr(predicate::str::contains("Failed to load activities"));

    let contents = fs::read_to_string(home.path().join("cookies.json")).unwrap();
    assert!(!contents.contains("stale-token"));
}

#[tokio::test]
async fn test_add_posts_activity_and_prints_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/activities"))
        .and(header("authorization", "Bearer abc123"))
        .and(body_json(json!({"content": "Buy milk", "date": "2024-01-01"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            json!({"id": 7, "content": "Buy milk", "date": "2024-01-01"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    write_token(home.path(), "abc123");

    cargo_bin_cmd!("acty")
        .env("ACTY_HOME", home.path())
        .env("ACTY_API_URL", api_url(&server))
        .args([
            "activities",
            "add",
            "--content",
            "Buy milk",
            "--date",
            "2024-01-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Activity added"))
        .stdout(predicate::str::contains("7"))
        .stdout(predicate::str::contains("Buy milk"));
}

#[tokio::test]
async fn test_add_with_blank_content_is_not_submitted() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    cargo_bin_cmd!("acty")
        .env("ACTY_HOME", home.path())
        .env("ACTY_API_URL", api_url(&server))
        .args(["activities", "add", "--content", " ", "--date", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("content is required"));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_failure_reports_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/activities"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "date is in the past"})),
        )
        .mount(&server)
        .await;

    let home = tempdir().unwrap();

    cargo_bin_cmd!("acty")
        .env("ACTY_HOME", home.path())
        .env("ACTY_API_URL", api_url(&server))
        .args(["activities", "add", "-c", "Run", "-d", "1999-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to add activity"))
        .stderr(predicate::str::contains("date is in the past"))
        .stderr(predicate::str::contains("Session expired").not());
}

#[tokio::test]
async fn test_edit_sends_patch() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/activities/7"))
        .and(body_json(json!({"content": "Buy oat milk", "date": "2024-01-02"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"id": 7, "content": "Buy oat milk", "date": "2024-01-02"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();

    cargo_bin_cmd!("acty")
        .env("ACTY_HOME", home.path())
        .env("ACTY_API_URL", api_url(&server))
        .args([
            "activities",
            "edit",
            "7",
            "--content",
            "Buy oat milk",
            "--date",
            "2024-01-02",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Activity updated"))
        .stdout(predicate::str::contains("Buy oat milk"));
}

#[tokio::test]
async fn test_replace_sends_put() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/activities/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"id": 7, "content": "Swim", "date": "2024-02-02"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();

    cargo_bin_cmd!("acty")
        .env("ACTY_HOME", home.path())
        .env("ACTY_API_URL", api_url(&server))
        .args(["activities", "replace", "7", "-c", "Swim", "-d", "2024-02-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Swim"));
}

#[tokio::test]
async fn test_delete_sends_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/activities/7"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    write_token(home.path(), "abc123");

    cargo_bin_cmd!("acty")
        .env("ACTY_HOME", home.path())
        .env("ACTY_API_URL", api_url(&server))
        .args(["activities", "delete", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Activity deleted"));
}

#[tokio::test]
async fn test_api_url_flag_overrides_env() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();

    cargo_bin_cmd!("acty")
        .env("ACTY_HOME", home.path())
        .env("ACTY_API_URL", "http://127.0.0.1:9/api")
        .args(["--api-url", &format!("{}/v2", server.uri())])
        .args(["activities", "list"])
        .assert()
        .success();
}

#[test]
fn test_unreachable_server_fails_with_network_error() {
    let home = tempdir().unwrap();
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    cargo_bin_cmd!("acty")
        .env("ACTY_HOME", home.path())
        .env("ACTY_API_URL", format!("http://127.0.0.1:{port}/api"))
        .args(["activities", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load activities"))
        .stderr(predicate::str::contains("Network error"));
}

#[test]
fn test_invalid_api_url_is_rejected() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("acty")
        .env("ACTY_HOME", home.path())
        .env("ACTY_API_URL", "not a url")
        .args(["activities", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid API base URL"));
}

#[tokio::test]
async fn test_delete_keeps_id_inside_activity_path() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/activities/..%2Ftokens"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();

    cargo_bin_cmd!("acty")
        .env("ACTY_HOME", home.path())
        .env("ACTY_API_URL", api_url(&server))
        .args(["activities", "delete", "../tokens"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Activity deleted"));
}

#[tokio::test]
async fn test_delete_refuses_dot_id() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    cargo_bin_cmd!("acty")
        .env("ACTY_HOME", home.path())
        .env("ACTY_API_URL", api_url(&server))
        .args(["activities", "delete", ".."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to delete activity"))
        .stderr(predicate::str::contains("invalid activity id"));

    assert!(server.received_requests().await.unwrap().is_empty());
}
