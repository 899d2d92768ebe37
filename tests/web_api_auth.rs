//! Web API Authentication Tests
//!
//! Integration tests for login and bearer-token protected endpoints.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use common::{create_test_server, login, login_token};
use serde_json::{json, Value};

#[tokio::test]
async fn test_login_success() {
    let (server, _) = create_test_server();

    let body = login(&server, "a", "b").await;

    let token = body["token"].as_str().unwrap();
    assert!(!token.is_empty());
    assert_eq!(token.split('.').count(), 3);

    assert_eq!(body["user"]["username"], "a");
    let id = body["user"]["id"].as_str().unwrap();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_login_does_not_echo_password() {
    let (server, _) = create_test_server();

    let body = login(&server, "alice", "hunter2").await;
    assert!(!body.to_string().contains("hunter2"));
}

#[tokio::test]
async fn test_login_assigns_distinct_ids() {
    let (server, _) = create_test_server();

    let first = login(&server, "alice", "x").await;
    let second = login(&server, "alice", "x").await;
    assert_ne!(first["user"]["id"], second["user"]["id"]);
}

#[tokio::test]
async fn test_login_empty_fields() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/login")
        .json(&json!({ "username": "", "password": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["username"].is_array());
    assert!(body["error"]["details"]["password"].is_array());
}

#[tokio::test]
async fn test_login_long_username_accepted() {
    let (server, _) = create_test_server();

    let username = "listener-".repeat(20);
    let body = login(&server, &username, "pw").await;

    assert_eq!(body["user"]["username"], username.as_str());
}

#[tokio::test]
async fn test_login_missing_field() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api/login")
        .json(&json!({ "username": "a" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_profile_with_token() {
    let (server, _) = create_test_server();

    let body = login(&server, "alice", "secret").await;
    let token = body["token"].as_str().unwrap();

    let response = server
        .get("/api/profile")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;

    response.assert_status_ok();
    let profile = response.json::<Value>();
    assert_eq!(profile["username"], "alice");
    assert_eq!(profile["user_id"], body["user"]["id"]);
}

#[tokio::test]
async fn test_profile_without_header() {
    let (server, _) = create_test_server();

    let response = server.get("/api/profile").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(body["error"]["message"], "authorization header required");
}

#[tokio::test]
async fn test_profile_bad_header_format() {
    let (server, _) = create_test_server();
    let token = login_token(&server, "alice").await;

    for header in [token.clone(), format!("Token {}", token), "Bearer".to_string()] {
        let response = server
            .get("/api/profile")
            .add_header(AUTHORIZATION, header)
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body = response.json::<Value>();
        assert_eq!(
            body["error"]["message"],
            "invalid authorization header format"
        );
    }
}

#[tokio::test]
async fn test_profile_invalid_token() {
    let (server, _) = create_test_server();

    let response = server
        .get("/api/profile")
        .add_header(AUTHORIZATION, "Bearer not.a.token".to_string())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["message"], "invalid token");
}

#[tokio::test]
async fn test_token_from_previous_process_rejected() {
    // A second server has a fresh signing key, as after a restart.
    let (old_server, _) = create_test_server();
    let token = login_token(&old_server, "alice").await;

    let (new_server, _) = create_test_server();
    let response = new_server
        .get("/api/profile")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
