//! Integration tests for login and token-protected routes.

mod helpers;

use axum::http::StatusCode;

use helpers::{STRONG_PASSWORD, TestApp};
use licensehub_entity::user::UserStatus;

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    let token = app.login_token("operator").await;
    assert!(token.starts_with("Bearer "));

    let response = app.request("GET", "/user/info", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["username"], "operator");
    assert!(response.body["data"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = TestApp::new();
    app.create_user("operator").await;

    let response = app
        .request(
            "POST",
            "/login",
            Some(serde_json::json!({
                "username": "operator",
                "password": app.encrypt_password("wrong-password-entirely"),
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.code(), 40020);
}

#[tokio::test]
async fn test_unknown_user_and_wrong_password_look_alike() {
    let app = TestApp::new();
    app.create_user("operator").await;

    let wrong = app
        .request(
            "POST",
            "/login",
            Some(serde_json::json!({
                "username": "operator",
                "password": app.encrypt_password("nope-nope-nope"),
            })),
            None,
        )
        .await;
    let unknown = app
        .request(
            "POST",
            "/login",
            Some(serde_json::json!({
                "username": "nobody",
                "password": app.encrypt_password(STRONG_PASSWORD),
            })),
            None,
        )
        .await;

    assert_eq!(wrong.status, unknown.status);
    assert_eq!(wrong.body, unknown.body);
}

#[tokio::test]
async fn test_login_rejects_plaintext_password() {
    let app = TestApp::new();
    app.create_user("operator").await;

    let response = app
        .request(
            "POST",
            "/login",
            Some(serde_json::json!({
                "username": "operator",
                "password": STRONG_PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_disabled_account_cannot_login() {
    let app = TestApp::new();
    let id = app.create_user("operator").await;
    assert!(app.users.set_status(id, UserStatus::Disabled).await);

    let response = app
        .request(
            "POST",
            "/login",
            Some(serde_json::json!({
                "username": "operator",
                "password": app.encrypt_password(STRONG_PASSWORD),
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_token_requires_login() {
    let app = TestApp::new();
    let response = app.request("GET", "/user/info", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.code(), 401);
}

#[tokio::test]
async fn test_token_bound_to_terminal() {
    let app = TestApp::new();
    let token = app.login_token("operator").await;

    let response = app
        .request_from("GET", "/user/info", None, Some(&token), "term-2")
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.code(), 403);
}

#[tokio::test]
async fn test_token_without_bearer_prefix_rejected() {
    let app = TestApp::new();
    let token = app.login_token("operator").await;
    let bare = token.trim_start_matches("Bearer ");

    let response = app.request("GET", "/user/info", None, Some(bare)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_token_accepted_from_query() {
    let app = TestApp::new();
    let token = app.login_token("operator").await;
    let encoded = token.replace(' ', "%20");

    let response = app
        .request("GET", &format!("/user/info?token={encoded}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
}
