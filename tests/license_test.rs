//! Integration tests for license registration, verification and administration.

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use helpers::{ADMIN_CONTAINER, TestApp};
use licensehub_database::LicenseStore;
use licensehub_entity::license::LicenseStatus;

fn payload(name: &str, container_id: &str) -> Value {
    json!({ "name": name, "containerId": container_id })
}

fn grant(response: &helpers::TestResponse) -> Value {
    let data = response.body["data"]["data"]
        .as_str()
        .expect("signed response carries data");
    serde_json::from_str(data).expect("grant is JSON")
}

#[tokio::test]
async fn test_register_activate_verify() {
    let app = TestApp::new();
    let token = app.login_token("operator").await;

    let created = app
        .request(
            "POST",
            "/license/create",
            Some(app.sealed(&json!({
                "name": "acme",
                "containerId": "c-1",
                "ip": "10.0.0.1",
                "domain": "acme.test",
            }))),
            None,
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    assert_eq!(grant(&created)["status"], 1);

    let activated = app
        .request(
            "POST",
            "/license/status",
            Some(json!({ "containerId": "c-1", "status": 0 })),
            Some(&token),
        )
        .await;
    assert_eq!(activated.status, StatusCode::OK);

    let verified = app
        .request(
            "POST",
            "/license/verify",
            Some(app.sealed(&payload("acme", "c-1"))),
            None,
        )
        .await;
    assert_eq!(verified.status, StatusCode::OK, "{:?}", verified.body);

    let signed = &verified.body["data"];
    assert_eq!(signed["kid"], "test");
    let data = signed["data"].as_str().unwrap();
    let sign = signed["sign"].as_str().unwrap();
    assert!(app.codec.verify(data.as_bytes(), sign).unwrap());
    assert_eq!(
        grant(&verified),
        json!({ "name": "acme", "containerId": "c-1", "status": 0 })
    );
}

#[tokio::test]
async fn test_second_verify_inside_window_denied() {
    let app = TestApp::new();
    app.seed_license("acme", "c-1", LicenseStatus::Valid, None)
        .await;

    let first = app
        .request("POST", "/license/verify", Some(app.sealed(&payload("acme", "c-1"))), None)
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app
        .request("POST", "/license/verify", Some(app.sealed(&payload("acme", "c-1"))), None)
        .await;
    assert_eq!(second.status, StatusCode::FORBIDDEN);
    assert_eq!(second.code(), 401);
    assert_eq!(second.body["msg"], "invalid license");
}

#[tokio::test]
async fn test_admin_container_may_verify_repeatedly() {
    let app = TestApp::new();
    app.seed_license("ops", ADMIN_CONTAINER, LicenseStatus::Valid, None)
        .await;

    for _ in 0..3 {
        let response = app
            .request(
                "POST",
                "/license/verify",
                Some(app.sealed(&payload("ops", ADMIN_CONTAINER))),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_denials_are_indistinguishable() {
    let app = TestApp::new();
    app.seed_license("acme", "pending", LicenseStatus::Invalid, None)
        .await;
    app.seed_license("acme", "named", LicenseStatus::Valid, None)
        .await;

    let pending = app
        .request("POST", "/license/verify", Some(app.sealed(&payload("acme", "pending"))), None)
        .await;
    let mismatch = app
        .request("POST", "/license/verify", Some(app.sealed(&payload("other", "named"))), None)
        .await;

    assert_eq!(pending.status, StatusCode::FORBIDDEN);
    assert_eq!(pending.status, mismatch.status);
    assert_eq!(pending.body, mismatch.body);
}

#[tokio::test]
async fn test_expired_license_is_persisted_as_expired() {
    let app = TestApp::new();
    let yesterday = (Utc::now() - Duration::days(1)).date_naive();
    let seeded = app
        .seed_license("acme", "c-1", LicenseStatus::Valid, Some(yesterday))
        .await;

    let response = app
        .request("POST", "/license/verify", Some(app.sealed(&payload("acme", "c-1"))), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let stored = app.licenses.get_by_id(seeded.id).await.unwrap().unwrap();
    assert_eq!(stored.status, LicenseStatus::Expired);
}

#[tokio::test]
async fn test_tampered_key_rejected() {
    let app = TestApp::new();
    app.seed_license("acme", "c-1", LicenseStatus::Valid, None)
        .await;

    let mut body = app.sealed(&payload("acme", "c-1"));
    body["key"] = json!("00000000000000000000000000000000");

    let response = app.request("POST", "/license/verify", Some(body), None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.code(), 401);

    let stored = app
        .licenses
        .get_by_container_id("c-1")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.last_online_at.is_none());
}

#[tokio::test]
async fn test_verify_unknown_container() {
    let app = TestApp::new();
    let response = app
        .request("POST", "/license/verify", Some(app.sealed(&payload("acme", "ghost"))), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_envelope_is_a_parameter_error() {
    let app = TestApp::new();
    let response = app
        .request("POST", "/license/verify", Some(json!({ "key": "", "info": "" })), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.code(), 40001);
}

#[tokio::test]
async fn test_bind_collision_reports_already_bound() {
    let app = TestApp::new();
    let token = app.login_token("operator").await;
    app.seed_license("acme", "c-1", LicenseStatus::Valid, None)
        .await;
    app.seed_license("beta", "c-2", LicenseStatus::Valid, None)
        .await;

    let first = app
        .request(
            "POST",
            "/license/bind",
            Some(json!({ "containerId": "c-1", "ip": "10.0.0.7" })),
            Some(&token),
        )
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["data"]["ip"], "10.0.0.7");

    let second = app
        .request(
            "POST",
            "/license/bind",
            Some(json!({ "containerId": "c-2", "ip": "10.0.0.7", "expire": "20991231" })),
            Some(&token),
        )
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.code(), 203);

    let untouched = app
        .licenses
        .get_by_container_id("c-2")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.ip, "");
    assert!(untouched.expire.is_none());
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = TestApp::new();
    for (method, path) in [
        ("GET", "/license/list"),
        ("GET", "/license/getInfo?id=c-1"),
        ("GET", "/license/remove?id=c-1"),
    ] {
        let response = app.request(method, path, None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
async fn test_list_get_remove() {
    let app = TestApp::new();
    let token = app.login_token("operator").await;
    app.seed_license("acme", "c-1", LicenseStatus::Valid, None)
        .await;
    app.seed_license("beta", "c-2", LicenseStatus::Invalid, None)
        .await;

    let all = app
        .request("GET", "/license/list?page=1&size=10", None, Some(&token))
        .await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body["data"]["total"], 2);

    let filtered = app
        .request("GET", "/license/list?name=acm", None, Some(&token))
        .await;
    assert_eq!(filtered.body["data"]["total"], 1);
    assert_eq!(filtered.body["data"]["content"][0]["containerId"], "c-1");

    let info = app
        .request("GET", "/license/getInfo?id=c-2", None, Some(&token))
        .await;
    assert_eq!(info.status, StatusCode::OK);
    assert_eq!(info.body["data"]["status"], 1);

    let removed = app
        .request("GET", "/license/remove?id=c-2", None, Some(&token))
        .await;
    assert_eq!(removed.status, StatusCode::OK);

    let gone = app
        .request("GET", "/license/getInfo?id=c-2", None, Some(&token))
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_for_existing_container_verifies() {
    let app = TestApp::new();
    app.seed_license("acme", "c-1", LicenseStatus::Valid, None)
        .await;

    let response = app
        .request("POST", "/license/create", Some(app.sealed(&payload("acme", "c-1"))), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(grant(&response)["status"], 0);

    let stored = app
        .licenses
        .get_by_container_id("c-1")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.last_online_at.is_some());
}
