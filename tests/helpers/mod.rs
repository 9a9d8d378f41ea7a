//! Shared test helpers for end-to-end HTTP tests.

#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{NaiveDate, Utc};
use rsa::RsaPrivateKey;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use licensehub_api::{AppState, build_app};
use licensehub_auth::{PasswordHasher, RsaCodec, TokenService};
use licensehub_cache::CacheManager;
use licensehub_core::config::AppConfig;
use licensehub_database::Stores;
use licensehub_database::memory::{MemoryLicenseStore, MemoryUserStore};
use licensehub_entity::license::{License, LicenseStatus};
use licensehub_service::license::envelope;

/// Container id on the admin allow-list in test configuration.
pub const ADMIN_CONTAINER: &str = "admin-box";
/// Password that satisfies the strength policy.
pub const STRONG_PASSWORD: &str = "violet-anchor-tundra-42";
/// Terminal header every authenticated test request sends.
pub const TERMINAL: &str = "term-1";

fn private_key() -> RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        RsaPrivateKey::new(&mut rand::rngs::OsRng, 1024).expect("Failed to generate test key")
    })
    .clone()
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state behind the router
    pub state: AppState,
    /// Server key pair
    pub codec: Arc<RsaCodec>,
    /// License rows, for seeding and inspection
    pub licenses: Arc<MemoryLicenseStore>,
    /// User rows, for seeding and inspection
    pub users: Arc<MemoryUserStore>,
}

impl TestApp {
    /// Create a new test application over in-memory stores
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "test-secret".to_string();
        config.auth.bcrypt_cost = 4;
        config.license.admin_containers = vec![ADMIN_CONTAINER.to_string()];

        let codec = Arc::new(
            RsaCodec::new(private_key(), Some("test".to_string())).expect("Failed to build codec"),
        );
        let hasher = Arc::new(PasswordHasher::new(&config.auth).expect("Failed to build hasher"));
        let tokens = Arc::new(TokenService::new(&config.auth));

        let licenses = Arc::new(MemoryLicenseStore::new());
        let users = Arc::new(MemoryUserStore::new());
        let stores = Stores {
            licenses: licenses.clone(),
            users: users.clone(),
        };

        let state = AppState::new(
            config,
            Arc::clone(&codec),
            hasher,
            tokens,
            stores,
            Arc::new(CacheManager::in_memory()),
        );
        let router = build_app(state.clone());

        Self {
            router,
            state,
            codec,
            licenses,
            users,
        }
    }

    /// Create an operator account and return its id
    pub async fn create_user(&self, username: &str) -> Uuid {
        self.state
            .users
            .create(username, STRONG_PASSWORD, None, None)
            .await
            .expect("Failed to create test user")
            .id
    }

    /// Password encrypted the way the login page sends it
    pub fn encrypt_password(&self, password: &str) -> String {
        self.codec
            .encrypt_to_base64(password.as_bytes())
            .expect("Failed to encrypt password")
    }

    /// Seal a license payload into the `{key, info}` request body
    pub fn sealed(&self, payload: &Value) -> Value {
        let plaintext = serde_json::to_vec(payload).expect("Failed to serialize payload");
        let sealed = envelope::seal(&plaintext, self.codec.public_key()).expect("Failed to seal");
        serde_json::to_value(sealed).expect("Failed to serialize envelope")
    }

    /// Seed a license row directly
    pub async fn seed_license(
        &self,
        name: &str,
        container_id: &str,
        status: LicenseStatus,
        expire: Option<NaiveDate>,
    ) -> License {
        let now = Utc::now();
        let license = License {
            id: Uuid::now_v7(),
            name: name.to_string(),
            container_id: container_id.to_string(),
            status,
            ip: String::new(),
            domain: String::new(),
            expire,
            last_online_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.licenses
            .insert(license.clone())
            .await
            .expect("Failed to seed license");
        license
    }

    /// Create a user, log in and return the bearer token
    pub async fn login_token(&self, username: &str) -> String {
        self.create_user(username).await;
        let response = self
            .request(
                "POST",
                "/login",
                Some(serde_json::json!({
                    "username": username,
                    "password": self.encrypt_password(STRONG_PASSWORD),
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        self.request_from(method, path, body, token, TERMINAL).await
    }

    /// Make an HTTP request carrying a specific terminal header
    pub async fn request_from(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        terminal: &str,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .header("terminal", terminal);

        if let Some(token) = token {
            req = req.header("x-token", token);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// Envelope `code`
    pub fn code(&self) -> i64 {
        self.body["code"].as_i64().unwrap_or_default()
    }
}
