//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use licensehub_auth::codec::RsaCodec;
use licensehub_auth::jwt::TokenService;
use licensehub_auth::password::PasswordHasher;
use licensehub_cache::CacheManager;
use licensehub_core::config::AppConfig;
use licensehub_database::store::Stores;
use licensehub_service::license::LicenseService;
use licensehub_service::user::{LoginService, UserService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// License and user stores
    pub stores: Stores,
    /// Cache manager (Redis or in-memory)
    pub cache: Arc<CacheManager>,

    // ── Auth ─────────────────────────────────────────────────
    /// Bearer token issuance and validation
    pub tokens: Arc<TokenService>,

    // ── Services ─────────────────────────────────────────────
    /// License verifier
    pub licenses: Arc<LicenseService>,
    /// Password login
    pub login: Arc<LoginService>,
    /// Account lookups
    pub users: Arc<UserService>,
}

impl AppState {
    /// Wire the services over already-initialised infrastructure.
    pub fn new(
        config: AppConfig,
        codec: Arc<RsaCodec>,
        hasher: Arc<PasswordHasher>,
        tokens: Arc<TokenService>,
        stores: Stores,
        cache: Arc<CacheManager>,
    ) -> Self {
        let licenses = Arc::new(LicenseService::new(
            Arc::clone(&stores.licenses),
            Arc::clone(&codec),
            &config.license,
        ));
        let login = Arc::new(LoginService::new(
            Arc::clone(&stores.users),
            Arc::clone(&hasher),
            Arc::clone(&tokens),
            codec,
        ));
        let users = Arc::new(UserService::new(
            Arc::clone(&stores.users),
            Arc::clone(&cache),
            hasher,
            &config.auth,
        ));

        Self {
            config: Arc::new(config),
            stores,
            cache,
            tokens,
            licenses,
            login,
            users,
        }
    }
}
