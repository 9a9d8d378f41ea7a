//! Authentication configuration: password hashing and bearer tokens.

use serde::{Deserialize, Serialize};

/// Lowest accepted bcrypt cost factor.
pub const MIN_COST: u32 = 4;
/// Highest accepted bcrypt cost factor.
pub const MAX_COST: u32 = 31;

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Issuer written into and required from every token.
    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,
    /// Token lifetime in hours.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: u64,
    /// Clock skew tolerated on `nbf`/`exp`, in seconds.
    #[serde(default)]
    pub leeway_seconds: u64,
    /// bcrypt cost factor used for new hashes.
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    /// Maximum concurrent hash computations (0 = available cores).
    #[serde(default)]
    pub hash_concurrency: usize,
    /// Minimum password length for new accounts.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// How long resolved users stay in the cache, in seconds.
    #[serde(default = "default_user_cache_ttl")]
    pub user_cache_ttl_seconds: u64,
}

impl AuthConfig {
    /// Resolve `hash_concurrency`, falling back to the number of cores.
    pub fn effective_hash_concurrency(&self) -> usize {
        if self.hash_concurrency > 0 {
            return self.hash_concurrency;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_issuer: default_jwt_issuer(),
            token_ttl_hours: default_token_ttl(),
            leeway_seconds: 0,
            bcrypt_cost: default_bcrypt_cost(),
            hash_concurrency: 0,
            password_min_length: default_password_min(),
            user_cache_ttl_seconds: default_user_cache_ttl(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_jwt_issuer() -> String {
    "licensehub".to_string()
}

fn default_token_ttl() -> u64 {
    24
}

fn default_bcrypt_cost() -> u32 {
    12
}

fn default_password_min() -> usize {
    8
}

fn default_user_cache_ttl() -> u64 {
    1800
}
