//! Operator account lookup and provisioning.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use licensehub_auth::password::{PasswordHasher, PasswordValidator};
use licensehub_cache::CacheManager;
use licensehub_cache::keys;
use licensehub_core::config::AuthConfig;
use licensehub_core::error::AppError;
use licensehub_core::result::AppResult;
use licensehub_core::traits::CacheProvider;
use licensehub_database::store::UserStore;
use licensehub_entity::user::{CreateUser, User};

use crate::context::RequestContext;

/// Handles account lookups and creation.
#[derive(Debug, Clone)]
pub struct UserService {
    /// Authoritative user store.
    users: Arc<dyn UserStore>,
    /// Advisory profile cache.
    cache: Arc<CacheManager>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password validator.
    validator: PasswordValidator,
    /// Lifetime of cached profiles.
    cache_ttl: Duration,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        cache: Arc<CacheManager>,
        hasher: Arc<PasswordHasher>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            users,
            cache,
            hasher,
            validator: PasswordValidator::new(config),
            cache_ttl: Duration::from_secs(config.user_cache_ttl_seconds),
        }
    }

    /// The profile of the authenticated caller.
    ///
    /// Served from cache when possible. Cached profiles carry no password
    /// hash.
    pub async fn current(&self, ctx: &RequestContext) -> AppResult<User> {
        let key = keys::user_by_id(ctx.user_id);
        match self.cache.get_json::<User>(&key).await {
            Ok(Some(user)) => {
                debug!(user_id = %ctx.user_id, "User profile cache hit");
                return Ok(user);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "User profile cache read failed"),
        }

        let user = self
            .users
            .get_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if let Err(e) = self.cache.set_json(&key, &user, self.cache_ttl).await {
            warn!(error = %e, "User profile cache write failed");
        }
        Ok(user)
    }

    /// Provision a new account.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        email: Option<String>,
        nick: Option<String>,
    ) -> AppResult<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::validation("Username cannot be empty"));
        }

        let mut inputs = vec![username];
        inputs.extend(email.as_deref());
        inputs.extend(nick.as_deref());
        self.validator.validate(password, &inputs)?;

        let password_hash = self.hasher.hash(password).await?;
        let user = self
            .users
            .create(CreateUser {
                username: username.to_string(),
                email,
                nick,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }
}
