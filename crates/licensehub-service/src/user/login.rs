//! Password login producing a terminal-bound bearer token.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use licensehub_auth::codec::RsaCodec;
use licensehub_auth::jwt::TokenService;
use licensehub_auth::password::PasswordHasher;
use licensehub_core::error::AppError;
use licensehub_core::result::AppResult;
use licensehub_database::store::UserStore;

const BAD_CREDENTIALS: &str = "invalid username or password";

/// Prefix carried by tokens handed to clients.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    /// The account's canonical username.
    pub username: String,
    /// `Bearer <jwt>`.
    pub token: String,
}

/// Authenticates operators.
#[derive(Debug, Clone)]
pub struct LoginService {
    users: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    tokens: Arc<TokenService>,
    codec: Arc<RsaCodec>,
}

impl LoginService {
    /// Creates a new login service.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        tokens: Arc<TokenService>,
        codec: Arc<RsaCodec>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            codec,
        }
    }

    /// Log in with an RSA-encrypted, base64 encoded password.
    pub async fn login(
        &self,
        username: &str,
        encrypted_password: &str,
        ip: &str,
        terminal: &str,
    ) -> AppResult<LoginResult> {
        let password = self
            .codec
            .decrypt_base64(encrypted_password)
            .ok()
            .and_then(|raw| String::from_utf8(raw).ok())
            .ok_or_else(|| {
                warn!(username, ip, "Login password could not be decrypted");
                AppError::authentication(BAD_CREDENTIALS)
            })?;

        let Some(user) = self.users.get_by_username(username).await? else {
            // Equalise timing with the known-user path.
            let _ = self.hasher.hash(&password).await;
            warn!(username, ip, "Login failed: unknown user");
            return Err(AppError::authentication(BAD_CREDENTIALS));
        };

        if !user.can_login() {
            warn!(username, ip, status = %user.status, "Login refused: account disabled");
            return Err(AppError::authentication("account is disabled"));
        }

        if !self.hasher.verify(&password, &user.password_hash).await? {
            warn!(username, ip, "Login failed: wrong password");
            return Err(AppError::authentication(BAD_CREDENTIALS));
        }

        let token = self.tokens.issue(user.id, &user.username, ip, terminal)?;
        info!(user_id = %user.id, username = %user.username, ip, terminal, "User logged in");

        Ok(LoginResult {
            username: user.username,
            token: format!("{BEARER_PREFIX}{token}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use rand::rngs::OsRng;
    use rsa::RsaPrivateKey;

    use licensehub_core::config::AuthConfig;
    use licensehub_core::error::ErrorKind;
    use licensehub_database::memory::MemoryUserStore;
    use licensehub_entity::user::{CreateUser, UserStatus};

    use super::*;

    fn codec() -> Arc<RsaCodec> {
        static CODEC: OnceLock<Arc<RsaCodec>> = OnceLock::new();
        CODEC
            .get_or_init(|| {
                let private = RsaPrivateKey::new(&mut OsRng, 1024).unwrap();
                Arc::new(RsaCodec::new(private, None).unwrap())
            })
            .clone()
    }

    async fn setup() -> (LoginService, Arc<MemoryUserStore>, Arc<TokenService>) {
        let config = AuthConfig {
            bcrypt_cost: 4,
            ..AuthConfig::default()
        };
        let hasher = Arc::new(PasswordHasher::new(&config).unwrap());
        let tokens = Arc::new(TokenService::new(&config));
        let users = Arc::new(MemoryUserStore::new());
        users
            .create(CreateUser {
                username: "admin".to_string(),
                email: None,
                nick: None,
                password_hash: hasher.hash("correct horse").await.unwrap(),
            })
            .await
            .unwrap();
        let service = LoginService::new(users.clone(), hasher, tokens.clone(), codec());
        (service, users, tokens)
    }

    fn sealed(password: &str) -> String {
        codec().encrypt_to_base64(password.as_bytes()).unwrap()
    }

    #[tokio::test]
    async fn test_login_issues_bearer_token() {
        let (service, _, tokens) = setup().await;
        let result = service
            .login("admin", &sealed("correct horse"), "10.0.0.1", "web")
            .await
            .unwrap();
        assert_eq!(result.username, "admin");

        let jwt = result.token.strip_prefix(BEARER_PREFIX).unwrap();
        let principal = tokens.validate(jwt, "web").unwrap();
        assert_eq!(principal.subject_name, "admin");
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_look_alike() {
        let (service, _, _) = setup().await;
        let wrong = service
            .login("admin", &sealed("nope"), "10.0.0.1", "web")
            .await
            .unwrap_err();
        let unknown = service
            .login("ghost", &sealed("correct horse"), "10.0.0.1", "web")
            .await
            .unwrap_err();
        assert_eq!(wrong.kind, ErrorKind::Authentication);
        assert_eq!(wrong.message, unknown.message);
        assert_eq!(wrong.kind, unknown.kind);
    }

    #[tokio::test]
    async fn test_undecryptable_password_rejected() {
        let (service, _, _) = setup().await;
        let err = service
            .login("admin", "correct horse", "10.0.0.1", "web")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_disabled_account_rejected() {
        let (service, users, _) = setup().await;
        let user = users.get_by_username("admin").await.unwrap().unwrap();
        assert!(users.set_status(user.id, UserStatus::Disabled).await);

        let err = service
            .login("admin", &sealed("correct horse"), "10.0.0.1", "web")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
}
