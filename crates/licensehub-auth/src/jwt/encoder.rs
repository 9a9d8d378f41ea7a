//! JWT token creation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use licensehub_core::config::AuthConfig;
use licensehub_core::error::AppError;

use super::claims::{AUDIENCE, Claims};

/// Creates HS256-signed bearer tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Issuer written into every token.
    issuer: String,
    /// Token lifetime.
    ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            ttl: Duration::hours(config.token_ttl_hours as i64),
        }
    }

    /// Build the claims for a login at `now`.
    pub fn claims(
        &self,
        subject_id: Uuid,
        subject_name: &str,
        ip: &str,
        terminal: &str,
        now: DateTime<Utc>,
    ) -> Claims {
        Claims {
            iss: self.issuer.clone(),
            sub: Some(subject_name.to_string()),
            jti: subject_id.to_string(),
            iat: now.timestamp(),
            nbf: Some(now.timestamp()),
            exp: Some((now + self.ttl).timestamp()),
            aud: AUDIENCE.iter().map(|a| a.to_string()).collect(),
            ip_addr: ip.to_string(),
            terminal: terminal.to_string(),
            access_key: None,
        }
    }

    /// Sign arbitrary claims.
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }
}
