//! JWT token validation.
//!
//! The library only checks the signature and shape. Issuer, terminal,
//! temporal and subject checks run here so their order is fixed:
//! issuer, terminal, `nbf`/`exp`, then subject or access key.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;
use uuid::Uuid;

use licensehub_core::config::AuthConfig;

use super::claims::{Claims, Principal};
use crate::error::TokenError;

/// Validates bearer tokens against the shared secret.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Signature-only validation settings.
    validation: Validation,
    /// Expected issuer.
    issuer: String,
    /// Allowed clock skew in seconds.
    leeway: i64,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("issuer", &self.issuer)
            .field("leeway", &self.leeway)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            issuer: config.jwt_issuer.clone(),
            leeway: config.leeway_seconds as i64,
        }
    }

    /// Verify the signature and return the raw claims.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token signature or shape rejected");
                TokenError::Unverifiable
            })
    }

    /// Validate a token for a request from `expected_terminal` at `now`.
    pub fn validate_at(
        &self,
        token: &str,
        expected_terminal: &str,
        now: DateTime<Utc>,
    ) -> Result<Principal, TokenError> {
        let claims = self.decode(token)?;

        if claims.iss != self.issuer {
            return Err(TokenError::IssuerMismatch);
        }
        if claims.terminal != expected_terminal {
            return Err(TokenError::TerminalMismatch);
        }

        let now = now.timestamp();
        if claims.nbf.is_some_and(|nbf| now + self.leeway < nbf) {
            return Err(TokenError::NotYetValid);
        }
        if claims.exp.is_some_and(|exp| now - self.leeway > exp) {
            return Err(TokenError::Expired);
        }

        match (claims.subject(), claims.access_key()) {
            (None, None) => Err(TokenError::ClaimsInvalid),
            (subject, _) => {
                let subject_id =
                    Uuid::parse_str(&claims.jti).map_err(|_| TokenError::ClaimsInvalid)?;
                Ok(Principal {
                    subject_id,
                    subject_name: subject.unwrap_or_default().to_string(),
                })
            }
        }
    }
}
