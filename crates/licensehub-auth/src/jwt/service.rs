//! Token issuance and validation behind one handle.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use licensehub_core::config::AuthConfig;
use licensehub_core::error::AppError;

use super::claims::Principal;
use super::decoder::JwtDecoder;
use super::encoder::JwtEncoder;
use crate::error::TokenError;

/// Stateless token service. There is no revocation list; a token is good
/// until it expires.
#[derive(Debug, Clone)]
pub struct TokenService {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl TokenService {
    /// Build from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
        }
    }

    /// Issue a token for a user logging in from `ip` and `terminal`.
    pub fn issue(
        &self,
        subject_id: Uuid,
        subject_name: &str,
        ip: &str,
        terminal: &str,
    ) -> Result<String, AppError> {
        self.issue_at(subject_id, subject_name, ip, terminal, Utc::now())
    }

    /// Issue a token as if it were `now`.
    pub fn issue_at(
        &self,
        subject_id: Uuid,
        subject_name: &str,
        ip: &str,
        terminal: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = self
            .encoder
            .claims(subject_id, subject_name, ip, terminal, now);
        self.encoder.encode(&claims)
    }

    /// Validate a token presented from `expected_terminal`.
    pub fn validate(&self, token: &str, expected_terminal: &str) -> Result<Principal, TokenError> {
        self.validate_at(token, expected_terminal, Utc::now())
    }

    /// Validate a token as if it were `now`.
    pub fn validate_at(
        &self,
        token: &str,
        expected_terminal: &str,
        now: DateTime<Utc>,
    ) -> Result<Principal, TokenError> {
        self.decoder.validate_at(token, expected_terminal, now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::jwt::claims::Claims;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            ..AuthConfig::default()
        }
    }

    fn service() -> TokenService {
        TokenService::new(&config())
    }

    #[test]
    fn test_issue_validate_round_trip() {
        let svc = service();
        let id = Uuid::new_v4();
        let token = svc.issue(id, "admin", "10.0.0.1", "web").unwrap();
        assert_eq!(token.split('.').count(), 3);

        let principal = svc.validate(&token, "web").unwrap();
        assert_eq!(principal.subject_id, id);
        assert_eq!(principal.subject_name, "admin");
    }

    #[test]
    fn test_claims_layout() {
        let svc = service();
        let id = Uuid::new_v4();
        let now = Utc::now();
        let token = svc.issue_at(id, "admin", "10.0.0.1", "web", now).unwrap();
        let claims = svc.decoder.decode(&token).unwrap();
        assert_eq!(claims.iss, "licensehub");
        assert_eq!(claims.jti, id.to_string());
        assert_eq!(claims.aud, vec!["ipaddr", "term"]);
        assert_eq!(claims.ip_addr, "10.0.0.1");
        assert_eq!(claims.nbf, Some(now.timestamp()));
        assert_eq!(claims.exp, Some((now + Duration::hours(24)).timestamp()));
    }

    #[test]
    fn test_terminal_mismatch() {
        let svc = service();
        let token = svc.issue(Uuid::new_v4(), "admin", "", "web").unwrap();
        assert_eq!(svc.validate(&token, "mobile"), Err(TokenError::TerminalMismatch));
    }

    #[test]
    fn test_temporal_checks() {
        let svc = service();
        let now = Utc::now();
        let token = svc.issue_at(Uuid::new_v4(), "admin", "", "web", now).unwrap();
        assert_eq!(
            svc.validate_at(&token, "web", now + Duration::hours(24) + Duration::seconds(1)),
            Err(TokenError::Expired)
        );
        assert_eq!(
            svc.validate_at(&token, "web", now - Duration::seconds(5)),
            Err(TokenError::NotYetValid)
        );
        assert!(svc.validate_at(&token, "web", now + Duration::hours(24)).is_ok());
    }

    #[test]
    fn test_leeway_extends_window() {
        let svc = TokenService::new(&AuthConfig {
            leeway_seconds: 60,
            ..config()
        });
        let now = Utc::now();
        let token = svc.issue_at(Uuid::new_v4(), "admin", "", "web", now).unwrap();
        assert!(
            svc.validate_at(&token, "web", now + Duration::hours(24) + Duration::seconds(30))
                .is_ok()
        );
    }

    #[test]
    fn test_checks_run_in_order() {
        let other = TokenService::new(&AuthConfig {
            jwt_issuer: "someone-else".to_string(),
            ..config()
        });
        let now = Utc::now();
        let token = other.issue_at(Uuid::new_v4(), "admin", "", "web", now).unwrap();
        // Wrong issuer wins over wrong terminal.
        assert_eq!(service().validate(&token, "mobile"), Err(TokenError::IssuerMismatch));

        // Wrong terminal wins over expiry.
        let token = service().issue_at(Uuid::new_v4(), "admin", "", "web", now).unwrap();
        assert_eq!(
            service().validate_at(&token, "mobile", now + Duration::days(2)),
            Err(TokenError::TerminalMismatch)
        );
    }

    #[test]
    fn test_wrong_secret_or_garbage_is_unverifiable() {
        let other = TokenService::new(&AuthConfig {
            jwt_secret: "another-secret".to_string(),
            ..config()
        });
        let token = other.issue(Uuid::new_v4(), "admin", "", "web").unwrap();
        assert_eq!(service().validate(&token, "web"), Err(TokenError::Unverifiable));
        assert_eq!(service().validate("a.b.c", "web"), Err(TokenError::Unverifiable));
        assert_eq!(service().validate("", "web"), Err(TokenError::Unverifiable));
    }

    #[test]
    fn test_subject_or_access_key_required() {
        let svc = service();
        let now = Utc::now();
        let id = Uuid::new_v4();
        let mut claims: Claims = svc.encoder.claims(id, "admin", "", "web", now);
        claims.sub = None;
        let token = svc.encoder.encode(&claims).unwrap();
        assert_eq!(svc.validate(&token, "web"), Err(TokenError::ClaimsInvalid));

        claims.access_key = Some("ak-123".to_string());
        let token = svc.encoder.encode(&claims).unwrap();
        let principal = svc.validate(&token, "web").unwrap();
        assert_eq!(principal.subject_id, id);
        assert_eq!(principal.subject_name, "");
    }
}
