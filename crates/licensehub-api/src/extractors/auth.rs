//! `AuthUser` extractor: finds the bearer token, validates it against the
//! caller's terminal, and injects the request context.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::warn;

use licensehub_service::context::RequestContext;
use licensehub_service::user::login::BEARER_PREFIX;

use super::client::ClientInfo;
use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the bearer token.
pub const TOKEN_HEADER: &str = "x-token";
/// Query parameter and cookie name carrying the bearer token.
pub const TOKEN_PARAM: &str = "token";

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Header, then query string, then cookie.
fn find_token(parts: &Parts) -> Option<String> {
    let from_header = parts
        .headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    from_header
        .or_else(|| {
            Query::<TokenQuery>::try_from_uri(&parts.uri)
                .ok()
                .and_then(|Query(q)| q.token)
        })
        .or_else(|| {
            CookieJar::from_headers(&parts.headers)
                .get(TOKEN_PARAM)
                .map(|c| c.value().to_string())
        })
        .filter(|t| !t.trim().is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = find_token(parts).ok_or_else(ApiError::check_login)?;
        let client = ClientInfo::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});

        let Some(jwt) = token.strip_prefix(BEARER_PREFIX) else {
            warn!(ip = %client.ip, "Token without bearer prefix");
            return Err(ApiError::no_permission());
        };

        let principal = state.tokens.validate(jwt, &client.terminal).map_err(|e| {
            warn!(ip = %client.ip, terminal = %client.terminal, reason = %e, "Token rejected");
            ApiError::no_permission()
        })?;

        Ok(AuthUser(RequestContext::new(
            principal,
            client.ip,
            client.terminal,
        )))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_token_sources_in_order() {
        let all = parts(
            Request::builder()
                .uri("/license/list?token=from-query")
                .header(TOKEN_HEADER, "from-header")
                .header("cookie", "token=from-cookie"),
        );
        assert_eq!(find_token(&all).as_deref(), Some("from-header"));

        let query_and_cookie = parts(
            Request::builder()
                .uri("/license/list?token=from-query")
                .header("cookie", "token=from-cookie"),
        );
        assert_eq!(find_token(&query_and_cookie).as_deref(), Some("from-query"));

        let cookie = parts(
            Request::builder()
                .uri("/license/list")
                .header("cookie", "theme=dark; token=from-cookie"),
        );
        assert_eq!(find_token(&cookie).as_deref(), Some("from-cookie"));

        assert_eq!(find_token(&parts(Request::builder().uri("/license/list"))), None);
    }
}
