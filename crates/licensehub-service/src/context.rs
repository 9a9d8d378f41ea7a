//! Request context carrying the authenticated principal and client binding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use licensehub_auth::jwt::Principal;

/// Context for the current authenticated request.
///
/// Built by the HTTP layer once the bearer token validates, and passed
/// into service methods so every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The username from the token subject.
    pub username: String,
    /// IP address of the request origin.
    pub ip_address: String,
    /// Terminal the token was presented from.
    pub terminal: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for a validated principal.
    pub fn new(principal: Principal, ip_address: String, terminal: String) -> Self {
        Self {
            user_id: principal.subject_id,
            username: principal.subject_name,
            ip_address,
            terminal,
            request_time: Utc::now(),
        }
    }
}
