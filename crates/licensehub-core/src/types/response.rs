//! The `{code, data, msg, error}` envelope every HTTP response is wrapped in.

use serde::{Deserialize, Serialize};

/// Numeric envelope codes understood by existing clients.
pub mod codes {
    /// Request succeeded.
    pub const OK: i32 = 200;
    /// Operation partially applied or refused without error (binding collision).
    pub const NOT_FULLY_SUCCESS: i32 = 203;
    /// Caller is not logged in.
    pub const CHECK_LOGIN: i32 = 401;
    /// Caller's token does not grant access.
    pub const NO_PERMISSION: i32 = 403;
    /// Resource not found.
    pub const NOT_FOUND: i32 = 404;
    /// Request parameters are invalid.
    pub const PARAM_ERR: i32 = 40001;
    /// Conflicting resource state.
    pub const CONFLICT: i32 = 40009;
    /// Username or password rejected.
    pub const CREDENTIAL_INVALID: i32 = 40020;
    /// Storage failure.
    pub const DB_ERROR: i32 = 50001;
    /// Unexpected server failure.
    pub const INTERNAL: i32 = 50002;
}

/// Standard response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Envelope code (see [`codes`]).
    pub code: i32,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message.
    #[serde(default)]
    pub msg: String,
    /// Error detail, present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            code: codes::OK,
            data: Some(data),
            msg: String::new(),
            error: None,
        }
    }
}

impl ApiEnvelope<()> {
    /// Successful envelope without a payload.
    pub fn empty() -> Self {
        Self {
            code: codes::OK,
            data: None,
            msg: String::new(),
            error: None,
        }
    }

    /// Failure envelope.
    pub fn failure(code: i32, msg: impl Into<String>, error: Option<String>) -> Self {
        Self {
            code,
            data: None,
            msg: msg.into(),
            error,
        }
    }
}
