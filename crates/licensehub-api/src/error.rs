//! Maps domain `AppError` to HTTP responses wrapped in the envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

use licensehub_core::error::{AppError, ErrorKind};
use licensehub_core::types::response::{ApiEnvelope, codes};
use licensehub_service::license::LicenseError;

/// An error ready to be rendered as an envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: i32,
    msg: String,
    error: Option<String>,
}

impl ApiError {
    /// Build an error with an explicit status and envelope code.
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
            error: None,
        }
    }

    /// No credentials were presented.
    pub fn check_login() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, codes::CHECK_LOGIN, "please log in")
    }

    /// Credentials were presented but do not grant access.
    pub fn no_permission() -> Self {
        Self::new(StatusCode::FORBIDDEN, codes::NO_PERMISSION, "no permission")
    }

    /// Malformed request parameters.
    pub fn param(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::PARAM_ERR, msg)
    }

    /// HTTP status of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Envelope code of the response.
    pub fn code(&self) -> i32 {
        self.code
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let (status, code) = match err.kind {
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, codes::NOT_FOUND),
            ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, codes::CREDENTIAL_INVALID),
            ErrorKind::Authorization | ErrorKind::Token => {
                (StatusCode::FORBIDDEN, codes::NO_PERMISSION)
            }
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, codes::PARAM_ERR),
            ErrorKind::Conflict => match err.typed_source::<LicenseError>() {
                Some(LicenseError::AlreadyBound) => {
                    (StatusCode::CONFLICT, codes::NOT_FULLY_SUCCESS)
                }
                _ => (StatusCode::CONFLICT, codes::CONFLICT),
            },
            ErrorKind::License => (StatusCode::FORBIDDEN, codes::CHECK_LOGIN),
            ErrorKind::Database => (StatusCode::INTERNAL_SERVER_ERROR, codes::DB_ERROR),
            ErrorKind::ServiceUnavailable => (StatusCode::SERVICE_UNAVAILABLE, codes::INTERNAL),
            ErrorKind::Internal
            | ErrorKind::Cache
            | ErrorKind::Configuration
            | ErrorKind::Crypto
            | ErrorKind::Codec
            | ErrorKind::Serialization => (StatusCode::INTERNAL_SERVER_ERROR, codes::INTERNAL),
        };

        if status.is_server_error() {
            error!(kind = %err.kind, error = %err, "Request failed");
            // Internal detail stays in the log.
            let msg = match code {
                codes::DB_ERROR => "database error",
                _ => "internal error",
            };
            return Self {
                status,
                code,
                msg: msg.to_string(),
                error: Some(err.kind.to_string()),
            };
        }

        debug!(kind = %err.kind, error = %err, "Request rejected");
        Self {
            status,
            code,
            msg: err.message,
            error: Some(err.kind.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiEnvelope::failure(self.code, self.msg, self.error);
        (self.status, Json(body)).into_response()
    }
}
