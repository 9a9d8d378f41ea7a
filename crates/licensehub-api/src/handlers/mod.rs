//! Route handlers organized by domain.

use axum::Json;

use licensehub_core::types::response::ApiEnvelope;

use crate::error::ApiError;

pub mod auth;
pub mod health;
pub mod license;

/// Handler result carrying an enveloped payload.
pub type ApiResult<T> = Result<Json<ApiEnvelope<T>>, ApiError>;
