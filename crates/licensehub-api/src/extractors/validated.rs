//! JSON body and query extractors that run `validator` rules and reject
//! with a parameter-error envelope.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// A JSON body that deserialized and passed validation.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::param(e.body_text()))?;
        value.validate().map_err(|e| ApiError::param(e.to_string()))?;
        Ok(Self(value))
    }
}

/// A query string that deserialized and passed validation.
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) =
            Query::<T>::try_from_uri(&parts.uri).map_err(|e| ApiError::param(e.body_text()))?;
        value.validate().map_err(|e| ApiError::param(e.to_string()))?;
        Ok(Self(value))
    }
}
