//! Request DTOs with validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use licensehub_entity::license::{LicenseStatus, SealedLicense};

/// Login request body. `password` is RSA-encrypted and base64 encoded.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Encrypted password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Encrypted license envelope `{key, info}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SealedRequest {
    /// Integrity key.
    #[validate(length(min = 1, message = "key is required"))]
    pub key: String,
    /// Encrypted payload.
    #[validate(length(min = 1, message = "info is required"))]
    pub info: String,
}

impl From<SealedRequest> for SealedLicense {
    fn from(req: SealedRequest) -> Self {
        Self {
            key: req.key,
            info: req.info,
        }
    }
}

/// Administrative status override.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    /// Target container.
    #[validate(length(min = 1, message = "containerId is required"))]
    pub container_id: String,
    /// New status.
    pub status: LicenseStatus,
}

/// Binding update. Empty fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BindRequest {
    /// Target container.
    #[validate(length(min = 1, message = "containerId is required"))]
    pub container_id: String,
    /// New ip binding.
    #[serde(default)]
    #[validate(length(max = 64))]
    pub ip: String,
    /// New domain binding.
    #[serde(default)]
    #[validate(length(max = 255))]
    pub domain: String,
    /// New expire date, `YYYYMMDD`.
    #[serde(with = "licensehub_entity::license::expire", default)]
    pub expire: Option<NaiveDate>,
}

/// `?id=<containerId>` query for single-license endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContainerQuery {
    /// Container id.
    #[validate(length(min = 1, message = "id is required"))]
    pub id: String,
}
