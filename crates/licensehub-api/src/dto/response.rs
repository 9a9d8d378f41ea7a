//! Response DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use licensehub_entity::license::{License, LicenseStatus};
use licensehub_entity::user::User;

/// Administrative view of a license.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseView {
    /// License name.
    pub name: String,
    /// Container id.
    pub container_id: String,
    /// Stored status.
    pub status: LicenseStatus,
    /// Bound ip.
    pub ip: String,
    /// Bound domain.
    pub domain: String,
    /// Expire date.
    #[serde(with = "licensehub_entity::license::expire", default)]
    pub expire: Option<NaiveDate>,
    /// Last successful verification.
    pub last_online_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<License> for LicenseView {
    fn from(license: License) -> Self {
        Self {
            name: license.name,
            container_id: license.container_id,
            status: license.status,
            ip: license.ip,
            domain: license.domain,
            expire: license.expire,
            last_online_at: license.last_online_at,
            created_at: license.created_at,
        }
    }
}

/// Profile of the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// Username.
    pub username: String,
    /// Email, if set.
    pub email: Option<String>,
    /// Nickname, if set.
    pub nick: Option<String>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            nick: user.nick,
        }
    }
}

/// Health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Whether the store answered.
    pub database: bool,
    /// Whether the cache answered.
    pub cache: bool,
}
