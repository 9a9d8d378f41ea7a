//! License entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::LicenseStatus;

/// A license bound to one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct License {
    /// Unique license identifier.
    pub id: Uuid,
    /// Product or customer name the license was issued under.
    pub name: String,
    /// Installation identity; unique among live licenses.
    pub container_id: String,
    /// Stored lifecycle state.
    pub status: LicenseStatus,
    /// Bound IP address (empty when unbound).
    pub ip: String,
    /// Bound domain (empty when unbound).
    pub domain: String,
    /// Day on which the license expires (from 00:00 UTC).
    #[serde(with = "super::expire", default)]
    pub expire: Option<NaiveDate>,
    /// Time of the last successful verification.
    pub last_online_at: Option<DateTime<Utc>>,
    /// When the license was created.
    pub created_at: DateTime<Utc>,
    /// When the license was last updated.
    pub updated_at: DateTime<Utc>,
    /// Tombstone; set when the license is removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl License {
    /// Whether the license has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether `ip` or `domain` (when non-empty) is held by this license.
    pub fn holds_binding(&self, ip: &str, domain: &str) -> bool {
        (!ip.is_empty() && self.ip == ip) || (!domain.is_empty() && self.domain == domain)
    }
}

/// Data required to register a new license.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLicense {
    /// License name.
    pub name: String,
    /// Container the license is bound to.
    pub container_id: String,
    /// Initial status.
    pub status: LicenseStatus,
    /// Initial IP binding.
    pub ip: String,
    /// Initial domain binding.
    pub domain: String,
    /// Expire date.
    pub expire: Option<NaiveDate>,
}

/// Partial update of a license's binding fields. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseChanges {
    /// New IP binding.
    pub ip: Option<String>,
    /// New domain binding.
    pub domain: Option<String>,
    /// New expire date.
    pub expire: Option<NaiveDate>,
}

impl LicenseChanges {
    /// Whether the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.ip.is_none() && self.domain.is_none() && self.expire.is_none()
    }

    /// Apply the changes to a license in place.
    pub fn apply(&self, license: &mut License) {
        if let Some(ip) = &self.ip {
            license.ip = ip.clone();
        }
        if let Some(domain) = &self.domain {
            license.domain = domain.clone();
        }
        if let Some(expire) = self.expire {
            license.expire = Some(expire);
        }
    }
}
