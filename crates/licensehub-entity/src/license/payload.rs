//! Wire-level license value objects exchanged with licensed installations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::model::License;
use super::status::LicenseStatus;

/// Plaintext license claim sent by an installation.
///
/// Only `containerId` and `name` are consulted during verification; the
/// remaining fields are accepted when a new license is registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicensePayload {
    /// License name.
    #[serde(default)]
    pub name: String,
    /// Installation identity.
    pub container_id: String,
    /// Client's view of the status. Never trusted.
    #[serde(default)]
    pub status: Option<LicenseStatus>,
    /// Requested IP binding.
    #[serde(default)]
    pub ip: String,
    /// Requested domain binding.
    #[serde(default)]
    pub domain: String,
    /// Requested expire date.
    #[serde(with = "super::expire", default)]
    pub expire: Option<NaiveDate>,
    /// Client timestamp.
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
}

/// Encrypted payload plus integrity key: `{key, info}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedLicense {
    /// Hex digest of the plaintext payload.
    pub key: String,
    /// Base64 RSA ciphertext of the payload JSON.
    pub info: String,
}

/// The sanitized subset of a license returned to installations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseGrant {
    /// License name.
    pub name: String,
    /// Installation identity.
    pub container_id: String,
    /// Status as stored.
    pub status: LicenseStatus,
}

impl From<&License> for LicenseGrant {
    fn from(license: &License) -> Self {
        Self {
            name: license.name.clone(),
            container_id: license.container_id.clone(),
            status: license.status,
        }
    }
}

/// A signed response: `{sign, data, kid}`.
///
/// `sign` is the base64 signature over exactly the bytes of `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedLicense {
    /// Base64 signature.
    pub sign: String,
    /// JSON text that was signed.
    pub data: String,
    /// Identifier of the signing key.
    pub kid: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_accepts_minimal_json() {
        let payload: LicensePayload =
            serde_json::from_str(r#"{"name":"acme","containerId":"c-1"}"#).unwrap();
        assert_eq!(payload.container_id, "c-1");
        assert_eq!(payload.expire, None);
        assert_eq!(payload.status, None);
    }

    #[test]
    fn test_payload_full_json() {
        let payload: LicensePayload = serde_json::from_str(
            r#"{"name":"acme","containerId":"c-1","status":0,"ip":"1.2.3.4","domain":"","expire":"20301231","time":"2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(payload.expire, NaiveDate::from_ymd_opt(2030, 12, 31));
        assert_eq!(payload.ip, "1.2.3.4");
        assert!(payload.time.is_some());
    }

    #[test]
    fn test_grant_field_order() {
        let grant = LicenseGrant {
            name: "acme".to_string(),
            container_id: "c-1".to_string(),
            status: LicenseStatus::Valid,
        };
        assert_eq!(
            serde_json::to_string(&grant).unwrap(),
            r#"{"name":"acme","containerId":"c-1","status":0}"#
        );
    }
}
