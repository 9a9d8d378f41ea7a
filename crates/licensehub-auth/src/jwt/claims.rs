//! JWT claims structure carried by every bearer token.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audience entries naming the two bound client attributes.
pub const AUDIENCE: [&str; 2] = ["ipaddr", "term"];

/// JWT claims payload.
///
/// Field names follow the existing wire format, so the custom claims keep
/// their `IpAddr`, `Terminal` and `accessKey` spellings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer.
    #[serde(default)]
    pub iss: String,
    /// Subject: the username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Token id: the user id.
    #[serde(default)]
    pub jti: String,
    /// Issued-at (seconds since epoch).
    #[serde(default)]
    pub iat: i64,
    /// Not-before (seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Expiry (seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Audience.
    #[serde(default)]
    pub aud: Vec<String>,
    /// Client ip at issuance.
    #[serde(rename = "IpAddr", default)]
    pub ip_addr: String,
    /// Client terminal at issuance.
    #[serde(rename = "Terminal", default)]
    pub terminal: String,
    /// Machine credential used in place of a subject.
    #[serde(rename = "accessKey", default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
}

impl Claims {
    /// Subject, if present and non-empty.
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref().filter(|s| !s.is_empty())
    }

    /// Access key, if present and non-empty.
    pub fn access_key(&self) -> Option<&str> {
        self.access_key.as_deref().filter(|s| !s.is_empty())
    }
}

/// The identity a validated token speaks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// User id.
    pub subject_id: Uuid,
    /// Username; empty when the token authorised through an access key.
    pub subject_name: String,
}
