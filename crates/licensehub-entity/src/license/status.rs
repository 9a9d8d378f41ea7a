//! License status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use licensehub_core::AppError;

/// Lifecycle state of a license.
///
/// Stored and transmitted as its integer discriminant so existing clients
/// keep reading `0`, `1`, `2`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[serde(into = "i16", try_from = "i16")]
#[repr(i16)]
pub enum LicenseStatus {
    /// Usable; verification may succeed.
    #[default]
    Valid = 0,
    /// Disabled by an administrator or pending activation.
    Invalid = 1,
    /// Past its expire date. Never reverts on its own.
    Expired = 2,
}

impl LicenseStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Expired => "expired",
        }
    }
}

impl From<LicenseStatus> for i16 {
    fn from(status: LicenseStatus) -> Self {
        status as i16
    }
}

impl TryFrom<i16> for LicenseStatus {
    type Error = AppError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Valid),
            1 => Ok(Self::Invalid),
            2 => Ok(Self::Expired),
            other => Err(AppError::validation(format!(
                "Invalid license status code: {other}. Expected 0, 1 or 2"
            ))),
        }
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LicenseStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "valid" | "0" => Ok(Self::Valid),
            "invalid" | "1" => Ok(Self::Invalid),
            "expired" | "2" => Ok(Self::Expired),
            _ => Err(AppError::validation(format!(
                "Invalid license status: '{s}'. Expected one of: valid, invalid, expired"
            ))),
        }
    }
}
