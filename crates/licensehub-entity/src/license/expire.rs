//! Serde helpers for the compact `YYYYMMDD` expire-date format.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer};

/// chrono format string for expire dates.
pub const FORMAT: &str = "%Y%m%d";

/// Parse an expire date; empty input means "no expiry".
pub fn parse(value: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, FORMAT).map(Some)
}

/// Render an expire date, or the empty string when unset.
pub fn format(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format(FORMAT).to_string())
        .unwrap_or_default()
}

pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(*value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        Some(s) => parse(&s).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
