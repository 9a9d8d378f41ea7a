//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a serde default so a partial file is
//! enough to boot a development instance.

pub mod app;
pub mod auth;
pub mod cache;
pub mod database;
pub mod keys;
pub mod license;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::cache::CacheConfig;
pub use self::database::DatabaseConfig;
pub use self::keys::KeysConfig;
pub use self::license::LicenseConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "LICENSEHUB";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Cache provider settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Password hashing and token settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Asymmetric key material locations.
    #[serde(default)]
    pub keys: KeysConfig,
    /// License verification policy.
    #[serde(default)]
    pub license: LicenseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `LICENSEHUB__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("license.admin_containers")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would leave the trust core half-initialized.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        if !(auth::MIN_COST..=auth::MAX_COST).contains(&self.auth.bcrypt_cost) {
            return Err(AppError::configuration(format!(
                "auth.bcrypt_cost must be within {}..={}, got {}",
                auth::MIN_COST,
                auth::MAX_COST,
                self.auth.bcrypt_cost
            )));
        }
        if self.keys.private_key_pem.is_none() && self.keys.private_key_path.trim().is_empty() {
            return Err(AppError::configuration(
                "keys.private_key_path or keys.private_key_pem must be set",
            ));
        }
        if self.license.heartbeat_window_seconds == 0 {
            return Err(AppError::configuration(
                "license.heartbeat_window_seconds must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.auth.bcrypt_cost, 12);
        assert_eq!(config.license.heartbeat_window_seconds, 300);
    }

    #[test]
    fn test_rejects_out_of_range_cost() {
        let mut config = AppConfig::default();
        config.auth.bcrypt_cost = 32;
        assert!(config.validate().is_err());
        config.auth.bcrypt_cost = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_secret() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
