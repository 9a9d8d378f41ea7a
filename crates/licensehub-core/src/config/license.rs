//! License verification policy configuration.

use serde::{Deserialize, Serialize};

/// Container id exempt from the online-exclusivity check out of the box.
pub const DEFAULT_ADMIN_CONTAINER: &str =
    "a6b67a6b8c7bc39b55e8b0af5e771d6e8b6a9aa382d872af611118282d5ab886";

/// License system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseConfig {
    /// Container ids that may verify while another heartbeat is still fresh.
    #[serde(default = "default_admin_containers")]
    pub admin_containers: Vec<String>,
    /// Length of the heartbeat window in seconds.
    #[serde(default = "default_heartbeat_window")]
    pub heartbeat_window_seconds: u64,
    /// Page size used when a list request omits one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            admin_containers: default_admin_containers(),
            heartbeat_window_seconds: default_heartbeat_window(),
            default_page_size: default_page_size(),
        }
    }
}

fn default_admin_containers() -> Vec<String> {
    vec![DEFAULT_ADMIN_CONTAINER.to_string()]
}

fn default_heartbeat_window() -> u64 {
    300
}

fn default_page_size() -> u64 {
    20
}
