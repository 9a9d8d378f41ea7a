//! Key material locations for the asymmetric codec.

use serde::{Deserialize, Serialize};

/// Where the service key pair is loaded from at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysConfig {
    /// Path to the PEM private key (PKCS#1 or PKCS#8).
    #[serde(default = "default_private_key_path")]
    pub private_key_path: String,
    /// Path to the PEM public key. Only used by tooling; the server derives
    /// the public half from the private key.
    #[serde(default = "default_public_key_path")]
    pub public_key_path: String,
    /// Inline PEM private key; takes precedence over `private_key_path`.
    #[serde(default)]
    pub private_key_pem: Option<String>,
    /// Identifier attached to signatures. Derived from the public key
    /// fingerprint when empty.
    #[serde(default)]
    pub key_id: Option<String>,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            private_key_path: default_private_key_path(),
            public_key_path: default_public_key_path(),
            private_key_pem: None,
            key_id: None,
        }
    }
}

fn default_private_key_path() -> String {
    "keys/private.pem".to_string()
}

fn default_public_key_path() -> String {
    "keys/public.pem".to_string()
}
