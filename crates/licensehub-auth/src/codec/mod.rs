//! Asymmetric credential codec.
//!
//! One RSA key pair is loaded at startup and shared read-only. Signatures
//! carry a key id so a second key can be introduced without a wire change.

pub mod keys;
pub mod rsa;

pub use keys::{KeyPairPaths, fingerprint, generate_key_pair};
pub use self::rsa::RsaCodec;
