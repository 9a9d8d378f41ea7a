//! Cache key builders for LicenseHub cache entries.
//!
//! Backend-level prefixes (such as the Redis `key_prefix`) are applied by
//! the provider, not here.

use uuid::Uuid;

/// Cache key for a user entity by ID.
pub fn user_by_id(user_id: Uuid) -> String {
    format!("user:{user_id}")
}
