//! bcrypt hashing off the async executor.
//!
//! Every hash or verify holds a semaphore permit while the key schedule runs
//! on the blocking pool, so a burst of logins cannot occupy more than the
//! configured number of cores.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;

use licensehub_core::config::AuthConfig;
use licensehub_core::error::AppError;

use super::bcrypt::{self, Bcrypt};
use crate::error::CryptoError;

/// Bounded bcrypt worker.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    engine: Bcrypt,
    permits: Arc<Semaphore>,
}

impl PasswordHasher {
    /// Build a hasher from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, CryptoError> {
        Self::with_limits(config.bcrypt_cost, config.effective_hash_concurrency())
    }

    /// Build a hasher with an explicit cost and concurrency bound.
    pub fn with_limits(cost: u32, concurrency: usize) -> Result<Self, CryptoError> {
        Ok(Self {
            engine: Bcrypt::with_cost(cost)?,
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
        })
    }

    /// Cost factor of newly produced hashes.
    pub fn cost(&self) -> u32 {
        self.engine.cost()
    }

    /// Hash a password with a fresh salt.
    pub async fn hash(&self, password: &str) -> Result<String, AppError> {
        let engine = self.engine;
        let password = password.to_owned();
        self.run(move || Ok(engine.encode(password.as_bytes())))
            .await
    }

    /// Verify a password against a stored hash.
    ///
    /// A malformed stored hash is an error, not a silent mismatch.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        self.run(move || bcrypt::matches(password.as_bytes(), &hash))
            .await
    }

    async fn run<T, F>(&self, job: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, CryptoError> + Send + 'static,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| AppError::service_unavailable("Password hasher is shut down"))?;
        debug!(
            available = self.permits.available_permits(),
            "Running bcrypt on blocking pool"
        );
        let result = tokio::task::spawn_blocking(job)
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?;
        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use licensehub_core::error::ErrorKind;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = PasswordHasher::with_limits(4, 2).unwrap();
        let hash = hasher.hash("correct horse").await.unwrap();
        assert!(hash.starts_with("$2a$04$"));
        assert!(hasher.verify("correct horse", &hash).await.unwrap());
        assert!(!hasher.verify("wrong horse", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_surfaces_crypto_error() {
        let hasher = PasswordHasher::with_limits(4, 1).unwrap();
        let err = hasher.verify("pw", "not-a-hash").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Crypto);
        assert_eq!(
            err.typed_source::<CryptoError>(),
            Some(&CryptoError::MalformedDigest)
        );
    }

    #[tokio::test]
    async fn test_invalid_cost_rejected() {
        assert_eq!(
            PasswordHasher::with_limits(3, 1).unwrap_err(),
            CryptoError::InvalidCost
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_hashes_complete_with_single_permit() {
        let hasher = PasswordHasher::with_limits(4, 1).unwrap();
        let jobs = (0..8).map(|i| {
            let hasher = hasher.clone();
            tokio::spawn(async move { hasher.hash(&format!("pw-{i}")).await })
        });
        for job in jobs.collect::<Vec<_>>() {
            assert!(job.await.unwrap().is_ok());
        }
        assert_eq!(hasher.permits.available_permits(), 1);
    }
}
