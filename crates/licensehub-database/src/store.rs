//! Storage interfaces consumed by the service layer.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use licensehub_core::config::DatabaseConfig;
use licensehub_core::error::{AppError, ErrorKind};
use licensehub_core::result::AppResult;
use licensehub_core::types::pagination::{PageRequest, PageResponse};
use licensehub_entity::license::{License, LicenseChanges, LicenseStatus, NewLicense};
use licensehub_entity::user::{CreateUser, User};

use crate::connection::DatabasePool;
use crate::memory::{MemoryLicenseStore, MemoryUserStore};
use crate::migration::run_migrations;
use crate::repositories::{LicenseRepository, UserRepository};

/// Source attached to the `Conflict` raised when a write would give a live
/// license an ip or domain another live license already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("ip or domain already bound to another license")]
pub struct BindingConflict;

impl BindingConflict {
    /// Wrap into the `Conflict` error returned by the stores.
    pub fn into_error(self) -> AppError {
        AppError::with_source(ErrorKind::Conflict, "Binding already in use", self)
    }
}

/// Persistence for license records.
///
/// Soft-deleted rows are invisible to every method.
#[async_trait]
pub trait LicenseStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a live license by its container id.
    async fn get_by_container_id(&self, container_id: &str) -> AppResult<Option<License>>;

    /// Find a live license by primary key.
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<License>>;

    /// Insert a new license.
    ///
    /// Fails with `Conflict` when the container id is taken, and with a
    /// [`BindingConflict`]-sourced `Conflict` when its non-empty ip or domain
    /// is held by another live license. The check and the insert are atomic.
    async fn create(&self, license: NewLicense) -> AppResult<License>;

    /// Apply a partial update of the binding fields.
    ///
    /// A non-empty ip or domain held by another live license fails with a
    /// [`BindingConflict`]-sourced `Conflict` and nothing is written.
    async fn update_fields(&self, id: Uuid, changes: &LicenseChanges) -> AppResult<Option<License>>;

    /// Overwrite the status. Returns whether a row was updated.
    async fn update_status(&self, id: Uuid, status: LicenseStatus) -> AppResult<bool>;

    /// Compare-and-swap the heartbeat.
    ///
    /// Sets `last_online_at = now` only if it still equals `expected`.
    /// Returns `false` when another writer got there first.
    async fn touch_heartbeat(
        &self,
        id: Uuid,
        expected: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Move the heartbeat forward to `now` without comparing.
    ///
    /// Never moves it backwards. Returns whether a live row was found.
    async fn advance_heartbeat(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<bool>;

    /// List live licenses, newest first, optionally filtered by name substring.
    async fn list(
        &self,
        name_filter: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<License>>;

    /// Tombstone a license. Returns whether a live row was found.
    async fn soft_delete(&self, container_id: &str) -> AppResult<bool>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Persistence for operator accounts.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by username (case-insensitive).
    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find a user by primary key.
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Insert a new user. Fails with `Conflict` on a duplicate username.
    async fn create(&self, user: CreateUser) -> AppResult<User>;
}

/// The pair of stores the services run against.
#[derive(Debug, Clone)]
pub struct Stores {
    /// License persistence.
    pub licenses: Arc<dyn LicenseStore>,
    /// User persistence.
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    /// In-memory stores with no persistence.
    pub fn memory() -> Self {
        Self {
            licenses: Arc::new(MemoryLicenseStore::new()),
            users: Arc::new(MemoryUserStore::new()),
        }
    }

    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: &DatabasePool) -> Self {
        Self {
            licenses: Arc::new(LicenseRepository::new(pool.pool().clone())),
            users: Arc::new(UserRepository::new(pool.pool().clone())),
        }
    }

    /// Build stores from configuration.
    ///
    /// `database.url = "memory"` selects the in-memory stores; anything else
    /// connects to PostgreSQL and applies pending migrations.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        if config.is_memory() {
            info!("Using in-memory stores; data will not survive a restart");
            return Ok(Self::memory());
        }
        let pool = DatabasePool::connect(config).await?;
        run_migrations(pool.pool()).await?;
        Ok(Self::postgres(&pool))
    }
}
