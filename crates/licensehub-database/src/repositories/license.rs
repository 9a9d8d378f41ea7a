//! License repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use licensehub_core::error::{AppError, ErrorKind};
use licensehub_core::result::AppResult;
use licensehub_core::types::pagination::{PageRequest, PageResponse};
use licensehub_entity::license::{License, LicenseChanges, LicenseStatus, NewLicense};

use super::map_write_error;
use crate::store::{BindingConflict, LicenseStore};

/// Unique indexes guarding live ip and domain bindings.
const BINDING_INDEXES: [&str; 2] = ["idx_licenses_ip_live", "idx_licenses_domain_live"];

/// Map a write error, reporting binding index violations as [`BindingConflict`].
fn map_binding_error(err: sqlx::Error, context: &str, conflict: &str) -> AppError {
    let binding = err
        .as_database_error()
        .and_then(|db| db.constraint())
        .is_some_and(|name| BINDING_INDEXES.contains(&name));
    if binding {
        BindingConflict.into_error()
    } else {
        map_write_error(err, context, conflict)
    }
}

/// Repository for license records.
#[derive(Debug, Clone)]
pub struct LicenseRepository {
    pool: PgPool,
}

impl LicenseRepository {
    /// Create a new license repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LicenseStore for LicenseRepository {
    async fn get_by_container_id(&self, container_id: &str) -> AppResult<Option<License>> {
        sqlx::query_as::<_, License>(
            "SELECT * FROM licenses WHERE container_id = $1 AND deleted_at IS NULL",
        )
        .bind(container_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find license by container", e)
        })
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<License>> {
        sqlx::query_as::<_, License>("SELECT * FROM licenses WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find license by id", e)
            })
    }

    async fn create(&self, license: NewLicense) -> AppResult<License> {
        sqlx::query_as::<_, License>(
            "INSERT INTO licenses (id, name, container_id, status, ip, domain, expire) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&license.name)
        .bind(&license.container_id)
        .bind(license.status)
        .bind(&license.ip)
        .bind(&license.domain)
        .bind(license.expire)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_binding_error(e, "Failed to create license", "Container already registered"))
    }

    async fn update_fields(&self, id: Uuid, changes: &LicenseChanges) -> AppResult<Option<License>> {
        sqlx::query_as::<_, License>(
            "UPDATE licenses SET \
                ip = COALESCE($2, ip), \
                domain = COALESCE($3, domain), \
                expire = COALESCE($4, expire), \
                updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .bind(changes.ip.as_deref())
        .bind(changes.domain.as_deref())
        .bind(changes.expire)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_binding_error(e, "Failed to update license", "License update conflict"))
    }

    async fn update_status(&self, id: Uuid, status: LicenseStatus) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE licenses SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(status)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update license status", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn touch_heartbeat(
        &self,
        id: Uuid,
        expected: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE licenses SET last_online_at = $3, updated_at = NOW() \
             WHERE id = $1 AND last_online_at IS NOT DISTINCT FROM $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(expected)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record heartbeat", e))?;
        Ok(result.rows_affected() == 1)
    }

    async fn advance_heartbeat(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE licenses SET last_online_at = GREATEST(last_online_at, $2), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record heartbeat", e))?;
        Ok(result.rows_affected() == 1)
    }

    async fn list(
        &self,
        name_filter: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<License>> {
        let pattern = name_filter
            .filter(|n| !n.is_empty())
            .map(|n| format!("%{n}%"));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM licenses \
             WHERE deleted_at IS NULL AND ($1::TEXT IS NULL OR name ILIKE $1)",
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count licenses", e))?;

        let licenses = sqlx::query_as::<_, License>(
            "SELECT * FROM licenses \
             WHERE deleted_at IS NULL AND ($1::TEXT IS NULL OR name ILIKE $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(pattern.as_deref())
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list licenses", e))?;

        Ok(PageResponse::new(
            licenses,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn soft_delete(&self, container_id: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE licenses SET deleted_at = NOW(), updated_at = NOW() \
             WHERE container_id = $1 AND deleted_at IS NULL",
        )
        .bind(container_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove license", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
