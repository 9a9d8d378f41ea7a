//! In-memory license store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use licensehub_core::error::AppError;
use licensehub_core::result::AppResult;
use licensehub_core::types::pagination::{PageRequest, PageResponse};
use licensehub_entity::license::{License, LicenseChanges, LicenseStatus, NewLicense};

use crate::store::{BindingConflict, LicenseStore};

/// License store holding every row, including tombstones, in memory.
#[derive(Debug, Default)]
pub struct MemoryLicenseStore {
    rows: RwLock<HashMap<Uuid, License>>,
}

impl MemoryLicenseStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed record, bypassing creation defaults.
    ///
    /// Fails with `Conflict` when a live row already owns the container id.
    pub async fn insert(&self, license: License) -> AppResult<()> {
        let mut rows = self.rows.write().await;
        if live(&rows).any(|l| l.container_id == license.container_id) {
            return Err(AppError::conflict("Container already registered"));
        }
        rows.insert(license.id, license);
        Ok(())
    }
}

fn live(rows: &HashMap<Uuid, License>) -> impl Iterator<Item = &License> {
    rows.values().filter(|l| !l.is_deleted())
}

/// Whether a live row other than `owner` holds the non-empty ip or domain.
fn binding_taken(rows: &HashMap<Uuid, License>, owner: Uuid, ip: &str, domain: &str) -> bool {
    live(rows).any(|l| l.id != owner && l.holds_binding(ip, domain))
}

#[async_trait]
impl LicenseStore for MemoryLicenseStore {
    async fn get_by_container_id(&self, container_id: &str) -> AppResult<Option<License>> {
        let rows = self.rows.read().await;
        Ok(live(&rows).find(|l| l.container_id == container_id).cloned())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<License>> {
        let rows = self.rows.read().await;
        Ok(rows.get(&id).filter(|l| !l.is_deleted()).cloned())
    }

    async fn create(&self, license: NewLicense) -> AppResult<License> {
        let now = Utc::now();
        let record = License {
            id: Uuid::new_v4(),
            name: license.name,
            container_id: license.container_id,
            status: license.status,
            ip: license.ip,
            domain: license.domain,
            expire: license.expire,
            last_online_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let mut rows = self.rows.write().await;
        if live(&rows).any(|l| l.container_id == record.container_id) {
            return Err(AppError::conflict("Container already registered"));
        }
        if binding_taken(&rows, record.id, &record.ip, &record.domain) {
            return Err(BindingConflict.into_error());
        }
        rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_fields(&self, id: Uuid, changes: &LicenseChanges) -> AppResult<Option<License>> {
        let mut rows = self.rows.write().await;
        let ip = changes.ip.as_deref().unwrap_or_default();
        let domain = changes.domain.as_deref().unwrap_or_default();
        if binding_taken(&rows, id, ip, domain) {
            return Err(BindingConflict.into_error());
        }
        match rows.get_mut(&id).filter(|l| !l.is_deleted()) {
            Some(license) => {
                changes.apply(license);
                license.updated_at = Utc::now();
                Ok(Some(license.clone()))
            }
            None => Ok(None),
        }
    }

    async fn update_status(&self, id: Uuid, status: LicenseStatus) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id).filter(|l| !l.is_deleted()) {
            Some(license) => {
                license.status = status;
                license.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn touch_heartbeat(
        &self,
        id: Uuid,
        expected: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id).filter(|l| !l.is_deleted()) {
            Some(license) if license.last_online_at == expected => {
                license.last_online_at = Some(now);
                license.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn advance_heartbeat(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id).filter(|l| !l.is_deleted()) {
            Some(license) => {
                license.last_online_at = license.last_online_at.max(Some(now));
                license.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(
        &self,
        name_filter: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<License>> {
        let rows = self.rows.read().await;
        let needle = name_filter
            .filter(|n| !n.is_empty())
            .map(str::to_lowercase);
        let mut matched: Vec<License> = live(&rows)
            .filter(|l| match &needle {
                Some(n) => l.name.to_lowercase().contains(n),
                None => true,
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn soft_delete(&self, container_id: &str) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        let now = Utc::now();
        match rows
            .values_mut()
            .find(|l| !l.is_deleted() && l.container_id == container_id)
        {
            Some(license) => {
                license.deleted_at = Some(now);
                license.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use licensehub_core::error::ErrorKind;

    use super::*;

    fn new_license(container: &str, ip: &str) -> NewLicense {
        NewLicense {
            name: "acme".to_string(),
            container_id: container.to_string(),
            status: LicenseStatus::Valid,
            ip: ip.to_string(),
            domain: String::new(),
            expire: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_container() {
        let store = MemoryLicenseStore::new();
        store.create(new_license("c-1", "")).await.unwrap();
        let err = store.create(new_license("c-1", "")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_soft_deleted_rows_are_invisible() {
        let store = MemoryLicenseStore::new();
        let created = store.create(new_license("c-1", "10.0.0.1")).await.unwrap();
        assert!(store.soft_delete("c-1").await.unwrap());
        assert!(!store.soft_delete("c-1").await.unwrap());
        assert!(store.get_by_container_id("c-1").await.unwrap().is_none());
        assert!(store.get_by_id(created.id).await.unwrap().is_none());
        // The container id and its ip can be registered again once tombstoned.
        store.create(new_license("c-1", "10.0.0.1")).await.unwrap();
    }

    #[tokio::test]
    async fn test_touch_heartbeat_is_compare_and_swap() {
        let store = MemoryLicenseStore::new();
        let created = store.create(new_license("c-1", "")).await.unwrap();
        let now = Utc::now();

        assert!(store.touch_heartbeat(created.id, None, now).await.unwrap());
        // Second writer still expects the old value and loses.
        assert!(!store.touch_heartbeat(created.id, None, now).await.unwrap());

        let later = now + Duration::minutes(6);
        assert!(store.touch_heartbeat(created.id, Some(now), later).await.unwrap());
        let stored = store.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.last_online_at, Some(later));
    }

    #[tokio::test]
    async fn test_concurrent_heartbeats_single_winner() {
        let store = Arc::new(MemoryLicenseStore::new());
        let created = store.create(new_license("c-1", "")).await.unwrap();
        let id = created.id;
        let now = Utc::now();

        let attempts = (0..16).map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.touch_heartbeat(id, None, now).await })
        });
        let wins = futures::future::join_all(attempts)
            .await
            .into_iter()
            .filter(|r| matches!(r, Ok(Ok(true))))
            .count();
        assert_eq!(wins, 1);
    }

    #[tokio::test]
    async fn test_advance_heartbeat_only_moves_forward() {
        let store = MemoryLicenseStore::new();
        let created = store.create(new_license("c-1", "")).await.unwrap();
        let now = Utc::now();

        assert!(store.advance_heartbeat(created.id, now).await.unwrap());
        // A writer holding an older clock reading does not rewind the heartbeat.
        assert!(store
            .advance_heartbeat(created.id, now - Duration::seconds(30))
            .await
            .unwrap());
        let stored = store.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.last_online_at, Some(now));

        store.soft_delete("c-1").await.unwrap();
        assert!(!store.advance_heartbeat(created.id, now).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_rejects_held_binding() {
        let store = MemoryLicenseStore::new();
        store.create(new_license("c-1", "10.0.0.1")).await.unwrap();

        let err = store.create(new_license("c-2", "10.0.0.1")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.typed_source::<BindingConflict>(), Some(&BindingConflict));
        assert!(store.get_by_container_id("c-2").await.unwrap().is_none());

        // Empty bindings never collide.
        store.create(new_license("c-3", "")).await.unwrap();
        store.create(new_license("c-4", "")).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_fields_rejects_binding_of_other_row() {
        let store = MemoryLicenseStore::new();
        let holder = store.create(new_license("c-1", "10.0.0.1")).await.unwrap();
        let other = store.create(new_license("c-2", "")).await.unwrap();

        let taken = LicenseChanges {
            ip: Some("10.0.0.1".to_string()),
            ..Default::default()
        };
        let err = store.update_fields(other.id, &taken).await.unwrap_err();
        assert_eq!(err.typed_source::<BindingConflict>(), Some(&BindingConflict));
        let unchanged = store.get_by_id(other.id).await.unwrap().unwrap();
        assert_eq!(unchanged.ip, "");

        // Re-applying a row's own binding is not a collision.
        let updated = store.update_fields(holder.id, &taken).await.unwrap().unwrap();
        assert_eq!(updated.ip, "10.0.0.1");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_binds_single_winner() {
        let store = Arc::new(MemoryLicenseStore::new());
        let mut ids = Vec::new();
        for i in 0..8 {
            ids.push(store.create(new_license(&format!("c-{i}"), "")).await.unwrap().id);
        }

        let attempts = ids.into_iter().map(|id| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let changes = LicenseChanges {
                    ip: Some("10.0.0.1".to_string()),
                    ..Default::default()
                };
                store.update_fields(id, &changes).await
            })
        });
        let mut wins = 0;
        for result in futures::future::join_all(attempts).await {
            match result.unwrap() {
                Ok(Some(_)) => wins += 1,
                Ok(None) => panic!("live row vanished"),
                Err(err) => {
                    assert_eq!(err.typed_source::<BindingConflict>(), Some(&BindingConflict))
                }
            }
        }
        assert_eq!(wins, 1);
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let store = MemoryLicenseStore::new();
        for i in 0..5 {
            let mut license = new_license(&format!("c-{i}"), "");
            license.name = if i % 2 == 0 { "Acme Corp" } else { "Globex" }.to_string();
            store.create(license).await.unwrap();
        }
        let page = store
            .list(Some("acme"), &PageRequest::new(1, 2))
            .await
            .unwrap();
        assert_eq!(page.total_items, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages, 2);
    }
}
