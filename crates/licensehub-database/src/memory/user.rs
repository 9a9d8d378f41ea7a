//! In-memory user store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use licensehub_core::error::AppError;
use licensehub_core::result::AppResult;
use licensehub_entity::user::{CreateUser, User, UserStatus};

use crate::store::UserStore;

/// User store keyed by id.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    rows: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change an account's status. Returns whether the user exists.
    pub async fn set_status(&self, id: Uuid, status: UserStatus) -> bool {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id) {
            Some(user) => {
                user.status = status;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn create(&self, user: CreateUser) -> AppResult<User> {
        let mut rows = self.rows.write().await;
        if rows
            .values()
            .any(|u| u.username.eq_ignore_ascii_case(&user.username))
        {
            return Err(AppError::conflict("Username already exists"));
        }
        let now = Utc::now();
        let record = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            nick: user.nick,
            password_hash: user.password_hash,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        };
        rows.insert(record.id, record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use licensehub_core::error::ErrorKind;

    use super::*;

    fn create(username: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            email: None,
            nick: None,
            password_hash: "$2a$04$hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_username_lookup_is_case_insensitive() {
        let store = MemoryUserStore::new();
        let user = store.create(create("Admin")).await.unwrap();
        let found = store.get_by_username("admin").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        let err = store.create(create("ADMIN")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }
}
