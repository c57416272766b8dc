//! In-process user store for tests and database-less development runs.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;
use time::OffsetDateTime;

use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::users::{NewUser, User, UserStore};

#[derive(Debug, Default)]
struct Users {
    last_id: i64,
    by_id: BTreeMap<i64, User>,
    /// Keyed by `email_key`.
    id_by_email: HashMap<String, i64>,
}

fn email_key(email: &str) -> String {
    email.to_lowercase()
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<Users>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop a record, leaving any tokens issued for it still verifiable.
    pub fn remove(&self, id: i64) -> Option<User> {
        let mut users = self.users.write();
        let user = users.by_id.remove(&id)?;
        users.id_by_email.remove(&email_key(&user.email));
        Some(user)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read();
        Ok(users
            .id_by_email
            .get(&email_key(email))
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().by_id.get(&id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write();
        let key = email_key(&new_user.email);
        if users.id_by_email.contains_key(&key) {
            return Err(DomainError::conflict(
                ConflictKind::UniqueEmail,
                "Email already registered",
            ));
        }

        users.last_id += 1;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: users.last_id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            role: new_user.role,
            created_at: now,
            updated_at: now,
        };

        users.id_by_email.insert(key, user.id);
        users.by_id.insert(user.id, user.clone());
        Ok(user)
    }
}
