//! User records and the store contract the services depend on.

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::auth::claims::Role;
use crate::errors::domain::DomainError;

/// Stored account. `password_hash` never leaves the service layer.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Insert payload; ids and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

/// Persistence for user records, queried by email or id.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;

    /// Fails with `Conflict(UniqueEmail)` when the email is taken.
    async fn create(&self, new_user: NewUser) -> Result<User, DomainError>;
}
