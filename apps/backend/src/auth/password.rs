//! One-way password hashing (bcrypt), run off the async workers.

use tokio::task::spawn_blocking;

use crate::errors::domain::{DomainError, InfraErrorKind};

pub async fn hash_password(password: &str, cost: u32) -> Result<String, DomainError> {
    let password = password.to_string();
    spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| DomainError::infra(InfraErrorKind::PasswordHash, format!("join error: {e}")))?
        .map_err(|e| DomainError::infra(InfraErrorKind::PasswordHash, e.to_string()))
}

/// Returns `false` for a mismatch and for an unparseable stored hash.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, DomainError> {
    let password = password.to_string();
    let hash = hash.to_string();
    spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|e| DomainError::infra(InfraErrorKind::PasswordHash, format!("join error: {e}")))
}
