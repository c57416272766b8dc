//! SeaORM -> DomainError translation.
//!
//! Adapters convert `sea_orm::DbErr` here; higher layers map `DomainError`
//! to `AppError` via `From`.

use sea_orm::{DbErr, SqlErr};
use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

const USERS_EMAIL_CONSTRAINTS: [&str; 2] = ["users_email_key", "users_email_lower_key"];

/// Translate a `DbErr` into a `DomainError` with PII-safe detail.
pub fn map_db_err(e: DbErr) -> DomainError {
    let trace_id = trace_ctx::trace_id();
    let raw = e.to_string();

    if let Some(SqlErr::UniqueConstraintViolation(detail)) = e.sql_err() {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&detail), "Unique constraint violation");
        return unique_violation(&detail);
    }

    match &e {
        DbErr::RecordNotFound(_) => {
            DomainError::not_found(NotFoundKind::Other("Record".into()), "Record not found")
        }
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&raw), "Database unavailable");
            DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable")
        }
        _ if raw.contains("23505") || raw.contains("duplicate key value") => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&raw), "Unique constraint violation");
            unique_violation(&raw)
        }
        _ if raw.contains("timeout") || raw.contains("timed out") => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&raw), "Database timeout");
            DomainError::infra(InfraErrorKind::Timeout, "Database operation timed out")
        }
        _ => {
            error!(trace_id = %trace_id, raw_error = %Redacted(&raw), "Unhandled database error");
            DomainError::infra(
                InfraErrorKind::Other("Database".into()),
                "Database operation failed",
            )
        }
    }
}

fn unique_violation(detail: &str) -> DomainError {
    let is_email = USERS_EMAIL_CONSTRAINTS.iter().any(|name| detail.contains(name));
    if is_email || detail.contains("(email)") {
        DomainError::conflict(ConflictKind::UniqueEmail, "Email already registered")
    } else {
        DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violated",
        )
    }
}
