// DomainError -> AppError mapping, no HTTP or database involved.
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_to_400() {
    let app: AppError = DomainError::validation("bad field").into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 400);
    assert_eq!(app.public_detail(), "bad field");
}

#[test]
fn maps_unique_email_to_user_exists() {
    let app: AppError = DomainError::conflict(ConflictKind::UniqueEmail, "users_email_key").into();
    assert_eq!(app.code().as_str(), "USER_EXISTS");
    assert_eq!(app.status().as_u16(), 409);
    assert_eq!(app.public_detail(), "user already exists");
}

#[test]
fn maps_missing_user_to_404() {
    let app: AppError = DomainError::not_found(NotFoundKind::User, "user 9").into();
    assert_eq!(app.code(), ErrorCode::UserNotFound);
    assert_eq!(app.status().as_u16(), 404);
}

#[test]
fn maps_infra_to_generic_500() {
    let app: AppError =
        DomainError::infra(InfraErrorKind::DbUnavailable, "pool timed out on 10.0.0.4").into();
    assert_eq!(app.code(), ErrorCode::DbError);
    assert_eq!(app.status().as_u16(), 500);
    assert_eq!(app.public_detail(), "failed to access user store");

    let app: AppError = DomainError::infra(InfraErrorKind::PasswordHash, "cost too high").into();
    assert_eq!(app.code(), ErrorCode::PasswordHashFailed);
    assert_eq!(app.public_detail(), "failed to hash password");
}
