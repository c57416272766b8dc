//! Registration, login and profile lookup.

use std::sync::LazyLock;

use regex::Regex;
use time::OffsetDateTime;
use tracing::info;

use crate::auth::claims::Role;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::issue_token;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::logging::security::{login_failed, LoginFailure};
use crate::repos::users::{NewUser, User, UserStore};
use crate::state::security_config::SecurityConfig;

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").unwrap()
});

#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A freshly issued token together with the account it was issued for.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Trimmed email, or `InvalidEmail`. Case is kept as submitted; stores
/// compare addresses case-insensitively.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_string();
    if email.is_empty() {
        return Err(AppError::invalid(ErrorCode::InvalidEmail, "email is required"));
    }
    if !EMAIL_SHAPE.is_match(&email) {
        return Err(AppError::invalid(
            ErrorCode::InvalidEmail,
            "email must be a valid email address",
        ));
    }
    Ok(email)
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid(
            ErrorCode::InvalidPassword,
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

fn session_for(user: User, security: &SecurityConfig) -> Result<Session, AppError> {
    let token = issue_token(
        user.id,
        &user.email,
        user.role,
        OffsetDateTime::now_utc(),
        security,
    )?;
    Ok(Session { token, user })
}

/// Create a `user`-role account and sign a token for it.
pub async fn register(
    store: &dyn UserStore,
    security: &SecurityConfig,
    registration: Registration,
) -> Result<Session, AppError> {
    let email = normalize_email(&registration.email)?;
    validate_password(&registration.password)?;

    if store.find_by_email(&email).await?.is_some() {
        info!(email = %Redacted(&email), "registration rejected: email taken");
        return Err(AppError::conflict(ErrorCode::UserExists, "user already exists"));
    }

    let password_hash = hash_password(&registration.password, security.bcrypt_cost).await?;

    // A concurrent registration can still win the race; the store reports it
    // as a unique-email conflict.
    let user = store
        .create(NewUser {
            email,
            password_hash,
            first_name: registration.first_name.unwrap_or_default(),
            last_name: registration.last_name.unwrap_or_default(),
            role: Role::User,
        })
        .await?;

    info!(user_id = user.id, email = %Redacted(&user.email), "user registered");
    session_for(user, security)
}

/// Check credentials. Unknown email and wrong password both surface as
/// `InvalidCredentials`; only the security log tells them apart.
pub async fn login(
    store: &dyn UserStore,
    security: &SecurityConfig,
    email: &str,
    password: &str,
) -> Result<Session, AppError> {
    let email = normalize_email(email)?;
    if password.is_empty() {
        return Err(AppError::invalid(ErrorCode::InvalidPassword, "password is required"));
    }

    let Some(user) = store.find_by_email(&email).await? else {
        login_failed(LoginFailure::UnknownEmail, &email);
        return Err(AppError::invalid_credentials());
    };

    if !verify_password(password, &user.password_hash).await? {
        login_failed(LoginFailure::WrongPassword, &email);
        return Err(AppError::invalid_credentials());
    }

    info!(user_id = user.id, "user logged in");
    session_for(user, security)
}

/// Load the account behind an authenticated identity. A valid token can
/// outlive its account, which is reported as `USER_NOT_FOUND`.
pub async fn profile(store: &dyn UserStore, user_id: i64) -> Result<User, AppError> {
    store
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "user not found"))
}
