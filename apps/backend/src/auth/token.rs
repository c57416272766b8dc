//! Stateless access tokens.
//!
//! Tokens are HS256 JWTs whose payload is exactly [`IdentityClaims`]. Nothing
//! is stored server-side; a token stops being accepted only when it expires.
//!
//! Expiry is checked here rather than by `jsonwebtoken` because the payload
//! uses `expires_at` instead of the registered `exp` claim, and because callers
//! need `Expired` reported separately from signature failures (for logging).

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use time::OffsetDateTime;

use crate::auth::claims::{IdentityClaims, Role};
use crate::state::security_config::SecurityConfig;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("token could not be parsed")]
    Malformed,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    /// Short reason used in auth-failure logs.
    pub const fn reason(&self) -> &'static str {
        match self {
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::Expired => "expired",
            TokenError::Malformed => "malformed_token",
            TokenError::Signing(_) => "signing_failed",
        }
    }
}

/// Mint a token for the given identity, valid for `security.token_ttl` from `now`.
pub fn issue_token(
    user_id: i64,
    email: &str,
    role: Role,
    now: OffsetDateTime,
    security: &SecurityConfig,
) -> Result<String, TokenError> {
    let issued_at = now.unix_timestamp();
    let expires_at = issued_at + security.token_ttl.whole_seconds();

    let claims = IdentityClaims {
        user_id,
        email: email.to_string(),
        role,
        issued_at,
        expires_at,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verify signature and expiry of `token` as of `now` and return its claims
/// unchanged.
pub fn verify_token(
    token: &str,
    now: OffsetDateTime,
    security: &SecurityConfig,
) -> Result<IdentityClaims, TokenError> {
    let mut validation = Validation::new(security.algorithm);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let claims = decode::<IdentityClaims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    if claims.expires_at <= claims.issued_at {
        return Err(TokenError::Malformed);
    }

    if now.unix_timestamp() > claims.expires_at {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}
