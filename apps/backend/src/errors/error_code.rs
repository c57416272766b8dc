//! Error codes for the sync backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Every variant maps 1:1 to the SCREAMING_SNAKE_CASE string that appears
//! in the `code` field of a Problem Details response.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    /// Missing, malformed, expired or incorrectly signed bearer token
    Unauthorized,
    /// Login with an unknown email or a wrong password
    InvalidCredentials,

    // Request validation
    /// Body could not be parsed as the expected JSON shape
    BadRequest,
    /// Field-level validation failure
    ValidationError,
    /// Email address is not syntactically valid
    InvalidEmail,
    /// Password does not satisfy the registration policy
    InvalidPassword,
    /// `data_type` missing or blank on a sync trigger
    InvalidDataType,

    // Not found
    UserNotFound,

    // Conflicts
    /// Registration with an email that already exists
    UserExists,

    // Infrastructure
    /// Credential store failure
    DbError,
    /// Token signing failure
    TokenSigningFailed,
    /// Password hashing failure
    PasswordHashFailed,
    /// Envelope could not be serialized
    SerializationFailed,
    /// Broker rejected or did not accept the publish in time
    PublishFailed,
    /// Generic internal failure
    InternalError,
    /// Misconfiguration detected at request time
    ConfigError,
}

impl ErrorCode {
    /// Canonical string for this code, exactly as it appears on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",

            Self::BadRequest => "BAD_REQUEST",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::InvalidDataType => "INVALID_DATA_TYPE",

            Self::UserNotFound => "USER_NOT_FOUND",

            Self::UserExists => "USER_EXISTS",

            Self::DbError => "DB_ERROR",
            Self::TokenSigningFailed => "TOKEN_SIGNING_FAILED",
            Self::PasswordHashFailed => "PASSWORD_HASH_FAILED",
            Self::SerializationFailed => "SERIALIZATION_FAILED",
            Self::PublishFailed => "PUBLISH_FAILED",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Message shown to clients for 5xx responses. Internal detail is logged,
    /// never returned.
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::SerializationFailed => "failed to marshal message",
            Self::PublishFailed => "failed to publish message",
            Self::TokenSigningFailed => "failed to issue token",
            Self::PasswordHashFailed => "failed to hash password",
            Self::DbError => "failed to access user store",
            _ => "internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
