use std::fmt;

use tracing::warn;

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Why a credential check failed. Never shown to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    UnknownEmail,
    WrongPassword,
}

impl LoginFailure {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LoginFailure::UnknownEmail => "unknown_email",
            LoginFailure::WrongPassword => "wrong_password",
        }
    }
}

impl fmt::Display for LoginFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn login_failed(reason: LoginFailure, email: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %Redacted(email),
        reason = reason.as_str(),
        "Authentication failure"
    );
}

/// A protected request was rejected before reaching its handler.
pub fn bearer_rejected(reason: &str, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_BEARER_REJECTED",
        %trace_id,
        reason,
        path,
        "Rejected bearer token"
    );
}
