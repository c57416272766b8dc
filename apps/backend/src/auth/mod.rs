pub mod claims;
pub mod password;
pub mod token;

pub use claims::{Identity, IdentityClaims, Role};
pub use token::{issue_token, verify_token, TokenError};
