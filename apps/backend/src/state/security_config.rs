use jsonwebtoken::Algorithm;
use time::Duration;

/// Token lifetime policy: every token expires 24 hours after issue.
pub const TOKEN_TTL: Duration = Duration::hours(24);

/// Configuration for token signing and password hashing
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Shared secret used to sign and verify tokens
    pub jwt_secret: Vec<u8>,
    /// Signing algorithm (HS256)
    pub algorithm: Algorithm,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given secret and default policy
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            token_ttl: TOKEN_TTL,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Cheap hashing and a fixed secret, for tests only.
    pub fn for_tests() -> Self {
        Self::new(b"test_secret_key_for_testing_purposes_only".to_vec()).with_bcrypt_cost(4)
    }
}
