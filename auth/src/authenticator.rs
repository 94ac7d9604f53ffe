use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::IssuedToken;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password hashing and token handling.
///
/// Built once at startup from immutable configuration and shared by
/// reference; it holds no mutable state.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

impl Authenticator {
    /// Create a new authenticator signing with HS256.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `token_ttl` - Default access token lifetime
    pub fn new(jwt_secret: &[u8], token_ttl: Duration) -> Self {
        Self::with_jwt_handler(JwtHandler::new(jwt_secret, token_ttl))
    }

    /// Create an authenticator around a preconfigured JWT handler.
    pub fn with_jwt_handler(jwt_handler: JwtHandler) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler,
        }
    }

    /// Default lifetime of issued tokens.
    pub fn token_ttl(&self) -> Duration {
        self.jwt_handler.default_ttl()
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// Malformed stored hashes count as a mismatch.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Issue an access token for a subject.
    ///
    /// # Arguments
    /// * `subject` - Username to embed in the token
    /// * `ttl` - Optional lifetime override
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, subject: &str, ttl: Option<Duration>) -> Result<IssuedToken, JwtError> {
        self.jwt_handler.issue(subject, ttl)
    }

    /// Validate and decode an access token.
    ///
    /// # Errors
    /// * `JwtError` - Token is malformed, forged, expired or has no subject
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.verify(token)
    }
}
