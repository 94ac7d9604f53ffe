use thiserror::Error;

/// Error type for password operations.
///
/// Only hashing can fail; verification reports a mismatch instead.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
