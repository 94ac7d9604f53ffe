//! Credential primitives for the patient records backend.
//!
//! - Password hashing (Argon2id, PHC strings)
//! - Signed, time-limited access tokens (HMAC JWT)
//! - An `Authenticator` tying both to the configured token lifetime
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("Abcdef1!").unwrap();
//! assert!(hasher.verify("Abcdef1!", &hash));
//! assert!(!hasher.verify("Abcdef1?", &hash));
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::JwtHandler;
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!", Duration::minutes(30));
//! let issued = handler.issue("alice01", None).unwrap();
//! let claims = handler.verify(&issued.token).unwrap();
//! assert_eq!(claims.subject(), "alice01");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
