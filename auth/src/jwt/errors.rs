use thiserror::Error;

/// Error type for JWT operations.
///
/// Verification distinguishes the failure causes here so they can be logged;
/// callers that face a client are expected to collapse them into one signal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    BadSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token has no subject")]
    MissingSubject,

    #[error("Unsupported signing algorithm: {0} (only HMAC algorithms are accepted)")]
    UnsupportedAlgorithm(String),
}
