use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// A freshly signed token together with its expiry instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT token issuer and verifier.
///
/// Stateless: a token is valid when its signature checks out against the
/// server secret and its expiry has not been reached. There is no revocation.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    default_ttl: Duration,
}

impl JwtHandler {
    /// Create a new JWT handler signing with HS256.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    /// * `default_ttl` - Lifetime applied when the caller does not supply one
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], default_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            default_ttl,
        }
    }

    /// Create a JWT handler with an explicit HMAC algorithm.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Algorithm is not HS256, HS384 or HS512
    pub fn with_algorithm(
        secret: &[u8],
        algorithm: Algorithm,
        default_ttl: Duration,
    ) -> Result<Self, JwtError> {
        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(Self {
                algorithm,
                ..Self::new(secret, default_ttl)
            }),
            other => Err(JwtError::UnsupportedAlgorithm(format!("{:?}", other))),
        }
    }

    /// Lifetime used when `issue` is called without an override.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for a subject, valid from now.
    ///
    /// # Arguments
    /// * `subject` - Username to embed as `sub`
    /// * `ttl` - Optional lifetime override; the configured default otherwise
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed or the expiry is out of range
    /// * `MissingSubject` - Subject is empty
    pub fn issue(&self, subject: &str, ttl: Option<Duration>) -> Result<IssuedToken, JwtError> {
        self.issue_at(subject, ttl, Utc::now())
    }

    /// Issue a token as if the current instant were `issued_at`.
    pub fn issue_at(
        &self,
        subject: &str,
        ttl: Option<Duration>,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        if subject.is_empty() {
            return Err(JwtError::MissingSubject);
        }

        let claims = Claims::for_subject(subject, issued_at, ttl.unwrap_or(self.default_ttl))
            .ok_or_else(|| JwtError::EncodingFailed("expiry out of range".to_string()))?;
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| JwtError::EncodingFailed("expiry out of range".to_string()))?;
        let token = self.encode(&claims)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Sign a claim set into a compact token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token against the current time.
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be parsed
    /// * `BadSignature` - Signature does not match the secret
    /// * `Expired` - Expiry instant has been reached
    /// * `MissingSubject` - Token carries no (or an empty) `sub`
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current instant were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below against `now`, without leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => JwtError::BadSignature,
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::MissingRequiredClaim(claim) if claim == "sub" => {
                    JwtError::MissingSubject
                }
                _ => JwtError::Malformed(e.to_string()),
            })?;

        if claims.sub.is_empty() {
            return Err(JwtError::MissingSubject);
        }

        if claims.is_expired(now.timestamp()) {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }
}
