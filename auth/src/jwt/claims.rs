use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an access token.
///
/// `sub` holds the username, `exp` and `iat` are Unix timestamps in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username); absent decodes as empty and is rejected on verify
    #[serde(default)]
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    /// Build claims for a subject, expiring `ttl` after `issued_at`.
    ///
    /// # Arguments
    /// * `subject` - Username the token is issued to
    /// * `issued_at` - Issue instant
    /// * `ttl` - Token lifetime
    ///
    /// # Returns
    /// Claims with sub, exp and iat set, or `None` when the expiry falls
    /// outside the representable range
    pub fn for_subject(
        subject: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<Self> {
        let expires_at = issued_at.checked_add_signed(ttl)?;

        Some(Self {
            sub: subject.into(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
        })
    }

    /// Subject (username) the token was issued to.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Expiry as an instant.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Check if the token is expired at the given instant.
    ///
    /// Expiry is exclusive: a token stops being valid at `exp` itself.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
