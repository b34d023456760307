use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Session token claims.
///
/// Carries the authenticated identity as `sub` together with the RFC 7519
/// issued-at and expiration timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (authenticated identity)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject, issued now.
    ///
    /// # Arguments
    /// * `subject` - Identity the token is issued for
    /// * `lifetime` - Time until the token expires
    pub fn for_subject(subject: impl ToString, lifetime: Duration) -> Self {
        Self::issued_at(subject, Utc::now(), lifetime)
    }

    /// Create claims for a subject with an explicit issuance instant.
    pub fn issued_at(subject: impl ToString, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        let expiration = issued_at + lifetime;

        Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Expiration as a UTC instant.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
