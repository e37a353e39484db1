use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an access token.
///
/// `iat` is in milliseconds since the epoch; `exp` is a RFC 7519 NumericDate
/// (seconds) so that standard validators enforce it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Issued at (Unix timestamp, milliseconds)
    pub iat: i64,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
}

impl Claims {
    /// Create claims from explicit values.
    pub fn new(sub: impl ToString, iat_millis: i64, exp_seconds: i64) -> Self {
        Self {
            sub: sub.to_string(),
            iat: iat_millis,
            exp: exp_seconds,
        }
    }

    /// Create claims for a subject issued now and valid for `ttl`.
    ///
    /// # Arguments
    /// * `subject` - Unique principal identifier
    /// * `ttl` - Lifetime of the token
    ///
    /// # Returns
    /// Claims with sub, iat and exp set
    pub fn for_subject(subject: impl ToString, ttl: Duration) -> Self {
        Self::issued_at_time(subject, Utc::now(), ttl)
    }

    /// Create claims for a subject issued at a given instant.
    pub fn issued_at_time(subject: impl ToString, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self::new(subject, now.timestamp_millis(), (now + ttl).timestamp())
    }

    /// Subject of the token.
    pub fn subject(&self) -> &str {
        &self.sub
    }
}
