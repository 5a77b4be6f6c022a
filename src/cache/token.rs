use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

/// A fetched bearer token and the instant its issuer says it expires.
///
/// Replaced wholesale on refresh, never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn new(value: String, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Instant from which the token is treated as stale.
    pub fn refresh_at(&self, grace: TimeDelta) -> DateTime<Utc> {
        self.expires_at
            .checked_sub_signed(grace)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// `expires_at - grace <= now`
    pub fn is_stale(&self, now: DateTime<Utc>, grace: TimeDelta) -> bool {
        self.refresh_at(grace) <= now
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap()
    }

    #[test]
    fn fresh_until_grace_window() {
        let token = CachedToken::new("t".into(), at(1_000 + 300));
        let grace = TimeDelta::seconds(60);

        assert!(!token.is_stale(at(1_000), grace));
        assert!(!token.is_stale(at(1_000 + 239), grace));
        assert!(token.is_stale(at(1_000 + 240), grace));
        assert!(token.is_stale(at(1_000 + 400), grace));
    }

    #[test]
    fn zero_grace_is_stale_at_expiry() {
        let token = CachedToken::new("t".into(), at(500));
        assert!(!token.is_stale(at(499), TimeDelta::zero()));
        assert!(token.is_stale(at(500), TimeDelta::zero()));
    }

    #[test]
    fn oversized_grace_saturates() {
        let token = CachedToken::new("t".into(), at(0));
        assert_eq!(token.refresh_at(TimeDelta::MAX), DateTime::<Utc>::MIN_UTC);
        assert!(token.is_stale(at(0), TimeDelta::MAX));
    }

    #[test]
    fn debug_redacts_value() {
        let token = CachedToken::new("eyJhbGciOi.secret.sig".into(), at(0));
        assert!(!format!("{:?}", token).contains("secret"));
    }
}
