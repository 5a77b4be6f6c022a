use chrono::{DateTime, Utc};

use crate::errors::TokenError;

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert a unix timestamp (seconds) into an instant.
pub fn from_unix_seconds(seconds: i64) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| TokenError::decode(format!("exp {} is out of range", seconds)))
}
