use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::errors::TokenError;

static SUFFIXED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s*(ms|s|m|h|d)?$").expect("valid duration regex")
});

// ISO-8601 subset: PT1H30M15S
static ISO_8601: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").expect("valid ISO-8601 regex")
});

/// Parse a human readable duration.
///
/// Accepted forms: `60` (seconds), `500ms`, `60s`, `2m`, `1h`, `1d`, `PT60S`.
pub fn parse_duration(input: &str) -> Result<Duration, TokenError> {
    let value = input.trim();
    let invalid = || TokenError::configuration(format!("invalid duration '{}'", input));

    if let Some(caps) = SUFFIXED.captures(value) {
        let amount: u64 = caps[1].parse().map_err(|_| invalid())?;
        let unit = caps.get(2).map(|m| m.as_str()).unwrap_or("s");
        let secs = |factor: u64| amount.checked_mul(factor).map(Duration::from_secs);
        return match unit {
            "ms" => Some(Duration::from_millis(amount)),
            "s" => secs(1),
            "m" => secs(60),
            "h" => secs(3600),
            "d" => secs(86_400),
            _ => None,
        }
        .ok_or_else(invalid);
    }

    if let Some(caps) = ISO_8601.captures(value) {
        if caps.get(1).is_none() && caps.get(2).is_none() && caps.get(3).is_none() {
            return Err(invalid());
        }
        let part = |idx: usize| -> Result<u64, TokenError> {
            caps.get(idx)
                .map(|m| m.as_str().parse::<u64>().map_err(|_| invalid()))
                .unwrap_or(Ok(0))
        };
        let (hours, minutes, seconds) = (part(1)?, part(2)?, part(3)?);
        let total = hours
            .checked_mul(3600)
            .and_then(|t| t.checked_add(minutes.checked_mul(60)?))
            .and_then(|t| t.checked_add(seconds))
            .ok_or_else(invalid)?;
        return Ok(Duration::from_secs(total));
    }

    Err(invalid())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Seconds(u64),
    Text(String),
}

/// Serde adapter for `Option<Duration>` fields written as seconds or as text.
pub fn deserialize_opt_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawDuration>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawDuration::Seconds(secs)) => Ok(Some(Duration::from_secs(secs))),
        Some(RawDuration::Text(text)) => parse_duration(&text)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(u64),
    Text(String),
}

/// Serde adapter for `Option<u64>` fields that may arrive as text,
/// e.g. `requestTimeoutMs: ${TIMEOUT_MS:5000}`.
pub fn deserialize_opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawNumber::Number(n)) => Ok(Some(n)),
        Some(RawNumber::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid number '{}'", text))),
    }
}
