use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::TokenError;
use crate::helpers::time::from_unix_seconds;

/// base64url, padding optional: issuers disagree on whether to strip it.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode the claims segment of a compact JWT. The signature is not verified.
pub fn decode_claims(token: &str) -> Result<Map<String, Value>, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    // header.payload or header.payload.signature (signature may be empty)
    if !(2..=3).contains(&parts.len()) {
        return Err(TokenError::decode(format!(
            "invalid JWT format: expected 2 or 3 segments, got {}",
            parts.len()
        )));
    }

    let decoded = URL_SAFE_LENIENT
        .decode(parts[1])
        .map_err(|e| TokenError::decode(format!("base64 decode error: {}", e)))?;

    match serde_json::from_slice::<Value>(&decoded)
        .map_err(|e| TokenError::decode(format!("invalid JWT payload: {}", e)))?
    {
        Value::Object(claims) => Ok(claims),
        other => Err(TokenError::decode(format!(
            "JWT payload is not a JSON object: {}",
            json_kind(&other)
        ))),
    }
}

/// Extract the `exp` claim (seconds since epoch) as an instant.
///
/// Expired tokens are not rejected here; staleness is decided by the caller.
pub fn expiry_from_jwt(token: &str) -> Result<DateTime<Utc>, TokenError> {
    let claims = decode_claims(token)?;
    let exp = claims
        .get("exp")
        .ok_or_else(|| TokenError::decode("JWT does not contain exp claim"))?;

    let seconds = match exp {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().and_then(|v| i64::try_from(v).ok()))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        _ => None,
    }
    .ok_or_else(|| TokenError::decode(format!("exp claim is not numeric: {}", exp)))?;

    let expires_at = from_unix_seconds(seconds)?;
    debug!(expires_at = %expires_at, "jwt parsed successfully");
    Ok(expires_at)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
