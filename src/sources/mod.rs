//! Sources module
//!
//! The token endpoint seam: anything that can hand back a token endpoint
//! response implements [`FetchToken`].

use std::fmt;

use serde::Deserialize;

use crate::errors::TokenError;

pub mod oauth2;

pub use oauth2::ClientCredentialsSource;

pub trait FetchToken: Send + Sync {
    fn fetch_token(&self) -> impl std::future::Future<Output = Result<TokenResponse, TokenError>> + Send;
}

/// Token endpoint response body.
///
/// Every field is optional on the wire so that a missing `access_token`
/// surfaces as a fetch error instead of a JSON error.
#[derive(Deserialize, Clone, Default, PartialEq)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_expires_in")]
    pub expires_in: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_scope")]
    pub scope: Option<String>,
    pub jti: Option<String>,
}

impl TokenResponse {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            token_type: Some("bearer".to_owned()),
            ..Self::default()
        }
    }

    /// The access token, if present and not blank.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
    }
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("jti", &self.jti)
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScope {
    Text(String),
    List(Vec<String>),
}

// UAA answers with a space separated string, some issuers with an array
fn deserialize_scope<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<RawScope>::deserialize(deserializer)?.map(|scope| match scope {
        RawScope::Text(text) => text,
        RawScope::List(items) => items.join(" "),
    }))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawExpiresIn {
    Seconds(u64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

// Informational only (expiry comes from the JWT): never fail the response over it
fn deserialize_expires_in<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<RawExpiresIn>::deserialize(deserializer)? {
        Some(RawExpiresIn::Seconds(secs)) => Some(secs),
        Some(RawExpiresIn::Text(text)) => text.trim().parse().ok(),
        Some(RawExpiresIn::Other(_)) | None => None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_full_response() {
        let body = json!({
            "access_token": "eyJ.x.y",
            "token_type": "bearer",
            "expires_in": 43199,
            "scope": "openid uaa.resource",
            "jti": "jti-123"
        });
        let resp: TokenResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.access_token(), Some("eyJ.x.y"));
        assert_eq!(resp.token_type.as_deref(), Some("bearer"));
        assert_eq!(resp.expires_in, Some(43199));
        assert_eq!(resp.scope.as_deref(), Some("openid uaa.resource"));
        assert_eq!(resp.jti.as_deref(), Some("jti-123"));
    }

    #[test]
    fn scope_array_is_joined() {
        let resp: TokenResponse =
            serde_json::from_value(json!({"access_token": "a", "scope": ["openid", "read"]})).unwrap();
        assert_eq!(resp.scope.as_deref(), Some("openid read"));
    }

    #[test]
    fn expires_in_is_parsed_leniently() {
        let parse = |body: serde_json::Value| -> TokenResponse { serde_json::from_value(body).unwrap() };

        assert_eq!(parse(json!({"access_token": "a.b.c", "expires_in": "3599"})).expires_in, Some(3599));
        assert_eq!(parse(json!({"access_token": "a.b.c", "expires_in": 3599})).expires_in, Some(3599));
        assert_eq!(parse(json!({"access_token": "a.b.c", "expires_in": -1})).expires_in, None);
        assert_eq!(parse(json!({"access_token": "a.b.c", "expires_in": "soon"})).expires_in, None);
        assert_eq!(parse(json!({"access_token": "a.b.c", "expires_in": null})).expires_in, None);

        let resp = parse(json!({"access_token": "a.b.c", "expires_in": 12.5}));
        assert_eq!(resp.expires_in, None);
        assert_eq!(resp.access_token(), Some("a.b.c"));
    }

    #[test]
    fn missing_or_blank_token_is_none() {
        let resp: TokenResponse = serde_json::from_value(json!({"token_type": "bearer"})).unwrap();
        assert_eq!(resp.access_token(), None);

        let resp = TokenResponse::bearer("  ");
        assert_eq!(resp.access_token(), None);
    }

    #[test]
    fn debug_redacts_token() {
        let rendered = format!("{:?}", TokenResponse::bearer("super-secret-token"));
        assert!(!rendered.contains("super-secret-token"));
    }
}
