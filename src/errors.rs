use thiserror::Error;

/// Errors surfaced by [`TokenService`](crate::service::token_service::TokenService).
///
/// None of the variants carry the client secret or the access token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// A required setting is missing or invalid. Raised before any network call.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The token endpoint could not be reached, answered with a non-2xx status,
    /// or returned a body without a usable access token.
    #[error("token fetch failed: {0}")]
    Fetch(String),

    /// The access token is not a JWT carrying a numeric `exp` claim.
    #[error("token decode failed: {0}")]
    TokenDecode(String),
}

impl TokenError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        TokenError::Configuration(msg.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        TokenError::Fetch(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        TokenError::TokenDecode(msg.into())
    }
}
