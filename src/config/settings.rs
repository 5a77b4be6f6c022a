use std::fmt;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

use crate::config::duration::{deserialize_opt_duration, deserialize_opt_u64};
use crate::errors::TokenError;
use crate::utils::constants::*;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub uaa: UaaConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct UaaConfig {
    #[serde(default)]
    pub token: TokenProps,
}

/// ================================
/// Token endpoint (raw, as bound from config)
/// ================================
#[derive(Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TokenProps {
    pub url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_duration")]
    pub grace: Option<Duration>,
    pub auth_method: Option<ClientAuthMethod>,
    #[serde(default, deserialize_with = "deserialize_opt_u64")]
    pub request_timeout_ms: Option<u64>,
}

impl fmt::Debug for TokenProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProps")
            .field("url", &self.url)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("grace", &self.grace)
            .field("auth_method", &self.auth_method)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

/// How client credentials reach the token endpoint.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClientAuthMethod {
    /// `client_id` and `client_secret` in the form body.
    #[default]
    Form,
    /// `Authorization: Basic base64(client_id:client_secret)`.
    Basic,
}

/// Validated, immutable token endpoint settings.
#[derive(Clone)]
pub struct TokenSettings {
    url: Url,
    client_id: String,
    client_secret: String,
    grace: Duration,
    auth_method: ClientAuthMethod,
    request_timeout: Duration,
}

impl TokenSettings {
    /// Build settings with the default grace period and form authentication.
    pub fn new(
        url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, TokenError> {
        TokenProps {
            url: Some(url.into()),
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
            ..TokenProps::default()
        }
        .try_into()
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn with_auth_method(mut self, auth_method: ClientAuthMethod) -> Self {
        self.auth_method = auth_method;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    pub fn auth_method(&self) -> ClientAuthMethod {
        self.auth_method
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl TryFrom<TokenProps> for TokenSettings {
    type Error = TokenError;

    fn try_from(props: TokenProps) -> Result<Self, Self::Error> {
        let client_id = required(props.client_id, KEY_CLIENT_ID)?;
        let client_secret = required(props.client_secret, KEY_CLIENT_SECRET)?;
        let raw_url = required(props.url, KEY_URL)?;

        let url = Url::parse(raw_url.trim()).map_err(|e| {
            TokenError::configuration(format!("{}.{} is not a valid URL: {}", CONFIG_PREFIX, KEY_URL, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TokenError::configuration(format!(
                "{}.{} must use http or https, got '{}'",
                CONFIG_PREFIX,
                KEY_URL,
                url.scheme()
            )));
        }

        Ok(Self {
            url,
            client_id,
            client_secret,
            grace: props.grace.unwrap_or(Duration::from_secs(DEFAULT_GRACE_SECS)),
            auth_method: props.auth_method.unwrap_or_default(),
            request_timeout: Duration::from_millis(
                props.request_timeout_ms.unwrap_or(DEFAULT_HTTP_TIMEOUT_MS),
            ),
        })
    }
}

fn required(value: Option<String>, key: &str) -> Result<String, TokenError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| TokenError::configuration(format!("{}.{} is required", CONFIG_PREFIX, key)))
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("url", &self.url.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("grace", &self.grace)
            .field("auth_method", &self.auth_method)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String, // EnvFilter directive, e.g. "info" or "uaa_token=debug"
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new(default_log_level(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Compact,
}

fn default_log_level() -> String {
    "info".to_string()
}
