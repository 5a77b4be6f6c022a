use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::cache::token::CachedToken;
use crate::config::settings::{ServiceConfig, TokenProps, TokenSettings};
use crate::errors::TokenError;
use crate::helpers::time;
use crate::parser::jwt::expiry_from_jwt;
use crate::sources::{ClientCredentialsSource, FetchToken};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Lazily refreshed client-credentials bearer token.
///
/// Holds at most one token. `get_token` checks staleness and, when needed,
/// fetches a new token while holding the lock, so concurrent callers wait for
/// the in-flight fetch instead of issuing their own. There is no background
/// refresh. Share it behind an `Arc`.
pub struct TokenService<S = ClientCredentialsSource> {
    source: S,
    grace: TimeDelta,
    clock: Clock,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenService<ClientCredentialsSource> {
    pub fn new(settings: TokenSettings) -> Result<Self, TokenError> {
        let source = ClientCredentialsSource::new(settings.clone())?;
        Self::with_source(&settings, source)
    }

    /// Validate raw properties and build the service. Fails before any network call.
    pub fn from_props(props: TokenProps) -> Result<Self, TokenError> {
        Self::new(TokenSettings::try_from(props)?)
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, TokenError> {
        Self::from_props(config.uaa.token.clone())
    }
}

impl<S: FetchToken> TokenService<S> {
    pub fn with_source(settings: &TokenSettings, source: S) -> Result<Self, TokenError> {
        let grace = TimeDelta::from_std(settings.grace()).map_err(|_| {
            TokenError::configuration(format!("grace {:?} is out of range", settings.grace()))
        })?;

        Ok(Self {
            source,
            grace,
            clock: Arc::new(time::now),
            cached: Mutex::new(None),
        })
    }

    /// Replace the wall clock used for staleness checks.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Return a bearer token that is outside its grace window right now,
    /// fetching a new one if the cached token is missing or stale.
    ///
    /// Errors are never masked by a stale token; the caller may retry.
    pub async fn get_token(&self) -> Result<String, TokenError> {
        let mut cached = self.cached.lock().await;
        let now = (self.clock)();

        if let Some(token) = cached.as_ref().filter(|t| !t.is_stale(now, self.grace)) {
            debug!(expires_at = %token.expires_at(), "token cache hit");
            return Ok(token.value().to_owned());
        }

        let token = self.fetch().await.inspect_err(|e| {
            error!(error = %e, "token refresh failed");
        })?;

        if token.is_stale(now, self.grace) {
            warn!(
                expires_at = %token.expires_at(),
                grace_seconds = self.grace.num_seconds(),
                "fetched token is already inside the grace window"
            );
        }
        info!(expires_at = %token.expires_at(), "token refreshed");

        let value = token.value().to_owned();
        *cached = Some(token);
        Ok(value)
    }

    async fn fetch(&self) -> Result<CachedToken, TokenError> {
        let response = self.source.fetch_token().await?;
        let access_token = response
            .access_token()
            .ok_or_else(|| TokenError::fetch("token response has no access_token"))?;
        let expires_at = expiry_from_jwt(access_token)?;
        Ok(CachedToken::new(access_token.to_owned(), expires_at))
    }
}

impl<S> fmt::Debug for TokenService<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("grace", &self.grace)
            .finish_non_exhaustive()
    }
}
