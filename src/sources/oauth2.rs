use http::header::ACCEPT;
use reqwest::Client;
use tracing::{debug, error};

use crate::config::settings::{ClientAuthMethod, TokenSettings};
use crate::errors::TokenError;
use crate::sources::{FetchToken, TokenResponse};
use crate::utils::constants::*;

/// `client_credentials` grant against a single token endpoint.
#[derive(Debug, Clone)]
pub struct ClientCredentialsSource {
    settings: TokenSettings,
    client: Client,
}

impl ClientCredentialsSource {
    pub fn new(settings: TokenSettings) -> Result<Self, TokenError> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| TokenError::configuration(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(settings, client))
    }

    /// Use a caller-provided client, e.g. one shared with the rest of the application.
    pub fn with_client(settings: TokenSettings, client: Client) -> Self {
        Self { settings, client }
    }

    fn form(&self) -> Vec<(&'static str, &str)> {
        let mut form = vec![(GRANT_TYPE, GRANT_CLIENT_CREDENTIALS)];
        if self.settings.auth_method() == ClientAuthMethod::Form {
            form.push((CLIENT_ID, self.settings.client_id()));
            form.push((CLIENT_SECRET, self.settings.client_secret()));
        }
        form
    }
}

impl FetchToken for ClientCredentialsSource {
    async fn fetch_token(&self) -> Result<TokenResponse, TokenError> {
        let url = self.settings.url();

        let mut request = self
            .client
            .post(url.clone())
            .header(ACCEPT, "application/json")
            .form(&self.form());

        if self.settings.auth_method() == ClientAuthMethod::Basic {
            request = request.basic_auth(self.settings.client_id(), Some(self.settings.client_secret()));
        }

        let response = request.send().await.map_err(|e| {
            error!(url = %url, error = %e, "token request failed");
            TokenError::fetch(format!("request to {} failed: {}", url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(url = %url, %status, "token endpoint rejected request");
            return Err(TokenError::fetch(format!(
                "token endpoint {} responded with {}",
                url, status
            )));
        }

        let body = response.text().await.map_err(|e| {
            TokenError::fetch(format!("failed to read response from {}: {}", url, e))
        })?;
        if body.trim().is_empty() {
            return Err(TokenError::fetch(format!("failed to fetch token from {}: empty body", url)));
        }

        let token_response: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            TokenError::fetch(format!("invalid token response from {}: {}", url, e))
        })?;
        debug!(response = ?token_response, "token endpoint responded");
        Ok(token_response)
    }
}
