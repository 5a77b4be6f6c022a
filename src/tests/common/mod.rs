// src/tests/common/mod.rs
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use httpmock::Method::POST;
use httpmock::{Mock, MockServer};
use serde_json::json;

use crate::config::settings::TokenSettings;

pub const TOKEN_PATH: &str = "/oauth/token";
pub const CLIENT_ID: &str = "clientId";
pub const CLIENT_SECRET: &str = "clientSecret";

/// Unsigned JWT shaped like a UAA access token, expiring at `exp`.
pub fn jwt_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({
            "scope": ["openid"],
            "authorities": ["ROLE_USER"],
            "jti": "Tdasged-Lsdfij32sdfjsdry8bsd",
            "client_id": CLIENT_ID,
            "exp": exp
        })
        .to_string(),
    );
    format!("{}.{}.", header, payload)
}

pub fn jwt_expiring_in(seconds: i64) -> String {
    jwt_with_exp(Utc::now().timestamp() + seconds)
}

pub fn settings(server: &MockServer) -> TokenSettings {
    TokenSettings::new(server.url(TOKEN_PATH), CLIENT_ID, CLIENT_SECRET).expect("valid settings")
}

/// Token endpoint answering every client-credentials request with `access_token`.
pub async fn mock_token_endpoint<'a>(server: &'a MockServer, access_token: &str) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(TOKEN_PATH)
                .form_urlencoded_tuple("grant_type", "client_credentials")
                .form_urlencoded_tuple("client_id", CLIENT_ID)
                .form_urlencoded_tuple("client_secret", CLIENT_SECRET);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "access_token": access_token,
                    "token_type": "bearer",
                    "expires_in": 300,
                    "scope": "openid",
                    "jti": "jti-123"
                }));
        })
        .await
}
