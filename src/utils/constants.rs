//! Shared constants and defaults

pub const DEFAULT_GRACE_SECS: u64 = 60;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;

// Configuration keys, used in validation messages
pub const CONFIG_PREFIX: &str = "uaa.token";
pub const KEY_URL: &str = "url";
pub const KEY_CLIENT_ID: &str = "clientId";
pub const KEY_CLIENT_SECRET: &str = "clientSecret";

// OAuth2 form fields
pub const GRANT_TYPE: &str = "grant_type";
pub const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";
pub const CLIENT_ID: &str = "client_id";
pub const CLIENT_SECRET: &str = "client_secret";
