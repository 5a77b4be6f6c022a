//! # UAA Token Library
//!
//! Fetches an OAuth2 client-credentials bearer token, keeps it in memory and
//! refreshes it lazily once it enters the configured grace window before the
//! JWT `exp` claim.
//!
//! Modules:
//! - `config` — token endpoint settings, YAML loading, logging config
//! - `cache` — the cached token value
//! - `sources` — token endpoint client (client-credentials grant)
//! - `parser` — JWT expiry extraction
//! - `service` — `TokenService`, the lock-guarded refresh-on-demand cache

pub mod cache;
pub mod config;
pub mod errors;
pub mod helpers;
pub mod parser;
pub mod service;
pub mod sources;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::config::settings::{ClientAuthMethod, ServiceConfig, TokenProps, TokenSettings};
pub use crate::errors::TokenError;
pub use crate::service::token_service::TokenService;
