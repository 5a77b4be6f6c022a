use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value;
use tracing::{debug, error};

use crate::config::settings::{LoggingConfig, ServiceConfig, TokenSettings};
use crate::errors::TokenError;

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(\w+)(?::([^\}]*))?\}").expect("valid placeholder regex")
});

/// Load config from a YAML file, expanding `${VAR}` / `${VAR:default}` placeholders.
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig, TokenError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        error!(path = %path.display(), error = %e, "config read failed");
        TokenError::configuration(format!("cannot read config '{}': {}", path.display(), e))
    })?;

    parse_config(&content)
}

/// Parse YAML, then expand placeholders inside string scalars.
///
/// Expanded values are bound verbatim: YAML syntax in an environment value
/// (`#`, `*`, quotes) is never reinterpreted.
pub fn parse_config(content: &str) -> Result<ServiceConfig, TokenError> {
    let invalid = |e: serde_yaml::Error| {
        error!("parse config error: {}", e);
        TokenError::configuration(format!("invalid config format: {}", e))
    };

    let mut document: Value = serde_yaml::from_str(content).map_err(invalid)?;
    expand_placeholders(&mut document);
    let mut service_config: ServiceConfig = serde_yaml::from_value(document).map_err(invalid)?;

    // Apply defaults
    if service_config.logging.is_none() {
        service_config.logging = Some(LoggingConfig::default());
    }

    debug!(token = ?service_config.uaa.token, "config parsed");
    Ok(service_config)
}

/// Load and validate token settings in one step.
pub async fn load_token_settings(path: &Path) -> Result<TokenSettings, TokenError> {
    let service_config = file_to_config(path).await?;
    TokenSettings::try_from(service_config.uaa.token)
}

fn expand_placeholders(value: &mut Value) {
    match value {
        Value::String(text) => {
            if ENV_PLACEHOLDER.is_match(text) {
                *text = expand_env_vars(text);
            }
        }
        Value::Sequence(items) => items.iter_mut().for_each(expand_placeholders),
        Value::Mapping(map) => map.values_mut().for_each(expand_placeholders),
        Value::Tagged(tagged) => expand_placeholders(&mut tagged.value),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

fn expand_env_vars(input: &str) -> String {
    ENV_PLACEHOLDER
        .replace_all(input, |caps: &regex::Captures| {
            let var = &caps[1];
            let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            std::env::var(var).unwrap_or_else(|_| default.to_string())
        })
        .to_string()
}
