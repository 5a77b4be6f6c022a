use std::str::FromStr;

use anyhow::{anyhow, Result};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::settings::{LogFormat, LoggingConfig, ServiceConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match *self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(anyhow!("unknown log level '{}'", other)),
        }
    }
}

/// Resolve the effective logging config: an explicit level wins over the file.
pub fn resolve(service_config: &ServiceConfig, level_override: Option<LogLevel>) -> LoggingConfig {
    let config = service_config.logging.clone().unwrap_or_default();
    match level_override {
        Some(level) => LoggingConfig::new(level.as_str().to_lowercase(), config.format),
        None => config,
    }
}

pub fn run(service_config: &ServiceConfig, level_override: Option<LogLevel>) -> Result<()> {
    init_logging(&resolve(service_config, level_override))
}

/// Initialize tracing with the desired config.
///
/// Installing a second global subscriber fails; that case is ignored so the
/// call is safe to repeat (tests, embedding applications).
pub fn init_logging(cfg: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_new(&cfg.level)
        .map_err(|e| anyhow!("invalid log level '{}': {}", cfg.level, e))?;

    // Base layer: filter + writer
    let registry = tracing_subscriber::registry().with(env_filter);

    // Choose format layer
    match cfg.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_timer(UtcTime::rfc_3339())
                .flatten_event(true) // CRI log parsers expect flat fields
                .with_ansi(false);

            let _ = registry.with(layer).try_init();
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_timer(UtcTime::rfc_3339())
                .with_ansi(true);

            let _ = registry.with(layer).try_init();
        }
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels() {
        assert_eq!("Debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn override_wins_over_config() {
        let config = ServiceConfig {
            logging: Some(LoggingConfig::new("warn".into(), LogFormat::Json)),
            ..ServiceConfig::default()
        };

        let resolved = resolve(&config, Some(LogLevel::Debug));
        assert_eq!(resolved.level, "debug");
        assert_eq!(resolved.format, LogFormat::Json);

        let resolved = resolve(&config, None);
        assert_eq!(resolved.level, "warn");
    }

    #[test]
    fn missing_logging_section_defaults_to_info() {
        let resolved = resolve(&ServiceConfig::default(), None);
        assert_eq!(resolved.level, "info");
        assert_eq!(resolved.format, LogFormat::Compact);
    }

    #[test]
    fn invalid_filter_is_rejected_and_init_is_repeatable() {
        let bad = LoggingConfig::new("uaa_token=loud".into(), LogFormat::Compact);
        assert!(init_logging(&bad).is_err());

        let good = LoggingConfig::default();
        assert!(init_logging(&good).is_ok());
        assert!(init_logging(&good).is_ok());
    }
}
