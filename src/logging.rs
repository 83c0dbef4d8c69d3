// ABOUTME: Logging configuration and structured logging setup for observability
// ABOUTME: Configures log levels, formatters, and output format from the environment
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Production-ready logging configuration with structured output

use anyhow::Result;
use std::env;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Log output format options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log filter directive (`RUST_LOG` syntax)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        Self { level, format }
    }
}

/// Initialize the global tracing subscriber from the environment
///
/// # Errors
///
/// Returns an error if the filter directive cannot be parsed or a
/// subscriber was already installed.
pub fn init_from_env() -> Result<()> {
    init(&LoggingConfig::from_env())
}

/// Initialize the global tracing subscriber with an explicit configuration
///
/// # Errors
///
/// Returns an error if the filter directive cannot be parsed or a
/// subscriber was already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.level)?
        // Noise reduction for dependency internals regardless of RUST_LOG
        .add_directive(
            "hyper=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
        .add_directive(
            "mongodb=warn"
                .parse()
                .unwrap_or_else(|_| tracing::Level::WARN.into()),
        )
        .add_directive(
            "tower_http=info"
                .parse()
                .unwrap_or_else(|_| tracing::Level::INFO.into()),
        );

    let fmt_layer = match config.format {
        LogFormat::Json => fmt::layer().with_target(true).json().boxed(),
        LogFormat::Pretty => fmt::layer().with_target(true).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        std::env::remove_var("RUST_LOG");
        std::env::remove_var("LOG_FORMAT");

        let config = LoggingConfig::from_env();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    #[serial]
    fn test_from_env_json_format() {
        std::env::set_var("LOG_FORMAT", "json");
        let config = LoggingConfig::from_env();
        assert_eq!(config.format, LogFormat::Json);
        std::env::remove_var("LOG_FORMAT");
    }
}
