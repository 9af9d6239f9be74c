// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Logging and tracing initialization.
//!
//! `RUST_LOG` takes precedence over the configured level when it is set.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{LogFormat, LoggingConfig};

// =============================================================================
// Logging Initialization
// =============================================================================

/// Installs the global tracing subscriber.
///
/// Fails if a global subscriber is already installed.
///
/// # Example
///
/// ```ignore
/// use uanode_config::{init_logging, LoggingConfig};
///
/// init_logging(&LoggingConfig::default())?;
/// ```
pub fn init_logging(config: &LoggingConfig) -> ConfigResult<()> {
    let env_filter = build_filter(config);

    let result = match config.format {
        LogFormat::Text => init_text_logging(env_filter),
        LogFormat::Json => init_json_logging(env_filter),
        LogFormat::Compact => init_compact_logging(env_filter),
    };

    result.map_err(|e| ConfigError::logging(e.to_string()))
}

/// Builds the level filter for a logging configuration.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()))
}

fn init_text_logging(filter: EnvFilter) -> Result<(), tracing_subscriber::util::TryInitError> {
    let is_terminal = std::io::IsTerminal::is_terminal(&std::io::stdout());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(is_terminal),
        )
        .try_init()
}

fn init_json_logging(filter: EnvFilter) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_current_span(true)
                .with_span_list(true),
        )
        .try_init()
}

fn init_compact_logging(filter: EnvFilter) -> Result<(), tracing_subscriber::util::TryInitError> {
    let is_terminal = std::io::IsTerminal::is_terminal(&std::io::stdout());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(is_terminal),
        )
        .try_init()
}

// =============================================================================
// Log Level Parsing
// =============================================================================

/// Parses a log level string into a `Level`, defaulting to `INFO`.
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("warning"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
    }

    #[test]
    fn test_parse_level_invalid() {
        assert_eq!(parse_level("invalid"), Level::INFO);
        assert_eq!(parse_level(""), Level::INFO);
    }

    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig::default();
        let _ = init_logging(&config);
        let err = init_logging(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Logging { .. }));
    }
}
