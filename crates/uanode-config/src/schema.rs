// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Settings schema.
//!
//! ```yaml
//! namespaces:
//!   - urn:sylvex:plant
//! accessor:
//!   cache_base_attributes: true
//!   memoize_absent_members: true
//! encoding:
//!   max_array_length: 65535
//!   max_body_bytes: 1048576
//! logging:
//!   level: info
//!   format: text
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uanode_core::{EncodingLimits, NamespaceTable, UA_NAMESPACE_URI};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// ClientSettings
// =============================================================================

/// Root settings for a uanode client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Namespace URIs after the standard namespace, in index order.
    #[serde(default)]
    pub namespaces: Vec<String>,

    /// Typed accessor behavior.
    #[serde(default)]
    pub accessor: AccessorSettings,

    /// Encoding limits.
    #[serde(default)]
    pub encoding: EncodingSettings,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClientSettings {
    /// Validates the settings.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for (i, uri) in self.namespaces.iter().enumerate() {
            let field = format!("namespaces[{}]", i);
            if uri.trim().is_empty() {
                return Err(ConfigError::validation(field, "cannot be empty"));
            }
            if uri == UA_NAMESPACE_URI {
                return Err(ConfigError::validation(
                    field,
                    "the standard namespace is always index 0",
                ));
            }
            if !seen.insert(uri.as_str()) {
                return Err(ConfigError::validation(field, format!("duplicate URI '{}'", uri)));
            }
        }

        if self.namespaces.len() >= u16::MAX as usize {
            return Err(ConfigError::validation("namespaces", "too many namespaces"));
        }

        self.encoding.validate()?;

        Ok(())
    }

    /// Builds the namespace table described by these settings.
    pub fn namespace_table(&self) -> NamespaceTable {
        let mut table = NamespaceTable::new();
        for uri in &self.namespaces {
            table.register(uri.clone());
        }
        table
    }
}

// =============================================================================
// AccessorSettings
// =============================================================================

/// Typed accessor behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorSettings {
    /// Serve base node attributes from a per-node cache after the first read.
    #[serde(default = "default_true")]
    pub cache_base_attributes: bool,

    /// Remember that a member does not exist so later lookups skip resolution.
    #[serde(default = "default_true")]
    pub memoize_absent_members: bool,
}

impl Default for AccessorSettings {
    fn default() -> Self {
        Self {
            cache_base_attributes: true,
            memoize_absent_members: true,
        }
    }
}

// =============================================================================
// EncodingSettings
// =============================================================================

/// Encoding limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingSettings {
    /// Maximum array length.
    #[serde(default = "default_max_array_length")]
    pub max_array_length: usize,

    /// Maximum encoded body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl EncodingSettings {
    /// Validates the limits.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_array_length == 0 {
            return Err(ConfigError::validation(
                "encoding.max_array_length",
                "must be greater than 0",
            ));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::validation(
                "encoding.max_body_bytes",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Returns the encoding limits.
    pub fn limits(&self) -> EncodingLimits {
        EncodingLimits {
            max_array_length: self.max_array_length,
            max_body_bytes: self.max_body_bytes,
        }
    }
}

impl Default for EncodingSettings {
    fn default() -> Self {
        Self {
            max_array_length: default_max_array_length(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

// =============================================================================
// LoggingConfig
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the filter directive for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a level name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable text.
    #[default]
    Text,
    /// JSON lines.
    Json,
    /// Compact single-line text.
    Compact,
}

impl LogFormat {
    /// Parses a format name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "text" | "pretty" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }
}

// =============================================================================
// Defaults
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_max_array_length() -> usize {
    EncodingLimits::DEFAULT_MAX_ARRAY_LENGTH
}

fn default_max_body_bytes() -> usize {
    EncodingLimits::DEFAULT_MAX_BODY_BYTES
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ClientSettings::default();
        assert!(settings.accessor.cache_base_attributes);
        assert!(settings.accessor.memoize_absent_members);
        assert_eq!(settings.encoding.limits(), EncodingLimits::default());
        assert_eq!(settings.logging.level, LogLevel::Info);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: ClientSettings =
            serde_json::from_str(r#"{"accessor": {"memoize_absent_members": false}}"#).unwrap();
        assert!(settings.accessor.cache_base_attributes);
        assert!(!settings.accessor.memoize_absent_members);
        assert_eq!(settings.encoding.max_array_length, 65_535);
    }

    #[test]
    fn test_namespace_table() {
        let settings = ClientSettings {
            namespaces: vec!["urn:a".into(), "urn:b".into()],
            ..Default::default()
        };
        let table = settings.namespace_table();
        assert_eq!(table.index_of("urn:a"), Some(1));
        assert_eq!(table.index_of("urn:b"), Some(2));
    }

    #[test]
    fn test_validate_rejects_bad_namespaces() {
        let duplicate = ClientSettings {
            namespaces: vec!["urn:a".into(), "urn:a".into()],
            ..Default::default()
        };
        assert!(duplicate.validate().is_err());

        let standard = ClientSettings {
            namespaces: vec![UA_NAMESPACE_URI.into()],
            ..Default::default()
        };
        assert!(standard.validate().is_err());

        let empty = ClientSettings {
            namespaces: vec!["  ".into()],
            ..Default::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut settings = ClientSettings::default();
        settings.encoding.max_array_length = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_level_and_format_parse() {
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("loud"), None);
        assert_eq!(LogFormat::parse("Json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("xml"), None);
    }
}
