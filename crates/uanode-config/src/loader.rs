// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Settings loading.
//!
//! # Loading Pipeline
//!
//! 1. Read the file
//! 2. Resolve `${VAR}` / `${VAR:default}` placeholders
//! 3. Parse YAML, TOML or JSON (chosen by extension)
//! 4. Apply environment variable overrides
//! 5. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! UANODE_LOG_LEVEL=debug
//! UANODE_LOG_FORMAT=json
//! UANODE_MAX_ARRAY_LENGTH=1024
//! UANODE_MAX_BODY_BYTES=65536
//! UANODE_CACHE_BASE_ATTRIBUTES=false
//! UANODE_MEMOIZE_ABSENT_MEMBERS=false
//! ```

use std::env;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{ClientSettings, LogFormat, LogLevel};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "UANODE";

// =============================================================================
// SettingsLoader
// =============================================================================

/// Loads [`ClientSettings`] from files or strings.
///
/// # Examples
///
/// ```no_run
/// use uanode_config::SettingsLoader;
///
/// let settings = SettingsLoader::new().load("uanode.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve environment variables.
    resolve_env_vars: bool,
}

impl SettingsLoader {
    /// Creates a loader with default settings.
    pub fn new() -> Self {
        Self {
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            resolve_env_vars: true,
        }
    }

    /// Creates a builder for configuring the loader.
    pub fn builder() -> SettingsLoaderBuilder {
        SettingsLoaderBuilder::new()
    }

    /// Loads settings from a file.
    ///
    /// The format is picked from the extension: `.yaml`/`.yml`, `.toml` or
    /// `.json`.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<ClientSettings> {
        let path = path.as_ref();
        info!("Loading settings from: {}", path.display());

        let content = self.read_file(path)?;
        let format = ConfigFormat::from_path(path)?;

        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(&content)
        } else {
            content
        };

        let mut settings = parse_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })?;

        self.finish(&mut settings)?;

        debug!(
            namespaces = settings.namespaces.len(),
            max_array_length = settings.encoding.max_array_length,
            "Settings loaded"
        );

        Ok(settings)
    }

    /// Loads settings from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<ClientSettings> {
        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(content)
        } else {
            content.to_string()
        };

        let mut settings = parse_str(&content, format)?;
        self.finish(&mut settings)?;
        Ok(settings)
    }

    fn finish(&self, settings: &mut ClientSettings) -> ConfigResult<()> {
        if self.resolve_env_vars {
            self.apply_env_overrides(settings)?;
        }
        settings.validate()
    }

    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
    }

    /// Resolves `${VAR_NAME}` and `${VAR_NAME:default}` placeholders.
    ///
    /// Unknown variables without a default are left in place.
    fn resolve_env_placeholders(&self, content: &str) -> String {
        let mut result = String::with_capacity(content.len());
        let mut chars = content.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' || chars.peek() != Some(&'{') {
                result.push(c);
                continue;
            }
            chars.next();

            let mut var_content = String::new();
            let mut found_close = false;
            for c in chars.by_ref() {
                if c == '}' {
                    found_close = true;
                    break;
                }
                var_content.push(c);
            }

            if !found_close {
                result.push_str("${");
                result.push_str(&var_content);
                continue;
            }

            let (var_name, default_value) = match var_content.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (var_content.as_str(), None),
            };

            match (env::var(var_name), default_value) {
                (Ok(value), _) => result.push_str(&value),
                (Err(_), Some(default)) => result.push_str(default),
                (Err(_), None) => {
                    warn!("Environment variable '{}' not found", var_name);
                    result.push_str(&format!("${{{}}}", var_name));
                }
            }
        }

        result
    }

    fn apply_env_overrides(&self, settings: &mut ClientSettings) -> ConfigResult<()> {
        if let Some(value) = self.env_value("LOG_LEVEL") {
            settings.logging.level = LogLevel::parse(&value).ok_or_else(|| {
                ConfigError::invalid_env_var(self.env_name("LOG_LEVEL"), "expected a log level")
            })?;
        }
        if let Some(value) = self.env_value("LOG_FORMAT") {
            settings.logging.format = LogFormat::parse(&value).ok_or_else(|| {
                ConfigError::invalid_env_var(
                    self.env_name("LOG_FORMAT"),
                    "expected text, json or compact",
                )
            })?;
        }
        if let Some(value) = self.env_value("MAX_ARRAY_LENGTH") {
            settings.encoding.max_array_length = value.parse().map_err(|_| {
                ConfigError::invalid_env_var(self.env_name("MAX_ARRAY_LENGTH"), "expected a number")
            })?;
        }
        if let Some(value) = self.env_value("MAX_BODY_BYTES") {
            settings.encoding.max_body_bytes = value.parse().map_err(|_| {
                ConfigError::invalid_env_var(self.env_name("MAX_BODY_BYTES"), "expected a number")
            })?;
        }
        if let Some(value) = self.env_value("CACHE_BASE_ATTRIBUTES") {
            settings.accessor.cache_base_attributes = parse_bool(&value);
        }
        if let Some(value) = self.env_value("MEMOIZE_ABSENT_MEMBERS") {
            settings.accessor.memoize_absent_members = parse_bool(&value);
        }

        Ok(())
    }

    fn env_name(&self, key: &str) -> String {
        format!("{}_{}", self.env_prefix, key)
    }

    fn env_value(&self, key: &str) -> Option<String> {
        env::var(self.env_name(key)).ok()
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SettingsLoaderBuilder
// =============================================================================

/// Builder for [`SettingsLoader`].
#[derive(Debug, Default)]
pub struct SettingsLoaderBuilder {
    env_prefix: Option<String>,
    resolve_env_vars: Option<bool>,
}

impl SettingsLoaderBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the environment prefix.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn resolve_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = Some(enabled);
        self
    }

    /// Builds the loader.
    pub fn build(self) -> SettingsLoader {
        let mut loader = SettingsLoader::new();
        if let Some(prefix) = self.env_prefix {
            loader.env_prefix = prefix;
        }
        if let Some(resolve_env_vars) = self.resolve_env_vars {
            loader.resolve_env_vars = resolve_env_vars;
        }
        loader
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported settings file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_str<T: DeserializeOwned>(content: &str, format: ConfigFormat) -> ConfigResult<T> {
    match format {
        ConfigFormat::Yaml => parse_yaml(content),
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

fn parse_yaml<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .map_err(|e| ConfigError::serialization(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::serialization(e.to_string()))
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "true" | "1" | "yes" | "on" | "enabled"
    )
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads settings from a file with the default loader.
pub fn load_settings(path: impl AsRef<Path>) -> ConfigResult<ClientSettings> {
    SettingsLoader::new().load(path)
}

/// Loads settings from a string with the default loader.
pub fn load_settings_str(content: &str, format: ConfigFormat) -> ConfigResult<ClientSettings> {
    SettingsLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn isolated(prefix: &str) -> SettingsLoader {
        SettingsLoader::builder().env_prefix(prefix).build()
    }

    const YAML: &str = r#"
namespaces:
  - urn:sylvex:plant
accessor:
  cache_base_attributes: false
encoding:
  max_array_length: 128
logging:
  level: debug
  format: json
"#;

    #[test]
    fn test_load_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let settings = isolated("UANODE_TEST_YAML").load(file.path()).unwrap();
        assert_eq!(settings.namespaces, vec!["urn:sylvex:plant".to_string()]);
        assert!(!settings.accessor.cache_base_attributes);
        assert!(settings.accessor.memoize_absent_members);
        assert_eq!(settings.encoding.max_array_length, 128);
        assert_eq!(settings.logging.level, LogLevel::Debug);
        assert_eq!(settings.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_toml() {
        let toml = r#"
namespaces = ["urn:a"]

[encoding]
max_body_bytes = 4096
"#;
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(toml.as_bytes()).unwrap();

        let settings = isolated("UANODE_TEST_TOML").load(file.path()).unwrap();
        assert_eq!(settings.encoding.max_body_bytes, 4096);
        assert_eq!(settings.encoding.max_array_length, 65_535);
    }

    #[test]
    fn test_load_json_str() {
        let settings = isolated("UANODE_TEST_JSON")
            .load_from_str(r#"{"logging": {"level": "warn"}}"#, ConfigFormat::Json)
            .unwrap();
        assert_eq!(settings.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_missing_file() {
        let err = isolated("UANODE_TEST_MISSING")
            .load("/nonexistent/uanode.yaml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = isolated("UANODE_TEST_MALFORMED").load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("a.TOML")).unwrap(),
            ConfigFormat::Toml
        );
        assert!(ConfigFormat::from_path(Path::new("a.ini")).is_err());
        assert!(ConfigFormat::from_path(Path::new("settings")).is_err());
    }

    #[test]
    fn test_env_placeholder_with_default() {
        let loader = SettingsLoader::new();
        let result = loader.resolve_env_placeholders("level: ${UANODE_TEST_UNSET_VAR:warn}");
        assert_eq!(result, "level: warn");
    }

    #[test]
    fn test_env_placeholder_without_default_is_kept() {
        let loader = SettingsLoader::new();
        let result = loader.resolve_env_placeholders("a: ${UANODE_TEST_UNSET_OTHER}");
        assert_eq!(result, "a: ${UANODE_TEST_UNSET_OTHER}");

        let unterminated = loader.resolve_env_placeholders("a: ${OPEN");
        assert_eq!(unterminated, "a: ${OPEN");
    }

    #[test]
    fn test_env_overrides() {
        env::set_var("UANODE_TEST_OVR_LOG_LEVEL", "error");
        env::set_var("UANODE_TEST_OVR_MAX_ARRAY_LENGTH", "16");
        env::set_var("UANODE_TEST_OVR_MEMOIZE_ABSENT_MEMBERS", "off");

        let settings = isolated("UANODE_TEST_OVR")
            .load_from_str("{}", ConfigFormat::Json)
            .unwrap();
        assert_eq!(settings.logging.level, LogLevel::Error);
        assert_eq!(settings.encoding.max_array_length, 16);
        assert!(!settings.accessor.memoize_absent_members);
    }

    #[test]
    fn test_invalid_env_override() {
        env::set_var("UANODE_TEST_BAD_MAX_BODY_BYTES", "lots");

        let err = isolated("UANODE_TEST_BAD")
            .load_from_str("{}", ConfigFormat::Json)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { .. }));
    }

    #[test]
    fn test_validation_runs_after_load() {
        let err = isolated("UANODE_TEST_VALIDATE")
            .load_from_str(r#"{"encoding": {"max_array_length": 0}}"#, ConfigFormat::Json)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("on"));
        assert!(!parse_bool("off"));
        assert!(!parse_bool("nope"));
    }
}
