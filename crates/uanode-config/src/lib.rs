// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # uanode-config
//!
//! Client settings for the typed node accessor.
//!
//! ## Features
//!
//! - YAML, TOML and JSON settings files
//! - `${VAR}` / `${VAR:default}` placeholders
//! - `UANODE_*` environment overrides
//! - Logging initialization
//!
//! ## Example
//!
//! ```no_run
//! use uanode_config::{init_logging, load_settings};
//!
//! let settings = load_settings("uanode.yaml").unwrap();
//! init_logging(&settings.logging).unwrap();
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod logging;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    load_settings, load_settings_str, ConfigFormat, SettingsLoader, SettingsLoaderBuilder,
    DEFAULT_ENV_PREFIX,
};
pub use logging::{build_filter, init_logging, parse_level};
pub use schema::{
    AccessorSettings, ClientSettings, EncodingSettings, LogFormat, LogLevel, LoggingConfig,
};
