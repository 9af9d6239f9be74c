// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # uanode-tests
//!
//! Integration tests for the uanode workspace.
//!
//! ## Module Structure
//!
//! ```text
//! uanode-tests/
//! ├── src/
//! │   ├── lib.rs              # This file
//! │   └── common/
//! │       ├── mod.rs          # Logging setup, shared helpers
//! │       ├── mocks.rs        # In-memory channel, resolver and browse service
//! │       ├── fixtures.rs     # Fake node trees and sample values
//! │       ├── harness.rs      # Timeouts, temp settings files
//! │       └── assertions.rs   # Error and statistics assertions
//! └── tests/
//!     ├── integration_accessor.rs    # get/set/read/write per property
//!     ├── integration_resolution.rs  # Member resolution and caching
//!     └── integration_config.rs      # Settings files to a working context
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All integration tests
//! cargo test -p uanode-tests
//!
//! # One file
//! cargo test -p uanode-tests --test integration_accessor
//!
//! # With logs
//! RUST_LOG=uanode=debug cargo test -p uanode-tests -- --nocapture
//! ```
//!
//! ## Test Categories
//!
//! - **Accessor**: local cache semantics, echo of writes, error mapping
//! - **Resolution**: memoization, concurrent lookups, absent members,
//!   browse-based resolution
//! - **Config**: YAML/TOML/JSON files feeding `ClientContext::from_settings`

pub mod common;
