// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Shared test utilities.

pub mod assertions;
pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use assertions::*;
pub use fixtures::*;
pub use harness::*;
pub use mocks::*;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes test logging once per process.
///
/// Honors `RUST_LOG`; defaults to warnings plus debug output from uanode.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(
                        "warn,uanode_client=debug,uanode_config=debug",
                    )
                }),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Returns a process-unique id for naming test resources.
pub fn unique_test_id() -> u64 {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}
