// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Error-kind assertions with descriptive failure messages.

use std::fmt::Debug;

use uanode_client::StatisticsSnapshot;
use uanode_core::{StatusCode, UaError, UaResult};

// =============================================================================
// Result Assertions
// =============================================================================

/// Assertion extensions for [`UaResult`].
pub trait UaResultAssertions<T> {
    /// Asserts success and returns the value.
    fn assert_ok(self) -> T;

    /// Asserts a service error carrying `status`.
    fn assert_service_status(self, status: StatusCode) -> UaError;

    /// Asserts a node-absent error.
    fn assert_node_absent(self) -> UaError;

    /// Asserts an interrupted wait.
    fn assert_interrupted(self) -> UaError;

    /// Asserts a coercion error.
    fn assert_coercion(self) -> UaError;
}

impl<T: Debug> UaResultAssertions<T> for UaResult<T> {
    fn assert_ok(self) -> T {
        match self {
            Ok(value) => value,
            Err(e) => panic!("Expected success, got error: {}", e),
        }
    }

    fn assert_service_status(self, status: StatusCode) -> UaError {
        let error = expect_err(self, "service error");
        assert!(
            error.is_service(),
            "Expected service error with {}, got: {}",
            status,
            error
        );
        assert_eq!(
            error.status_code(),
            status,
            "Service error carries the wrong status: {}",
            error
        );
        error
    }

    fn assert_node_absent(self) -> UaError {
        let error = expect_err(self, "node absent error");
        assert!(error.is_node_absent(), "Expected node absent error, got: {}", error);
        error
    }

    fn assert_interrupted(self) -> UaError {
        let error = expect_err(self, "interrupted error");
        assert!(error.is_interrupted(), "Expected interrupted error, got: {}", error);
        assert!(!error.is_service(), "Interruption must not be a service error");
        error
    }

    fn assert_coercion(self) -> UaError {
        let error = expect_err(self, "coercion error");
        assert!(error.is_coercion(), "Expected coercion error, got: {}", error);
        error
    }
}

fn expect_err<T: Debug>(result: UaResult<T>, what: &str) -> UaError {
    match result {
        Ok(value) => panic!("Expected {}, got Ok({:?})", what, value),
        Err(e) => e,
    }
}

// =============================================================================
// Statistics Assertions
// =============================================================================

/// Assertion extensions for [`StatisticsSnapshot`].
pub trait StatisticsAssertions {
    /// Asserts the number of resolutions performed.
    fn assert_resolutions(&self, expected: u64);

    /// Asserts the number of network reads and writes.
    fn assert_round_trips(&self, reads: u64, writes: u64);
}

impl StatisticsAssertions for StatisticsSnapshot {
    fn assert_resolutions(&self, expected: u64) {
        assert_eq!(
            self.resolutions, expected,
            "Expected {} resolutions, got {}",
            expected, self.resolutions
        );
    }

    fn assert_round_trips(&self, reads: u64, writes: u64) {
        assert_eq!(
            (self.reads, self.writes),
            (reads, writes),
            "Expected {} reads and {} writes, got {} and {}",
            reads,
            writes,
            self.reads,
            self.writes
        );
    }
}
