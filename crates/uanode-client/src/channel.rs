// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Attribute access channel.
//!
//! The channel is the only place where attribute values cross the wire.
//! Everything above it works against this trait, so tests can substitute an
//! in-memory implementation for a live session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::trace;
use uanode_core::{AttributeId, DataValue, NodeId, StatusCode, UaResult};

// =============================================================================
// AttributeChannel
// =============================================================================

/// Reads and writes single node attributes on a server.
///
/// A Bad status reported by the server for an individual attribute is part
/// of the returned value, not an `Err`. `Err` is reserved for failures of
/// the request itself.
#[async_trait]
pub trait AttributeChannel: Send + Sync {
    /// Reads one attribute of a node.
    async fn read_attribute(&self, node_id: &NodeId, attribute: AttributeId)
        -> UaResult<DataValue>;

    /// Writes one attribute of a node and returns the status the server
    /// reported for it.
    async fn write_attribute(
        &self,
        node_id: &NodeId,
        attribute: AttributeId,
        value: DataValue,
    ) -> UaResult<StatusCode>;
}

#[async_trait]
impl<C: AttributeChannel + ?Sized> AttributeChannel for Arc<C> {
    async fn read_attribute(
        &self,
        node_id: &NodeId,
        attribute: AttributeId,
    ) -> UaResult<DataValue> {
        (**self).read_attribute(node_id, attribute).await
    }

    async fn write_attribute(
        &self,
        node_id: &NodeId,
        attribute: AttributeId,
        value: DataValue,
    ) -> UaResult<StatusCode> {
        (**self).write_attribute(node_id, attribute, value).await
    }
}

// =============================================================================
// ChannelStatistics
// =============================================================================

/// Counters for channel operations.
#[derive(Debug, Default)]
pub struct ChannelStatistics {
    /// Completed reads.
    pub reads: AtomicU64,

    /// Completed writes.
    pub writes: AtomicU64,

    /// Requests that failed outright.
    pub failures: AtomicU64,

    /// Completed requests whose status was Bad.
    pub bad_statuses: AtomicU64,

    /// Accumulated latency of completed requests in microseconds.
    pub total_latency_us: AtomicU64,
}

impl ChannelStatistics {
    /// Creates new statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed read.
    pub fn record_read(&self, duration: Duration, status: StatusCode) {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.record_completion(duration, status);
    }

    /// Records a completed write.
    pub fn record_write(&self, duration: Duration, status: StatusCode) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.record_completion(duration, status);
    }

    /// Records a failed request.
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    fn record_completion(&self, duration: Duration, status: StatusCode) {
        self.total_latency_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        if status.is_bad() {
            self.bad_statuses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Returns the average latency of completed requests.
    pub fn average_latency(&self) -> Duration {
        let total_ops = self.reads.load(Ordering::Relaxed) + self.writes.load(Ordering::Relaxed);
        if total_ops == 0 {
            return Duration::ZERO;
        }
        Duration::from_micros(self.total_latency_us.load(Ordering::Relaxed) / total_ops)
    }

    /// Resets all statistics.
    pub fn reset(&self) {
        self.reads.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        self.bad_statuses.store(0, Ordering::Relaxed);
        self.total_latency_us.store(0, Ordering::Relaxed);
    }
}

// =============================================================================
// InstrumentedChannel
// =============================================================================

/// A channel wrapper that traces every request and records statistics.
pub struct InstrumentedChannel<C> {
    inner: C,
    stats: Arc<ChannelStatistics>,
}

impl<C: AttributeChannel> InstrumentedChannel<C> {
    /// Wraps a channel.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            stats: Arc::new(ChannelStatistics::new()),
        }
    }

    /// Returns the statistics.
    pub fn stats(&self) -> Arc<ChannelStatistics> {
        Arc::clone(&self.stats)
    }

    /// Returns the wrapped channel.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: AttributeChannel> AttributeChannel for InstrumentedChannel<C> {
    async fn read_attribute(
        &self,
        node_id: &NodeId,
        attribute: AttributeId,
    ) -> UaResult<DataValue> {
        let start = Instant::now();
        match self.inner.read_attribute(node_id, attribute).await {
            Ok(value) => {
                let elapsed = start.elapsed();
                self.stats.record_read(elapsed, value.status);
                trace!(
                    node_id = %node_id,
                    attribute = %attribute,
                    status = %value.status,
                    elapsed_us = elapsed.as_micros() as u64,
                    "Attribute read"
                );
                Ok(value)
            }
            Err(e) => {
                self.stats.record_failure();
                trace!(node_id = %node_id, attribute = %attribute, error = %e, "Attribute read failed");
                Err(e)
            }
        }
    }

    async fn write_attribute(
        &self,
        node_id: &NodeId,
        attribute: AttributeId,
        value: DataValue,
    ) -> UaResult<StatusCode> {
        let start = Instant::now();
        match self.inner.write_attribute(node_id, attribute, value).await {
            Ok(status) => {
                let elapsed = start.elapsed();
                self.stats.record_write(elapsed, status);
                trace!(
                    node_id = %node_id,
                    attribute = %attribute,
                    status = %status,
                    elapsed_us = elapsed.as_micros() as u64,
                    "Attribute written"
                );
                Ok(status)
            }
            Err(e) => {
                self.stats.record_failure();
                trace!(node_id = %node_id, attribute = %attribute, error = %e, "Attribute write failed");
                Err(e)
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use uanode_core::{UaError, Variant};

    struct FixedChannel {
        status: StatusCode,
        fail: bool,
    }

    #[async_trait]
    impl AttributeChannel for FixedChannel {
        async fn read_attribute(&self, _: &NodeId, _: AttributeId) -> UaResult<DataValue> {
            if self.fail {
                return Err(UaError::channel("closed", StatusCode::BAD_COMMUNICATION_ERROR));
            }
            Ok(DataValue::value_only(Variant::Int32(5)).with_status(self.status))
        }

        async fn write_attribute(
            &self,
            _: &NodeId,
            _: AttributeId,
            _: DataValue,
        ) -> UaResult<StatusCode> {
            if self.fail {
                return Err(UaError::channel("closed", StatusCode::BAD_COMMUNICATION_ERROR));
            }
            Ok(self.status)
        }
    }

    #[tokio::test]
    async fn test_instrumented_counts_operations() {
        let channel = InstrumentedChannel::new(FixedChannel {
            status: StatusCode::GOOD,
            fail: false,
        });
        let node = NodeId::numeric(2, 1);

        channel.read_attribute(&node, AttributeId::Value).await.unwrap();
        channel
            .write_attribute(&node, AttributeId::Value, DataValue::value_only(1i32))
            .await
            .unwrap();

        let stats = channel.stats();
        assert_eq!(stats.reads.load(Ordering::Relaxed), 1);
        assert_eq!(stats.writes.load(Ordering::Relaxed), 1);
        assert_eq!(stats.bad_statuses.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_instrumented_counts_bad_status_and_failures() {
        let bad = InstrumentedChannel::new(FixedChannel {
            status: StatusCode::BAD_NOT_WRITABLE,
            fail: false,
        });
        let node = NodeId::numeric(2, 1);
        let status = bad
            .write_attribute(&node, AttributeId::Value, DataValue::value_only(1i32))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::BAD_NOT_WRITABLE);
        assert_eq!(bad.stats().bad_statuses.load(Ordering::Relaxed), 1);

        let failing = InstrumentedChannel::new(FixedChannel {
            status: StatusCode::GOOD,
            fail: true,
        });
        assert!(failing.read_attribute(&node, AttributeId::Value).await.is_err());
        assert_eq!(failing.stats().failures.load(Ordering::Relaxed), 1);
        assert_eq!(failing.stats().reads.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_average_latency() {
        let stats = ChannelStatistics::new();
        assert_eq!(stats.average_latency(), Duration::ZERO);

        stats.record_read(Duration::from_millis(10), StatusCode::GOOD);
        stats.record_write(Duration::from_millis(20), StatusCode::GOOD);
        assert_eq!(stats.average_latency(), Duration::from_millis(15));

        stats.reset();
        assert_eq!(stats.reads.load(Ordering::Relaxed), 0);
    }
}
