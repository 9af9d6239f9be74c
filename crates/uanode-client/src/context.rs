// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Client context shared by every node proxy.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::info;
use uanode_config::{AccessorSettings, ClientSettings};
use uanode_core::{ConfigurationError, EncodingContext, NodeClass, NodeId, QualifiedName, UaResult};

use crate::blocking::{self, BlockingRuntime, Interrupter};
use crate::channel::AttributeChannel;
use crate::node::UaNode;
use crate::resolver::NodeResolver;

// =============================================================================
// ClientContext
// =============================================================================

/// Collaborators and settings shared by all proxies of one session.
pub struct ClientContext {
    channel: Arc<dyn AttributeChannel>,
    resolver: Arc<dyn NodeResolver>,
    encoding: EncodingContext,
    interrupter: Interrupter,
    runtime: BlockingRuntime,
    settings: AccessorSettings,
    stats: AccessorStatistics,
}

impl ClientContext {
    /// Creates a builder.
    pub fn builder() -> ClientContextBuilder {
        ClientContextBuilder::new()
    }

    /// Creates a context from loaded settings.
    pub fn from_settings<C, R>(settings: &ClientSettings, channel: C, resolver: R) -> UaResult<Arc<Self>>
    where
        C: AttributeChannel + 'static,
        R: NodeResolver + 'static,
    {
        Self::builder()
            .channel(channel)
            .resolver(resolver)
            .encoding(EncodingContext::new(
                settings.namespace_table(),
                settings.encoding.limits(),
            ))
            .settings(settings.accessor)
            .build()
    }

    /// Creates a proxy for a node reached without resolution, such as a
    /// well-known folder or an id known in advance.
    pub fn node(
        self: &Arc<Self>,
        node_id: NodeId,
        node_class: NodeClass,
        browse_name: QualifiedName,
    ) -> Arc<UaNode> {
        Arc::new(UaNode::new(Arc::clone(self), node_id, node_class, browse_name, None))
    }

    /// Returns the attribute channel.
    pub fn channel(&self) -> &dyn AttributeChannel {
        self.channel.as_ref()
    }

    /// Returns the node resolver.
    pub fn resolver(&self) -> &dyn NodeResolver {
        self.resolver.as_ref()
    }

    /// Returns the encoding context.
    pub fn encoding(&self) -> &EncodingContext {
        &self.encoding
    }

    /// Returns the interrupter used by blocking calls.
    pub fn interrupter(&self) -> &Interrupter {
        &self.interrupter
    }

    /// Returns the runtime blocking calls are driven on.
    pub fn runtime(&self) -> &BlockingRuntime {
        &self.runtime
    }

    /// Blocks the calling thread on `future` until it completes or the
    /// interrupter fires.
    pub fn wait<F, T>(&self, operation: &str, future: F) -> UaResult<T>
    where
        F: Future<Output = UaResult<T>>,
    {
        blocking::wait(self.runtime.handle(), &self.interrupter, operation, future)
    }

    /// Returns the accessor settings.
    pub fn settings(&self) -> &AccessorSettings {
        &self.settings
    }

    /// Returns the statistics.
    pub fn stats(&self) -> &AccessorStatistics {
        &self.stats
    }
}

impl fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientContext")
            .field("settings", &self.settings)
            .field("namespaces", &self.encoding.namespaces().len())
            .field("interrupted", &self.interrupter.is_interrupted())
            .field("runtime", &self.runtime)
            .finish()
    }
}

// =============================================================================
// ClientContextBuilder
// =============================================================================

/// Builder for [`ClientContext`].
#[derive(Default)]
pub struct ClientContextBuilder {
    channel: Option<Arc<dyn AttributeChannel>>,
    resolver: Option<Arc<dyn NodeResolver>>,
    encoding: Option<EncodingContext>,
    interrupter: Option<Interrupter>,
    runtime: Option<Handle>,
    settings: AccessorSettings,
}

impl ClientContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the attribute channel.
    pub fn channel(mut self, channel: impl AttributeChannel + 'static) -> Self {
        self.channel = Some(Arc::new(channel));
        self
    }

    /// Sets the node resolver.
    pub fn resolver(mut self, resolver: impl NodeResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Sets the encoding context.
    pub fn encoding(mut self, encoding: EncodingContext) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Shares an existing interrupter.
    pub fn interrupter(mut self, interrupter: Interrupter) -> Self {
        self.interrupter = Some(interrupter);
        self
    }

    /// Drives blocking calls on the given runtime.
    ///
    /// Without one, the runtime current at build time is used, or a
    /// dedicated runtime when there is none.
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Sets the accessor settings.
    pub fn settings(mut self, settings: AccessorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Builds the context.
    ///
    /// # Errors
    ///
    /// Fails if no channel or no resolver was set, or if no runtime is
    /// available for blocking calls.
    pub fn build(self) -> UaResult<Arc<ClientContext>> {
        let channel = self
            .channel
            .ok_or_else(|| ConfigurationError::missing_component("attribute channel"))?;
        let resolver = self
            .resolver
            .ok_or_else(|| ConfigurationError::missing_component("node resolver"))?;
        let encoding = self.encoding.unwrap_or_default();
        let runtime = match self.runtime {
            Some(handle) => BlockingRuntime::from_handle(handle),
            None => BlockingRuntime::current_or_dedicated()?,
        };

        info!(
            namespaces = encoding.namespaces().len(),
            cache_base_attributes = self.settings.cache_base_attributes,
            memoize_absent_members = self.settings.memoize_absent_members,
            dedicated_runtime = runtime.is_dedicated(),
            "Client context created"
        );

        Ok(Arc::new(ClientContext {
            channel,
            resolver,
            encoding,
            interrupter: self.interrupter.unwrap_or_default(),
            runtime,
            settings: self.settings,
            stats: AccessorStatistics::new(),
        }))
    }
}

// =============================================================================
// AccessorStatistics
// =============================================================================

/// Counters for accessor activity.
#[derive(Debug, Default)]
pub struct AccessorStatistics {
    /// Resolution requests sent to the resolver.
    pub resolutions: AtomicU64,

    /// Member lookups served from a member cache.
    pub member_cache_hits: AtomicU64,

    /// Resolutions that found no member.
    pub absent_members: AtomicU64,

    /// Local `get` calls.
    pub local_gets: AtomicU64,

    /// Local `set` calls.
    pub local_sets: AtomicU64,

    /// Typed reads issued.
    pub reads: AtomicU64,

    /// Typed writes issued.
    pub writes: AtomicU64,

    /// Typed operations that failed.
    pub failures: AtomicU64,
}

/// Point-in-time copy of [`AccessorStatistics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatisticsSnapshot {
    /// Resolution requests sent to the resolver.
    pub resolutions: u64,
    /// Member lookups served from a member cache.
    pub member_cache_hits: u64,
    /// Resolutions that found no member.
    pub absent_members: u64,
    /// Local `get` calls.
    pub local_gets: u64,
    /// Local `set` calls.
    pub local_sets: u64,
    /// Typed reads issued.
    pub reads: u64,
    /// Typed writes issued.
    pub writes: u64,
    /// Typed operations that failed.
    pub failures: u64,
}

impl AccessorStatistics {
    /// Creates new statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a resolution request.
    pub fn record_resolution(&self) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a member cache hit.
    pub fn record_member_cache_hit(&self) {
        self.member_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a resolution that found nothing.
    pub fn record_absent_member(&self) {
        self.absent_members.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a local get.
    pub fn record_local_get(&self) {
        self.local_gets.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a local set.
    pub fn record_local_set(&self) {
        self.local_sets.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a typed read.
    pub fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a typed write.
    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a failed typed operation.
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the share of member lookups served from cache.
    pub fn cache_hit_rate(&self) -> f64 {
        let hits = self.member_cache_hits.load(Ordering::Relaxed);
        let misses = self.resolutions.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Returns a copy of the current counters.
    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            resolutions: self.resolutions.load(Ordering::Relaxed),
            member_cache_hits: self.member_cache_hits.load(Ordering::Relaxed),
            absent_members: self.absent_members.load(Ordering::Relaxed),
            local_gets: self.local_gets.load(Ordering::Relaxed),
            local_sets: self.local_sets.load(Ordering::Relaxed),
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
