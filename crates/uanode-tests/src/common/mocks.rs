// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! In-memory stand-ins for the services a session provides.
//!
//! ## Design Principles
//!
//! - Every call is counted so tests can assert on round trips
//! - Failures are injected per call or per mode
//! - State lives behind `parking_lot` locks and atomics; mocks are `Send + Sync`

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use uanode_client::{
    AttributeChannel, BrowseDescription, BrowseService, MemberKey, MemberRequest, NodeResolver,
    ReferenceDescription, ResolvedNode,
};
use uanode_core::{
    type_definitions, AttributeId, DataValue, ExpandedNodeId, LocalizedText, NodeClass, NodeId,
    QualifiedName, StatusCode, UaError, UaResult, Variant,
};

// =============================================================================
// Mock Attribute Channel
// =============================================================================

/// One recorded write.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRecord {
    /// Target node.
    pub node_id: NodeId,
    /// Target attribute.
    pub attribute: AttributeId,
    /// Value sent.
    pub value: DataValue,
}

/// An attribute channel backed by a map.
///
/// Accepted writes are stored and echoed back by later reads. Reading an
/// attribute that was never stored returns an empty Good value for `Value`
/// and `BadAttributeIdInvalid` for anything else.
#[derive(Debug, Default)]
pub struct MockAttributeChannel {
    /// Stored attribute values.
    values: RwLock<HashMap<(NodeId, AttributeId), DataValue>>,

    /// Status returned for every write instead of storing it.
    reject_writes: Mutex<Option<StatusCode>>,

    /// Status returned in place of the next read's value.
    bad_next_read: Mutex<Option<StatusCode>>,

    /// Fail the next read with a channel error.
    fail_next_read: AtomicBool,

    /// Never complete reads or writes.
    hang: AtomicBool,

    /// Delay every read and write on a tokio timer.
    latency: Mutex<Option<Duration>>,

    /// Reads issued.
    read_count: AtomicU64,

    /// Writes issued.
    write_count: AtomicU64,

    /// Every write received, accepted or not.
    write_history: Mutex<Vec<WriteRecord>>,
}

impl MockAttributeChannel {
    /// Creates an empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an attribute value.
    pub fn store(&self, node_id: NodeId, attribute: AttributeId, value: DataValue) {
        self.values.write().insert((node_id, attribute), value);
    }

    /// Stores a Good Value attribute.
    pub fn store_value(&self, node_id: NodeId, value: impl Into<Variant>) {
        self.store(node_id, AttributeId::Value, DataValue::value_only(value));
    }

    /// Returns a stored attribute value.
    pub fn stored(&self, node_id: &NodeId, attribute: AttributeId) -> Option<DataValue> {
        self.values.read().get(&(node_id.clone(), attribute)).cloned()
    }

    /// Rejects every following write with `status`.
    pub fn reject_writes_with(&self, status: StatusCode) {
        *self.reject_writes.lock() = Some(status);
    }

    /// Accepts writes again.
    pub fn accept_writes(&self) {
        *self.reject_writes.lock() = None;
    }

    /// Makes the next read return `status` with no value.
    pub fn bad_next_read(&self, status: StatusCode) {
        *self.bad_next_read.lock() = Some(status);
    }

    /// Makes the next read fail at the channel level.
    pub fn fail_next_read(&self) {
        self.fail_next_read.store(true, Ordering::SeqCst);
    }

    /// Makes reads and writes hang until the caller gives up.
    pub fn set_hang(&self, hang: bool) {
        self.hang.store(hang, Ordering::SeqCst);
    }

    /// Delays every read and write by `latency` with `tokio::time::sleep`.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = Some(latency);
    }

    /// Returns the number of reads issued.
    pub fn read_count(&self) -> u64 {
        self.read_count.load(Ordering::SeqCst)
    }

    /// Returns the number of writes issued.
    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::SeqCst)
    }

    /// Returns every write received.
    pub fn write_history(&self) -> Vec<WriteRecord> {
        self.write_history.lock().clone()
    }

    async fn maybe_hang(&self) {
        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.hang.load(Ordering::SeqCst) {
            futures::future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl AttributeChannel for MockAttributeChannel {
    async fn read_attribute(&self, node_id: &NodeId, attribute: AttributeId) -> UaResult<DataValue> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        self.maybe_hang().await;

        if self.fail_next_read.swap(false, Ordering::SeqCst) {
            return Err(UaError::channel(
                "injected read failure",
                StatusCode::BAD_COMMUNICATION_ERROR,
            ));
        }
        if let Some(status) = self.bad_next_read.lock().take() {
            return Ok(DataValue::from_status(status));
        }

        Ok(match self.stored(node_id, attribute) {
            Some(value) => value,
            None if attribute == AttributeId::Value => DataValue::default(),
            None => DataValue::from_status(StatusCode::BAD_ATTRIBUTE_ID_INVALID),
        })
    }

    async fn write_attribute(
        &self,
        node_id: &NodeId,
        attribute: AttributeId,
        value: DataValue,
    ) -> UaResult<StatusCode> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        self.maybe_hang().await;

        self.write_history.lock().push(WriteRecord {
            node_id: node_id.clone(),
            attribute,
            value: value.clone(),
        });

        if let Some(status) = *self.reject_writes.lock() {
            return Ok(status);
        }

        self.store(node_id.clone(), attribute, value);
        Ok(StatusCode::GOOD)
    }
}

// =============================================================================
// Mock Resolver
// =============================================================================

/// A resolver over a fixed parent/member table.
#[derive(Debug, Default)]
pub struct MockResolver {
    /// Members keyed by parent and qualified browse name.
    members: RwLock<HashMap<(NodeId, MemberKey), ResolvedNode>>,

    /// Resolutions performed.
    resolve_count: AtomicU64,

    /// Fail the next resolution with `BadCommunicationError`.
    fail_next: AtomicBool,

    /// Yield to the runtime before answering (tokio runtimes only).
    yield_first: AtomicBool,
}

impl MockResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a member of `parent`.
    pub fn add_member(&self, parent: NodeId, namespace_uri: &str, member: ResolvedNode) {
        let key = MemberKey {
            namespace_uri: namespace_uri.to_string(),
            browse_name: member.browse_name.name.clone(),
        };
        self.members.write().insert((parent, key), member);
    }

    /// Registers a property variable of `parent` in the standard namespace.
    pub fn add_property(&self, parent: NodeId, browse_name: &str, node_id: NodeId) {
        self.add_member(
            parent,
            uanode_core::UA_NAMESPACE_URI,
            ResolvedNode {
                node_id,
                node_class: NodeClass::Variable,
                browse_name: QualifiedName::new(0, browse_name),
                type_definition: Some(type_definitions::PROPERTY_TYPE),
            },
        );
    }

    /// Fails the next resolution.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Makes each resolution yield once before answering.
    pub fn set_yield_first(&self, yield_first: bool) {
        self.yield_first.store(yield_first, Ordering::SeqCst);
    }

    /// Returns the number of resolutions performed.
    pub fn resolve_count(&self) -> u64 {
        self.resolve_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NodeResolver for MockResolver {
    async fn resolve_member(
        &self,
        parent: &NodeId,
        request: &MemberRequest,
    ) -> UaResult<Option<ResolvedNode>> {
        self.resolve_count.fetch_add(1, Ordering::SeqCst);

        if self.yield_first.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(UaError::browse_failed(
                parent.to_string(),
                StatusCode::BAD_COMMUNICATION_ERROR,
            ));
        }

        Ok(self
            .members
            .read()
            .get(&(parent.clone(), request.key()))
            .cloned())
    }
}

// =============================================================================
// Mock Browse Service
// =============================================================================

/// A browse service over a fixed reference table.
#[derive(Debug, Default)]
pub struct MockBrowseService {
    /// Forward references per source node.
    references: RwLock<HashMap<NodeId, Vec<ReferenceDescription>>>,

    /// Every browse received.
    requests: Mutex<Vec<BrowseDescription>>,

    /// Status returned for every browse instead of answering.
    fail_with: Mutex<Option<StatusCode>>,
}

impl MockBrowseService {
    /// Creates an empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a forward reference from `source`.
    pub fn add_reference(&self, source: NodeId, reference: ReferenceDescription) {
        self.references.write().entry(source).or_default().push(reference);
    }

    /// Adds a `HasProperty` reference to a property variable.
    pub fn add_property(&self, source: NodeId, browse_name: QualifiedName, target: NodeId) {
        self.add_reference(
            source,
            ReferenceDescription {
                reference_type: uanode_core::reference_types::HAS_PROPERTY,
                is_forward: true,
                target: target.into(),
                display_name: LocalizedText::text(browse_name.name.clone()),
                browse_name,
                node_class: NodeClass::Variable,
                type_definition: type_definitions::PROPERTY_TYPE.into(),
            },
        );
    }

    /// Adds a `HasComponent` reference to an object.
    pub fn add_component(
        &self,
        source: NodeId,
        browse_name: QualifiedName,
        target: NodeId,
        type_definition: ExpandedNodeId,
    ) {
        self.add_reference(
            source,
            ReferenceDescription {
                reference_type: uanode_core::reference_types::HAS_COMPONENT,
                is_forward: true,
                target: target.into(),
                display_name: LocalizedText::text(browse_name.name.clone()),
                browse_name,
                node_class: NodeClass::Object,
                type_definition,
            },
        );
    }

    /// Fails every browse with `status`.
    pub fn fail_with(&self, status: StatusCode) {
        *self.fail_with.lock() = Some(status);
    }

    /// Returns every browse received.
    pub fn requests(&self) -> Vec<BrowseDescription> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl BrowseService for MockBrowseService {
    async fn browse(&self, description: &BrowseDescription) -> UaResult<Vec<ReferenceDescription>> {
        self.requests.lock().push(description.clone());

        if let Some(status) = *self.fail_with.lock() {
            return Err(UaError::browse_failed(description.node_id.to_string(), status));
        }

        Ok(self
            .references
            .read()
            .get(&description.node_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_echoes_accepted_writes() {
        let channel = MockAttributeChannel::new();
        let node = NodeId::numeric(1, 10);

        let status = channel
            .write_attribute(&node, AttributeId::Value, DataValue::value_only(7u32))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::GOOD);

        let value = channel.read_attribute(&node, AttributeId::Value).await.unwrap();
        assert_eq!(value.value, Variant::UInt32(7));
        assert_eq!(channel.read_count(), 1);
        assert_eq!(channel.write_count(), 1);
    }

    #[tokio::test]
    async fn test_channel_rejected_write_is_not_stored() {
        let channel = MockAttributeChannel::new();
        let node = NodeId::numeric(1, 10);
        channel.reject_writes_with(StatusCode::BAD_NOT_WRITABLE);

        let status = channel
            .write_attribute(&node, AttributeId::Value, DataValue::value_only(true))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::BAD_NOT_WRITABLE);
        assert!(channel.stored(&node, AttributeId::Value).is_none());
        assert_eq!(channel.write_history().len(), 1);
    }

    #[tokio::test]
    async fn test_resolver_lookup() {
        let resolver = MockResolver::new();
        let parent = NodeId::numeric(1, 1);
        resolver.add_property(parent.clone(), "Enabled", NodeId::numeric(1, 2));

        let found = resolver
            .resolve_member(
                &parent,
                &MemberRequest::property(uanode_core::UA_NAMESPACE_URI, "Enabled"),
            )
            .await
            .unwrap();
        assert_eq!(found.map(|m| m.node_id), Some(NodeId::numeric(1, 2)));
        assert_eq!(resolver.resolve_count(), 1);
    }
}
