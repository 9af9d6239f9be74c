// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The generic typed property accessor.
//!
//! One [`PropertyAccessor`] serves every declared property of every type.
//! Its operations split by whether they touch the network:
//!
//! | Operation                      | I/O  | Member must be          |
//! |--------------------------------|------|-------------------------|
//! | `get` / `set`                  | none | resolved already        |
//! | `read_async` / `write_async`   | yes  | resolved on demand      |
//! | `read` / `write`               | yes  | resolved on demand      |
//! | `get_node_async` / `get_node`  | yes  | resolved on demand      |

use std::sync::Arc;

use tracing::{debug, trace};
use uanode_core::{
    AttributeId, CoercionError, DataValue, StatusCode, UaError, UaErrorContext, UaResult, Variant,
};

use crate::node::{CachedMember, UaNode};
use crate::property::{PropertyValue, QualifiedProperty};

/// Typed access to one property of one node.
pub struct PropertyAccessor<'n, T> {
    node: &'n UaNode,
    property: QualifiedProperty<T>,
}

impl<'n, T: PropertyValue> PropertyAccessor<'n, T> {
    /// Creates an accessor for `property` on `node`.
    pub fn new(node: &'n UaNode, property: QualifiedProperty<T>) -> Self {
        Self { node, property }
    }

    /// Returns the property descriptor.
    pub fn property(&self) -> &QualifiedProperty<T> {
        &self.property
    }

    /// Returns the node that owns the property.
    pub fn owner(&self) -> &'n UaNode {
        self.node
    }

    // =========================================================================
    // Local Cache
    // =========================================================================

    /// Returns the cached value without any I/O.
    ///
    /// `Ok(None)` means the property node holds no value yet.
    ///
    /// # Errors
    ///
    /// - `NodeAbsent::NotResolved` if the property node was never resolved
    /// - `NodeAbsent::MemberNotFound` if it is known not to exist
    /// - `Coercion` if the cached value does not fit the declared type
    pub fn get(&self) -> UaResult<Option<T::Output>> {
        self.node.context().stats().record_local_get();
        let member = self.cached_member()?;
        let decoded = match member.value() {
            Some(value) => self.decode(&value.value),
            None => Ok(None),
        };
        decoded.with_property(&self.node.node_id().to_string(), self.property.browse_name())
    }

    /// Stores a value in the local cache without any I/O.
    ///
    /// Structured values are stored in their encoded form.
    pub fn set(&self, value: T) -> UaResult<()> {
        self.node.context().stats().record_local_set();
        let member = self.cached_member()?;
        let variant = value.to_variant(self.node.context().encoding())?;
        member.set_value(DataValue::value_only(variant));
        trace!(
            node_id = %member.node_id(),
            property = self.property.browse_name(),
            "Property value stored locally"
        );
        Ok(())
    }

    // =========================================================================
    // Async I/O
    // =========================================================================

    /// Reads the value from the server.
    ///
    /// A successful read also refreshes the cached value.
    pub async fn read_async(&self) -> UaResult<Option<T::Output>> {
        let stats = self.node.context().stats();
        stats.record_read();

        let result = self.read_inner().await;
        if let Err(error) = &result {
            stats.record_failure();
            error.log(&self.operation_context("read"));
        }
        result
    }

    async fn read_inner(&self) -> UaResult<Option<T::Output>> {
        let member = self.required_member().await?;
        let value = member.read_attribute(AttributeId::Value).await?;
        if value.status.is_bad() {
            return Err(UaError::read_failed(
                member.node_id().to_string(),
                AttributeId::Value.name(),
                value.status,
            ));
        }
        self.decode(&value.value)
    }

    /// Writes the value to the server and returns the reported status.
    ///
    /// # Errors
    ///
    /// A Bad status is returned as a `Service` error carrying that status.
    pub async fn write_async(&self, value: T) -> UaResult<StatusCode> {
        let stats = self.node.context().stats();
        stats.record_write();

        let result = self.write_inner(value).await;
        if let Err(error) = &result {
            stats.record_failure();
            error.log(&self.operation_context("write"));
        }
        result
    }

    async fn write_inner(&self, value: T) -> UaResult<StatusCode> {
        let member = self.required_member().await?;
        let variant = value.to_variant(self.node.context().encoding())?;
        let status = member
            .write_attribute(AttributeId::Value, DataValue::value_only(variant))
            .await?;
        if status.is_bad() {
            return Err(UaError::write_failed(
                member.node_id().to_string(),
                AttributeId::Value.name(),
                status,
            ));
        }
        debug!(
            node_id = %member.node_id(),
            property = self.property.browse_name(),
            status = %status,
            "Property written"
        );
        Ok(status)
    }

    /// Returns the property node, resolving it on first use.
    ///
    /// `Ok(None)` means the node has no such property.
    pub async fn get_node_async(&self) -> UaResult<Option<Arc<UaNode>>> {
        self.node
            .get_member_node_async(&self.property.member_request())
            .await
    }

    // =========================================================================
    // Blocking I/O
    // =========================================================================

    /// Blocking form of [`read_async`](Self::read_async).
    pub fn read(&self) -> UaResult<Option<T::Output>> {
        self.node.context().wait("read", self.read_async())
    }

    /// Blocking form of [`write_async`](Self::write_async).
    pub fn write(&self, value: T) -> UaResult<StatusCode> {
        self.node.context().wait("write", self.write_async(value))
    }

    /// Blocking form of [`get_node_async`](Self::get_node_async).
    pub fn get_node(&self) -> UaResult<Option<Arc<UaNode>>> {
        self.node.context().wait("get_node", self.get_node_async())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn operation_context(&self, operation: &str) -> String {
        format!(
            "{} {} on {}",
            operation,
            self.property.browse_name(),
            self.node.node_id()
        )
    }

    fn cached_member(&self) -> UaResult<Arc<UaNode>> {
        let request = self.property.member_request();
        match self.node.cached_member(&request) {
            CachedMember::Present(member) => Ok(member),
            CachedMember::Absent => Err(UaError::member_not_found(
                self.node.node_id().to_string(),
                self.property.browse_name(),
            )),
            CachedMember::Unresolved => Err(UaError::not_resolved(
                self.node.node_id().to_string(),
                self.property.browse_name(),
            )),
        }
    }

    async fn required_member(&self) -> UaResult<Arc<UaNode>> {
        self.get_node_async().await?.ok_or_else(|| {
            UaError::member_not_found(self.node.node_id().to_string(), self.property.browse_name())
        })
    }

    fn decode(&self, value: &Variant) -> UaResult<Option<T::Output>> {
        if value.is_empty() {
            return Ok(None);
        }
        let rank = self.property.value_rank();
        if !rank.accepts(value) {
            return Err(CoercionError::value_rank_mismatch(rank.0, value.type_name()).into());
        }
        T::from_variant(value, self.node.context().encoding()).map(Some)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::AttributeChannel;
    use crate::context::ClientContext;
    use crate::resolver::{MemberRequest, NodeResolver, ResolvedNode};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use uanode_core::{
        Argument, Decoded, LocalizedText, MessageSecurityMode, NodeClass, NodeId, QualifiedName,
        UA_NAMESPACE_URI,
    };

    const ENABLED: QualifiedProperty<bool> =
        QualifiedProperty::new(UA_NAMESPACE_URI, "Enabled", "ns=0;i=1", -1);
    const MODE: QualifiedProperty<MessageSecurityMode> =
        QualifiedProperty::new(UA_NAMESPACE_URI, "SecurityMode", "ns=0;i=302", -1);
    const ARGS: QualifiedProperty<Vec<Argument>> =
        QualifiedProperty::new(UA_NAMESPACE_URI, "InputArguments", "ns=0;i=296", 1);
    const MISSING: QualifiedProperty<bool> =
        QualifiedProperty::new(UA_NAMESPACE_URI, "Missing", "ns=0;i=1", -1);

    #[derive(Default)]
    struct EchoChannel {
        values: Mutex<HashMap<NodeId, DataValue>>,
        reject: Mutex<Option<StatusCode>>,
    }

    #[async_trait]
    impl AttributeChannel for EchoChannel {
        async fn read_attribute(&self, node_id: &NodeId, _: AttributeId) -> UaResult<DataValue> {
            Ok(self.values.lock().get(node_id).cloned().unwrap_or_default())
        }

        async fn write_attribute(
            &self,
            node_id: &NodeId,
            _: AttributeId,
            value: DataValue,
        ) -> UaResult<StatusCode> {
            if let Some(status) = *self.reject.lock() {
                return Ok(status);
            }
            self.values.lock().insert(node_id.clone(), value);
            Ok(StatusCode::GOOD)
        }
    }

    struct NameResolver;

    #[async_trait]
    impl NodeResolver for NameResolver {
        async fn resolve_member(
            &self,
            _: &NodeId,
            request: &MemberRequest,
        ) -> UaResult<Option<ResolvedNode>> {
            if request.browse_name == "Missing" {
                return Ok(None);
            }
            Ok(Some(ResolvedNode {
                node_id: NodeId::string(1, request.browse_name.clone()),
                node_class: NodeClass::Variable,
                browse_name: QualifiedName::new(0, request.browse_name.clone()),
                type_definition: None,
            }))
        }
    }

    fn setup() -> (Arc<EchoChannel>, Arc<UaNode>) {
        let channel = Arc::new(EchoChannel::default());
        let context = ClientContext::builder()
            .channel(Arc::clone(&channel))
            .resolver(NameResolver)
            .build()
            .unwrap();
        let node = context.node(NodeId::numeric(1, 1), NodeClass::Object, QualifiedName::new(1, "Obj"));
        (channel, node)
    }

    #[tokio::test]
    async fn test_get_before_resolution_is_not_resolved() {
        let (_, node) = setup();
        let err = PropertyAccessor::new(&node, ENABLED).get().unwrap_err();
        assert!(err.is_node_absent());
        assert!(err.to_string().contains("Enabled"));
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let (_, node) = setup();
        let enabled = PropertyAccessor::new(&node, ENABLED);
        enabled.get_node_async().await.unwrap().unwrap();

        assert_eq!(enabled.get().unwrap(), None);
        enabled.set(true).unwrap();
        assert_eq!(enabled.get().unwrap(), Some(true));
    }

    #[tokio::test]
    async fn test_write_then_read_and_get() {
        let (_, node) = setup();
        let enabled = PropertyAccessor::new(&node, ENABLED);

        assert!(enabled.write_async(true).await.unwrap().is_good());
        assert_eq!(enabled.get().unwrap(), Some(true));
        assert_eq!(enabled.read_async().await.unwrap(), Some(true));
    }

    #[tokio::test]
    async fn test_rejected_write_is_service_error() {
        let (channel, node) = setup();
        *channel.reject.lock() = Some(StatusCode::BAD_NOT_WRITABLE);

        let err = PropertyAccessor::new(&node, ENABLED)
            .write_async(true)
            .await
            .unwrap_err();
        assert!(err.is_service());
        assert_eq!(err.status_code(), StatusCode::BAD_NOT_WRITABLE);
        assert_eq!(node.context().stats().snapshot().failures, 1);
    }

    #[tokio::test]
    async fn test_missing_member() {
        let (_, node) = setup();
        let missing = PropertyAccessor::new(&node, MISSING);

        assert!(missing.get_node_async().await.unwrap().is_none());
        let err = missing.read_async().await.unwrap_err();
        assert!(matches!(
            err,
            UaError::NodeAbsent(uanode_core::NodeAbsentError::MemberNotFound { .. })
        ));
        assert!(matches!(
            missing.get().unwrap_err(),
            UaError::NodeAbsent(uanode_core::NodeAbsentError::MemberNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_enum_value() {
        let (channel, node) = setup();
        channel
            .values
            .lock()
            .insert(NodeId::string(1, "SecurityMode"), DataValue::value_only(Variant::Int32(77)));

        let decoded = PropertyAccessor::new(&node, MODE).read_async().await.unwrap();
        assert_eq!(decoded, Some(Decoded::Unknown(Variant::Int32(77))));
    }

    #[tokio::test]
    async fn test_structure_array_is_cached_encoded() {
        let (_, node) = setup();
        let args = PropertyAccessor::new(&node, ARGS);
        let member = args.get_node_async().await.unwrap().unwrap();

        let value = vec![Argument::scalar("Speed", NodeId::numeric(0, 11), LocalizedText::text("rpm"))];
        args.set(value.clone()).unwrap();

        let cached = member.value().unwrap().value;
        let items = cached.as_array().unwrap();
        assert!(matches!(items[0], Variant::ExtensionObject(_)));
        assert_eq!(args.get().unwrap(), Some(value));
    }

    #[tokio::test]
    async fn test_rank_mismatch_on_get() {
        let (_, node) = setup();
        let enabled = PropertyAccessor::new(&node, ENABLED);
        let member = enabled.get_node_async().await.unwrap().unwrap();
        member.set_value(DataValue::value_only(Variant::Array(vec![Variant::Boolean(true)])));

        let err = enabled.get().unwrap_err();
        assert!(err.is_coercion());
    }
}
