// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Node proxies.
//!
//! A [`UaNode`] is the client-side stand-in for one node of the server's
//! address space. It holds:
//!
//! - the Value last observed by a read or write (or stored with `set`)
//! - cached base-node attributes such as the display name
//! - a member cache mapping browse names to resolved child proxies
//!
//! The member cache is the single place where children are created. Each
//! entry is a [`OnceCell`], so concurrent first-time lookups of the same
//! member share one resolution request.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use tokio::sync::OnceCell;
use tracing::{debug, trace};
use uanode_core::{
    AttributeId, DataValue, LocalizedText, NodeClass, NodeId, QualifiedName, StatusCode,
    UaErrorContext, UaError, UaResult,
};

use crate::context::ClientContext;
use crate::property::PropertyValue;
use crate::resolver::{MemberKey, MemberRequest, ResolvedNode};

type MemberSlot = Arc<OnceCell<Option<Arc<UaNode>>>>;

// =============================================================================
// CachedMember
// =============================================================================

/// Member cache state for one browse name.
#[derive(Debug, Clone)]
pub enum CachedMember {
    /// No lookup has completed yet.
    Unresolved,
    /// A lookup completed and the member does not exist.
    Absent,
    /// The member was resolved.
    Present(Arc<UaNode>),
}

// =============================================================================
// UaNode
// =============================================================================

/// Client-side proxy for a server node.
pub struct UaNode {
    context: Arc<ClientContext>,
    node_id: NodeId,
    node_class: NodeClass,
    browse_name: QualifiedName,
    type_definition: Option<NodeId>,
    value: RwLock<Option<DataValue>>,
    attributes: DashMap<AttributeId, DataValue>,
    members: DashMap<MemberKey, MemberSlot>,
}

impl UaNode {
    /// Creates a proxy.
    pub fn new(
        context: Arc<ClientContext>,
        node_id: NodeId,
        node_class: NodeClass,
        browse_name: QualifiedName,
        type_definition: Option<NodeId>,
    ) -> Self {
        Self {
            context,
            node_id,
            node_class,
            browse_name,
            type_definition,
            value: RwLock::new(None),
            attributes: DashMap::new(),
            members: DashMap::new(),
        }
    }

    fn from_resolved(context: Arc<ClientContext>, resolved: ResolvedNode) -> Self {
        Self::new(
            context,
            resolved.node_id,
            resolved.node_class,
            resolved.browse_name,
            resolved.type_definition,
        )
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Returns the client context.
    pub fn context(&self) -> &Arc<ClientContext> {
        &self.context
    }

    /// Returns the node id.
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Returns the node class.
    pub fn node_class(&self) -> NodeClass {
        self.node_class
    }

    /// Returns the browse name.
    pub fn browse_name(&self) -> &QualifiedName {
        &self.browse_name
    }

    /// Returns the type definition reported when the node was resolved.
    pub fn type_definition(&self) -> Option<&NodeId> {
        self.type_definition.as_ref()
    }

    // =========================================================================
    // Local Value Cache
    // =========================================================================

    /// Returns the last observed Value. Never performs I/O.
    pub fn value(&self) -> Option<DataValue> {
        self.value.read().clone()
    }

    /// Replaces the cached Value. Never performs I/O.
    pub fn set_value(&self, value: DataValue) {
        *self.value.write() = Some(value);
    }

    // =========================================================================
    // Attribute I/O
    // =========================================================================

    /// Reads an attribute.
    ///
    /// Base-node attributes come from the attribute cache when it holds
    /// them. A Value whose status is not Bad replaces the cached Value. A
    /// Bad status is returned inside the [`DataValue`].
    pub async fn read_attribute(&self, attribute: AttributeId) -> UaResult<DataValue> {
        let cache_base = self.context.settings().cache_base_attributes;
        let cacheable = cache_base && attribute.is_base_node_attribute();

        if cacheable {
            if let Some(cached) = self.attributes.get(&attribute) {
                trace!(node_id = %self.node_id, attribute = %attribute, "Attribute served from cache");
                return Ok(cached.value().clone());
            }
        }

        let value = self
            .context
            .channel()
            .read_attribute(&self.node_id, attribute)
            .await
            .with_node(&self.node_id.to_string())?;

        if attribute == AttributeId::Value {
            if !value.status.is_bad() {
                self.set_value(value.clone());
            }
        } else if cacheable && value.is_good() {
            self.attributes.insert(attribute, value.clone());
        }

        Ok(value)
    }

    /// Writes an attribute and returns the status the server reported.
    ///
    /// On a Good status a Value write becomes the last observed Value and
    /// any other attribute is dropped from the attribute cache.
    pub async fn write_attribute(
        &self,
        attribute: AttributeId,
        value: DataValue,
    ) -> UaResult<StatusCode> {
        let status = self
            .context
            .channel()
            .write_attribute(&self.node_id, attribute, value.clone())
            .await
            .with_node(&self.node_id.to_string())?;

        if status.is_good() {
            if attribute == AttributeId::Value {
                self.set_value(value);
            } else {
                self.attributes.remove(&attribute);
            }
        }

        Ok(status)
    }

    async fn read_base<T: PropertyValue>(&self, attribute: AttributeId) -> UaResult<Option<T::Output>> {
        let value = self.read_attribute(attribute).await?;
        if value.status.is_bad() {
            return Err(UaError::read_failed(
                self.node_id.to_string(),
                attribute.name(),
                value.status,
            ));
        }
        if value.value.is_empty() {
            return Ok(None);
        }
        T::from_variant(&value.value, self.context.encoding()).map(Some)
    }

    async fn write_base<T: PropertyValue>(&self, attribute: AttributeId, value: T) -> UaResult<StatusCode> {
        let variant = value.to_variant(self.context.encoding())?;
        self.write_attribute(attribute, DataValue::value_only(variant)).await
    }

    /// Reads the NodeClass attribute.
    pub async fn read_node_class(&self) -> UaResult<Option<NodeClass>> {
        let Some(raw) = self.read_base::<i32>(AttributeId::NodeClass).await? else {
            return Ok(None);
        };
        u32::try_from(raw)
            .ok()
            .and_then(NodeClass::from_value)
            .map(Some)
            .ok_or_else(|| UaError::type_mismatch("NodeClass", format!("Int32({})", raw)))
    }

    /// Reads the BrowseName attribute.
    pub async fn read_browse_name(&self) -> UaResult<Option<QualifiedName>> {
        self.read_base::<QualifiedName>(AttributeId::BrowseName).await
    }

    /// Reads the DisplayName attribute.
    pub async fn read_display_name(&self) -> UaResult<Option<LocalizedText>> {
        self.read_base::<LocalizedText>(AttributeId::DisplayName).await
    }

    /// Reads the Description attribute.
    pub async fn read_description(&self) -> UaResult<Option<LocalizedText>> {
        self.read_base::<LocalizedText>(AttributeId::Description).await
    }

    /// Reads the WriteMask attribute.
    pub async fn read_write_mask(&self) -> UaResult<Option<u32>> {
        self.read_base::<u32>(AttributeId::WriteMask).await
    }

    /// Reads the UserWriteMask attribute.
    pub async fn read_user_write_mask(&self) -> UaResult<Option<u32>> {
        self.read_base::<u32>(AttributeId::UserWriteMask).await
    }

    /// Writes the BrowseName attribute.
    pub async fn write_browse_name(&self, browse_name: QualifiedName) -> UaResult<StatusCode> {
        self.write_base(AttributeId::BrowseName, browse_name).await
    }

    /// Writes the DisplayName attribute.
    pub async fn write_display_name(&self, display_name: LocalizedText) -> UaResult<StatusCode> {
        self.write_base(AttributeId::DisplayName, display_name).await
    }

    /// Writes the Description attribute.
    pub async fn write_description(&self, description: LocalizedText) -> UaResult<StatusCode> {
        self.write_base(AttributeId::Description, description).await
    }

    /// Writes the WriteMask attribute.
    pub async fn write_write_mask(&self, write_mask: u32) -> UaResult<StatusCode> {
        self.write_base(AttributeId::WriteMask, write_mask).await
    }

    /// Writes the UserWriteMask attribute.
    pub async fn write_user_write_mask(&self, user_write_mask: u32) -> UaResult<StatusCode> {
        self.write_base(AttributeId::UserWriteMask, user_write_mask).await
    }

    // =========================================================================
    // Member Resolution
    // =========================================================================

    /// Returns the member cache state for a request. Never performs I/O.
    pub fn cached_member(&self, request: &MemberRequest) -> CachedMember {
        match self.members.get(&request.key()).as_deref().and_then(|slot| slot.get()) {
            None => CachedMember::Unresolved,
            Some(None) => CachedMember::Absent,
            Some(Some(node)) => CachedMember::Present(Arc::clone(node)),
        }
    }

    /// Returns the member proxy, resolving it on first use.
    ///
    /// Returns `Ok(None)` when the member does not exist. Resolution
    /// failures are not cached; the next call retries.
    pub async fn get_member_node_async(
        &self,
        request: &MemberRequest,
    ) -> UaResult<Option<Arc<UaNode>>> {
        let key = request.key();
        // Clone the slot out so the shard lock is released before awaiting.
        let slot = Arc::clone(self.members.entry(key.clone()).or_default().value());

        if let Some(member) = slot.get() {
            self.context.stats().record_member_cache_hit();
            return Ok(member.clone());
        }

        let member = slot.get_or_try_init(|| self.resolve(request)).await?.clone();

        if member.is_none() && !self.context.settings().memoize_absent_members {
            self.members.remove_if(&key, |_, current| Arc::ptr_eq(current, &slot));
        }

        Ok(member)
    }

    /// Blocking form of [`get_member_node_async`](Self::get_member_node_async).
    pub fn get_member_node(&self, request: &MemberRequest) -> UaResult<Option<Arc<UaNode>>> {
        self.context.wait("get_member_node", self.get_member_node_async(request))
    }

    async fn resolve(&self, request: &MemberRequest) -> UaResult<Option<Arc<UaNode>>> {
        self.context.stats().record_resolution();
        debug!(
            parent = %self.node_id,
            namespace_uri = %request.namespace_uri,
            browse_name = %request.browse_name,
            "Resolving member"
        );

        let resolved = self
            .context
            .resolver()
            .resolve_member(&self.node_id, request)
            .await
            .with_property(&self.node_id.to_string(), &request.browse_name)?;

        match resolved {
            Some(resolved) => Ok(Some(Arc::new(UaNode::from_resolved(
                Arc::clone(&self.context),
                resolved,
            )))),
            None => {
                self.context.stats().record_absent_member();
                Ok(None)
            }
        }
    }

    /// Number of entries in the member cache.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

impl fmt::Debug for UaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UaNode")
            .field("node_id", &self.node_id)
            .field("node_class", &self.node_class)
            .field("browse_name", &self.browse_name)
            .field("type_definition", &self.type_definition)
            .field("members", &self.members.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
