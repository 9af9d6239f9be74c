// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Member node resolution.
//!
//! A member is a child of a node identified by its browse name, the
//! namespace URI qualifying that name and, for components, the type
//! definition of the child.
//!
//! ```text
//!  parent ──HasProperty──────────────▶ property   (MemberRequest::property)
//!  parent ──HierarchicalReferences──▶ component  (MemberRequest::component)
//! ```
//!
//! [`NodeResolver`] is the seam consumed by node proxies.
//! [`BrowseResolver`] implements it on top of any [`BrowseService`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace};
use uanode_core::{
    reference_types, type_definitions, ExpandedNodeId, LocalizedText, NamespaceTable, NodeClass,
    NodeId, QualifiedName, UaResult,
};

// =============================================================================
// MemberRequest
// =============================================================================

/// Identifies a member of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberRequest {
    /// Namespace URI of the member's browse name.
    pub namespace_uri: String,

    /// Browse name of the member.
    pub browse_name: String,

    /// Expected type definition; null when any type is acceptable.
    pub type_definition: ExpandedNodeId,

    /// `true` when the member is reached over HasProperty.
    pub is_property: bool,
}

impl MemberRequest {
    /// Creates a request for a property (a `PropertyType` variable).
    pub fn property(namespace_uri: impl Into<String>, browse_name: impl Into<String>) -> Self {
        Self {
            namespace_uri: namespace_uri.into(),
            browse_name: browse_name.into(),
            type_definition: type_definitions::PROPERTY_TYPE.into(),
            is_property: true,
        }
    }

    /// Creates a request for a component.
    pub fn component(
        namespace_uri: impl Into<String>,
        browse_name: impl Into<String>,
        type_definition: ExpandedNodeId,
    ) -> Self {
        Self {
            namespace_uri: namespace_uri.into(),
            browse_name: browse_name.into(),
            type_definition,
            is_property: false,
        }
    }

    /// Returns the member cache key for this request.
    pub fn key(&self) -> MemberKey {
        MemberKey {
            namespace_uri: self.namespace_uri.clone(),
            browse_name: self.browse_name.clone(),
        }
    }
}

/// Member cache key: the browse name qualified by its namespace URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberKey {
    /// Namespace URI.
    pub namespace_uri: String,
    /// Browse name.
    pub browse_name: String,
}

// =============================================================================
// ResolvedNode
// =============================================================================

/// A member located by a resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNode {
    /// Node id of the member.
    pub node_id: NodeId,
    /// Node class of the member.
    pub node_class: NodeClass,
    /// Browse name of the member.
    pub browse_name: QualifiedName,
    /// Type definition, when the server reported one.
    pub type_definition: Option<NodeId>,
}

// =============================================================================
// NodeResolver
// =============================================================================

/// Resolves members of a node.
#[async_trait]
pub trait NodeResolver: Send + Sync {
    /// Locates a member of `parent`.
    ///
    /// Returns `Ok(None)` when the parent has no such member.
    async fn resolve_member(
        &self,
        parent: &NodeId,
        request: &MemberRequest,
    ) -> UaResult<Option<ResolvedNode>>;
}

#[async_trait]
impl<R: NodeResolver + ?Sized> NodeResolver for Arc<R> {
    async fn resolve_member(
        &self,
        parent: &NodeId,
        request: &MemberRequest,
    ) -> UaResult<Option<ResolvedNode>> {
        (**self).resolve_member(parent, request).await
    }
}

// =============================================================================
// BrowseService
// =============================================================================

/// A single-node browse request.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseDescription {
    /// Node to browse from.
    pub node_id: NodeId,
    /// Reference type to follow, forward only.
    pub reference_type: NodeId,
    /// Follow subtypes of the reference type.
    pub include_subtypes: bool,
    /// Node class mask (0 = all classes).
    pub node_class_mask: u32,
}

/// One reference returned by a browse.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDescription {
    /// Reference type.
    pub reference_type: NodeId,
    /// Direction of the reference.
    pub is_forward: bool,
    /// Target node.
    pub target: ExpandedNodeId,
    /// Browse name of the target.
    pub browse_name: QualifiedName,
    /// Display name of the target.
    pub display_name: LocalizedText,
    /// Node class of the target.
    pub node_class: NodeClass,
    /// Type definition of the target (null if none).
    pub type_definition: ExpandedNodeId,
}

/// The browse service of a session.
#[async_trait]
pub trait BrowseService: Send + Sync {
    /// Browses the references of one node.
    async fn browse(&self, description: &BrowseDescription) -> UaResult<Vec<ReferenceDescription>>;
}

#[async_trait]
impl<B: BrowseService + ?Sized> BrowseService for Arc<B> {
    async fn browse(&self, description: &BrowseDescription) -> UaResult<Vec<ReferenceDescription>> {
        (**self).browse(description).await
    }
}

// =============================================================================
// BrowseStatistics
// =============================================================================

/// Statistics for browse-based resolution.
#[derive(Debug, Default)]
pub struct BrowseStatistics {
    /// Browse requests issued.
    pub browse_count: AtomicU64,

    /// References returned by the server.
    pub references_seen: AtomicU64,

    /// Members located.
    pub resolved: AtomicU64,

    /// Lookups that found no matching member.
    pub not_found: AtomicU64,

    /// Browse errors.
    pub errors: AtomicU64,
}

impl BrowseStatistics {
    /// Creates new statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a browse request.
    pub fn record_browse(&self, reference_count: usize) {
        self.browse_count.fetch_add(1, Ordering::Relaxed);
        self.references_seen
            .fetch_add(reference_count as u64, Ordering::Relaxed);
    }

    /// Records a located member.
    pub fn record_resolved(&self) {
        self.resolved.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a lookup without a match.
    pub fn record_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an error.
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Resets all statistics.
    pub fn reset(&self) {
        self.browse_count.store(0, Ordering::Relaxed);
        self.references_seen.store(0, Ordering::Relaxed);
        self.resolved.store(0, Ordering::Relaxed);
        self.not_found.store(0, Ordering::Relaxed);
        self.errors.store(0, Ordering::Relaxed);
    }
}

// =============================================================================
// BrowseResolver
// =============================================================================

/// Resolves members by browsing the parent node.
pub struct BrowseResolver<B> {
    browse: B,
    namespaces: NamespaceTable,
    stats: Arc<BrowseStatistics>,
}

impl<B: BrowseService> BrowseResolver<B> {
    /// Creates a resolver over a browse service and the server's namespace
    /// table.
    pub fn new(browse: B, namespaces: NamespaceTable) -> Self {
        Self {
            browse,
            namespaces,
            stats: Arc::new(BrowseStatistics::new()),
        }
    }

    /// Returns the statistics.
    pub fn stats(&self) -> Arc<BrowseStatistics> {
        Arc::clone(&self.stats)
    }

    fn describe(parent: &NodeId, request: &MemberRequest) -> BrowseDescription {
        if request.is_property {
            BrowseDescription {
                node_id: parent.clone(),
                reference_type: reference_types::HAS_PROPERTY,
                include_subtypes: false,
                node_class_mask: NodeClass::Variable.value(),
            }
        } else {
            BrowseDescription {
                node_id: parent.clone(),
                reference_type: reference_types::HIERARCHICAL_REFERENCES,
                include_subtypes: true,
                node_class_mask: 0,
            }
        }
    }

    fn local_type(&self, id: &ExpandedNodeId) -> Option<NodeId> {
        if id.is_null() {
            return None;
        }
        id.to_node_id(&self.namespaces).ok()
    }

    fn matches(
        &self,
        reference: &ReferenceDescription,
        namespace_index: u16,
        request: &MemberRequest,
        expected_type: Option<&NodeId>,
    ) -> Option<ResolvedNode> {
        if !reference.is_forward
            || !reference.target.is_local()
            || reference.browse_name.namespace_index != namespace_index
            || reference.browse_name.name != request.browse_name
        {
            return None;
        }

        let type_definition = self.local_type(&reference.type_definition);
        if let (Some(expected), Some(actual)) = (expected_type, type_definition.as_ref()) {
            if expected != actual {
                trace!(
                    browse_name = %request.browse_name,
                    expected = %expected,
                    actual = %actual,
                    "Skipping member with different type definition"
                );
                return None;
            }
        }

        let node_id = reference.target.to_node_id(&self.namespaces).ok()?;
        Some(ResolvedNode {
            node_id,
            node_class: reference.node_class,
            browse_name: reference.browse_name.clone(),
            type_definition,
        })
    }
}

#[async_trait]
impl<B: BrowseService> NodeResolver for BrowseResolver<B> {
    async fn resolve_member(
        &self,
        parent: &NodeId,
        request: &MemberRequest,
    ) -> UaResult<Option<ResolvedNode>> {
        let Some(namespace_index) = self.namespaces.index_of(&request.namespace_uri) else {
            debug!(
                parent = %parent,
                namespace_uri = %request.namespace_uri,
                "Namespace not in server table; member cannot exist"
            );
            self.stats.record_not_found();
            return Ok(None);
        };

        let description = Self::describe(parent, request);
        let references = match self.browse.browse(&description).await {
            Ok(references) => references,
            Err(e) => {
                self.stats.record_error();
                return Err(e);
            }
        };
        self.stats.record_browse(references.len());

        let expected_type = self.local_type(&request.type_definition);
        let found = references
            .iter()
            .find_map(|r| self.matches(r, namespace_index, request, expected_type.as_ref()));

        match &found {
            Some(node) => {
                self.stats.record_resolved();
                trace!(parent = %parent, browse_name = %request.browse_name, node_id = %node.node_id, "Member resolved");
            }
            None => {
                self.stats.record_not_found();
                debug!(parent = %parent, browse_name = %request.browse_name, "Member not found");
            }
        }

        Ok(found)
    }
}

// =============================================================================
// Tests
// =============================================================================
