// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Fake node trees wired to the mocks, plus sample values.

use std::sync::Arc;

use uanode_client::model::{
    ApplicationConfigurationType, MethodNode, PubSubConnectionType, PubSubGroupType, TypeInfo,
};
use uanode_client::{ClientContext, UaNode};
use uanode_config::AccessorSettings;
use uanode_core::{
    Argument, EncodingContext, EncodingLimits, KeyValuePair, LocalizedText, NamespaceTable,
    NodeClass, NodeId, QualifiedName, Variant,
};

use super::mocks::{MockAttributeChannel, MockResolver};

/// Namespace URI used for instance nodes in fixtures.
pub const TEST_NAMESPACE_URI: &str = "urn:sylvex:uanode:test";

/// Namespace index of [`TEST_NAMESPACE_URI`].
pub const TEST_NAMESPACE_INDEX: u16 = 1;

// =============================================================================
// FakeNodeTree
// =============================================================================

/// A client context over a mock channel and resolver.
pub struct FakeNodeTree {
    /// The attribute channel.
    pub channel: Arc<MockAttributeChannel>,
    /// The resolver.
    pub resolver: Arc<MockResolver>,
    /// The client context.
    pub context: Arc<ClientContext>,
}

impl FakeNodeTree {
    /// Creates a tree with default accessor settings.
    pub fn new() -> Self {
        Self::with_settings(AccessorSettings::default())
    }

    /// Creates a tree with the given accessor settings.
    pub fn with_settings(settings: AccessorSettings) -> Self {
        Self::build(settings, EncodingLimits::default())
    }

    /// Creates a tree with the given encoding limits.
    pub fn with_limits(limits: EncodingLimits) -> Self {
        Self::build(AccessorSettings::default(), limits)
    }

    fn build(settings: AccessorSettings, limits: EncodingLimits) -> Self {
        let channel = Arc::new(MockAttributeChannel::new());
        let resolver = Arc::new(MockResolver::new());

        let mut namespaces = NamespaceTable::new();
        namespaces.register(TEST_NAMESPACE_URI);

        let context = ClientContext::builder()
            .channel(Arc::clone(&channel))
            .resolver(Arc::clone(&resolver))
            .encoding(EncodingContext::new(namespaces, limits))
            .settings(settings)
            .build()
            .expect("fixture context must build");

        Self {
            channel,
            resolver,
            context,
        }
    }

    /// Creates an object proxy in the test namespace.
    pub fn object(&self, id: u32, name: &str) -> Arc<UaNode> {
        self.context.node(
            NodeId::numeric(TEST_NAMESPACE_INDEX, id),
            NodeClass::Object,
            QualifiedName::new(TEST_NAMESPACE_INDEX, name),
        )
    }

    /// Registers a standard-namespace property under `parent` and returns
    /// the property node id.
    pub fn add_property(&self, parent: &NodeId, browse_name: &str) -> NodeId {
        let node_id = property_node_id(parent, browse_name);
        self.resolver
            .add_property(parent.clone(), browse_name, node_id.clone());
        node_id
    }

    /// Registers every property of a type, inherited ones included.
    pub fn add_all_properties(&self, parent: &NodeId, info: &'static TypeInfo) {
        for descriptor in info.all_properties() {
            self.add_property(parent, descriptor.browse_name);
        }
    }

    /// Resolves a member and returns its proxy, panicking if absent.
    pub async fn resolve(&self, parent: &UaNode, browse_name: &str) -> Arc<UaNode> {
        let request =
            uanode_client::MemberRequest::property(uanode_core::UA_NAMESPACE_URI, browse_name);
        parent
            .get_member_node_async(&request)
            .await
            .expect("resolution must succeed")
            .unwrap_or_else(|| panic!("member '{}' must exist", browse_name))
    }

    // =========================================================================
    // Typed Objects
    // =========================================================================

    /// An application configuration object exposing only `Enabled`.
    pub fn application_configuration(&self) -> ApplicationConfigurationType {
        let node = self.object(1000, "AppConfig");
        self.add_property(node.node_id(), "Enabled");
        ApplicationConfigurationType::new(node)
    }

    /// An application configuration object exposing every property.
    pub fn full_application_configuration(&self) -> ApplicationConfigurationType {
        let node = self.object(1001, "FullAppConfig");
        self.add_all_properties(node.node_id(), ApplicationConfigurationType::type_info());
        ApplicationConfigurationType::new(node)
    }

    /// A method node exposing both argument lists.
    pub fn method(&self) -> MethodNode {
        let node = self.context.node(
            NodeId::numeric(TEST_NAMESPACE_INDEX, 2000),
            NodeClass::Method,
            QualifiedName::new(TEST_NAMESPACE_INDEX, "Reset"),
        );
        self.add_all_properties(node.node_id(), MethodNode::type_info());
        MethodNode::new(node)
    }

    /// A PubSub connection exposing every property.
    pub fn pubsub_connection(&self) -> PubSubConnectionType {
        let node = self.object(3000, "Connection1");
        self.add_all_properties(node.node_id(), PubSubConnectionType::type_info());
        PubSubConnectionType::new(node)
    }

    /// A PubSub group exposing every property.
    pub fn pubsub_group(&self) -> PubSubGroupType {
        let node = self.object(3100, "WriterGroup1");
        self.add_all_properties(node.node_id(), PubSubGroupType::type_info());
        PubSubGroupType::new(node)
    }
}

impl Default for FakeNodeTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Node id used for the property `browse_name` of `parent`.
pub fn property_node_id(parent: &NodeId, browse_name: &str) -> NodeId {
    NodeId::string(TEST_NAMESPACE_INDEX, format!("{}/{}", parent, browse_name))
}

// =============================================================================
// Sample Values
// =============================================================================

/// Input arguments of a typical method.
pub fn sample_arguments() -> Vec<Argument> {
    vec![
        Argument::scalar(
            "Mode",
            NodeId::numeric(0, 6),
            LocalizedText::new("en", "Operating mode"),
        ),
        Argument::array(
            "Setpoints",
            NodeId::numeric(0, 11),
            LocalizedText::new("en", "Setpoints in engineering units"),
        ),
    ]
}

/// Vendor specific key/value properties.
pub fn sample_key_value_pairs() -> Vec<KeyValuePair> {
    vec![
        KeyValuePair::new(QualifiedName::new(0, "Transport"), "udp"),
        KeyValuePair::new(QualifiedName::new(TEST_NAMESPACE_INDEX, "Priority"), Variant::Int32(5)),
        KeyValuePair::new(QualifiedName::new(0, "Secure"), true),
    ]
}
