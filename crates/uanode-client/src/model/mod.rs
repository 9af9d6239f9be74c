// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Information model types.
//!
//! Every type here is a row table expanded by one macro; no property has
//! hand-written accessor code. The tables also feed a registry that can be
//! queried at runtime.
//!
//! ```rust,ignore
//! let config = ApplicationConfigurationType::new(node);
//! config.enabled().write(true)?;
//! assert_eq!(config.enabled().get()?, Some(true));
//! ```

#[macro_use]
mod macros;

pub mod configuration;
pub mod events;
pub mod method;
pub mod pubsub;
pub mod security;

pub use configuration::ApplicationConfigurationType;
pub use events::{AuditEventType, BaseEventType};
pub use method::MethodNode;
pub use pubsub::{PubSubConnectionType, PubSubGroupType};
pub use security::{KeyCredentialConfigurationType, SecurityGroupType};

use uanode_core::NodeId;

use crate::property::PropertyDescriptor;

// =============================================================================
// TypeInfo
// =============================================================================

/// Table entry describing one type.
#[derive(Debug)]
pub struct TypeInfo {
    /// Browse name of the type.
    pub browse_name: &'static str,
    /// Node id of the type definition, if it has one.
    pub type_definition: Option<NodeId>,
    /// Supertype entry.
    pub parent: Option<fn() -> &'static TypeInfo>,
    /// Properties declared directly on this type.
    pub properties: &'static [PropertyDescriptor],
}

impl TypeInfo {
    /// Returns the supertype entry.
    pub fn parent(&self) -> Option<&'static TypeInfo> {
        self.parent.map(|parent| parent())
    }

    /// Returns all properties, inherited ones first.
    pub fn all_properties(&self) -> Vec<&'static PropertyDescriptor> {
        let mut chain = Vec::new();
        let mut current = self.parent();
        while let Some(info) = current {
            chain.push(info);
            current = info.parent();
        }

        let mut properties: Vec<&'static PropertyDescriptor> = chain
            .iter()
            .rev()
            .flat_map(|info| info.properties.iter())
            .collect();
        properties.extend(self.properties.iter());
        properties
    }

    /// Finds a property by browse name, searching supertypes too.
    pub fn find_property(&self, browse_name: &str) -> Option<&'static PropertyDescriptor> {
        self.properties
            .iter()
            .find(|p| p.browse_name == browse_name)
            .or_else(|| self.parent().and_then(|parent| parent.find_property(browse_name)))
    }

    /// Returns `true` if `other` is this type or one of its supertypes.
    pub fn is_subtype_of(&self, other: &TypeInfo) -> bool {
        if self.browse_name == other.browse_name {
            return true;
        }
        self.parent().map_or(false, |parent| parent.is_subtype_of(other))
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Returns every known type.
pub fn registry() -> Vec<&'static TypeInfo> {
    vec![
        BaseEventType::type_info(),
        AuditEventType::type_info(),
        PubSubConnectionType::type_info(),
        PubSubGroupType::type_info(),
        SecurityGroupType::type_info(),
        KeyCredentialConfigurationType::type_info(),
        ApplicationConfigurationType::type_info(),
        MethodNode::type_info(),
    ]
}

/// Finds a type by browse name.
pub fn find_type(browse_name: &str) -> Option<&'static TypeInfo> {
    registry().into_iter().find(|info| info.browse_name == browse_name)
}

/// Finds a type by its type definition node id.
pub fn find_by_type_definition(type_definition: &NodeId) -> Option<&'static TypeInfo> {
    registry()
        .into_iter()
        .find(|info| info.type_definition.as_ref() == Some(type_definition))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyValue;
    use uanode_core::{NamespaceTable, ValueRank};

    #[test]
    fn test_every_data_type_parses() {
        let namespaces = NamespaceTable::new();
        for info in registry() {
            for property in info.properties {
                let data_type = uanode_core::ExpandedNodeId::parse(property.data_type)
                    .unwrap_or_else(|e| panic!("{}.{}: {}", info.browse_name, property.browse_name, e));
                assert!(data_type.to_node_id(&namespaces).is_ok());
            }
        }
    }

    #[test]
    fn test_array_flag_matches_value_rank() {
        for info in registry() {
            for property in info.properties {
                assert_eq!(
                    property.is_array,
                    ValueRank(property.value_rank).is_array(),
                    "{}.{}",
                    info.browse_name,
                    property.browse_name
                );
            }
        }
    }

    #[test]
    fn test_inheritance() {
        let audit = AuditEventType::type_info();
        let base = BaseEventType::type_info();

        assert!(audit.is_subtype_of(base));
        assert!(!base.is_subtype_of(audit));
        assert_eq!(audit.all_properties().len(), base.properties.len() + audit.properties.len());
        assert_eq!(audit.all_properties()[0].browse_name, "EventId");
        assert!(audit.find_property("Severity").is_some());
        assert!(base.find_property("ClientUserId").is_none());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(
            find_type("SecurityGroupType").map(|t| t.type_definition.clone()),
            Some(Some(NodeId::numeric(0, 15471)))
        );
        assert_eq!(
            find_by_type_definition(&NodeId::numeric(0, 25731)).map(|t| t.browse_name),
            Some("ApplicationConfigurationType")
        );
        assert!(find_type("NoSuchType").is_none());
    }

    #[test]
    fn test_key_lifetime_is_a_duration_in_milliseconds() {
        let property = SecurityGroupType::KEY_LIFETIME;
        let data_type = property.data_type().unwrap();
        assert_eq!(
            data_type.to_node_id(&NamespaceTable::new()).unwrap(),
            NodeId::numeric(0, 290)
        );
        assert!(property.value_rank().is_scalar());

        let encoded = 1_500.0f64
            .to_variant(&uanode_core::EncodingContext::default())
            .unwrap();
        assert_eq!(encoded, uanode_core::Variant::Double(1_500.0));
    }
}
