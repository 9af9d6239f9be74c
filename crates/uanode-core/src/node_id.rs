// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Node identifiers.
//!
//! - **NodeId**: namespace index plus one of the four identifier kinds
//! - **ExpandedNodeId**: a NodeId whose namespace may be given by URI and
//!   which may live on another server
//!
//! # Examples
//!
//! ```
//! use uanode_core::{ExpandedNodeId, NamespaceTable, NodeId};
//!
//! let data_type: ExpandedNodeId = "nsu=http://opcfoundation.org/UA/;i=24".parse().unwrap();
//! let local = data_type.to_node_id(&NamespaceTable::default()).unwrap();
//! assert_eq!(local, NodeId::numeric(0, 24));
//! ```

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ConfigurationError, UaError, UaResult};
use crate::namespace::NamespaceTable;

// =============================================================================
// NodeId
// =============================================================================

/// OPC UA Node Identifier.
///
/// # Examples
///
/// ```
/// use uanode_core::NodeId;
///
/// let numeric = NodeId::numeric(2, 1001);
/// let parsed: NodeId = "ns=2;s=MyDevice.Temperature".parse().unwrap();
/// assert_eq!(parsed, NodeId::string(2, "MyDevice.Temperature"));
/// assert_eq!(numeric.to_string(), "ns=2;i=1001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
    /// Namespace index (0 = OPC UA standard namespace).
    pub namespace_index: u16,

    /// The node identifier.
    pub identifier: NodeIdentifier,
}

impl NodeId {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a numeric node ID.
    #[inline]
    pub const fn numeric(namespace_index: u16, value: u32) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Numeric(value),
        }
    }

    /// Creates a string node ID.
    #[inline]
    pub fn string(namespace_index: u16, value: impl Into<String>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::String(value.into()),
        }
    }

    /// Creates a GUID node ID.
    #[inline]
    pub fn guid(namespace_index: u16, value: Uuid) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Guid(value),
        }
    }

    /// Creates an opaque (byte string) node ID.
    #[inline]
    pub fn opaque(namespace_index: u16, value: Vec<u8>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Opaque(value),
        }
    }

    /// Returns the null node ID (ns=0, i=0).
    #[inline]
    pub const fn null() -> Self {
        Self::numeric(0, 0)
    }

    // =========================================================================
    // Standard Node IDs
    // =========================================================================

    /// Root folder node (ns=0, i=84).
    pub const ROOT_FOLDER: NodeId = NodeId::numeric(0, 84);

    /// Objects folder node (ns=0, i=85).
    pub const OBJECTS_FOLDER: NodeId = NodeId::numeric(0, 85);

    /// Types folder node (ns=0, i=86).
    pub const TYPES_FOLDER: NodeId = NodeId::numeric(0, 86);

    /// Server node (ns=0, i=2253).
    pub const SERVER: NodeId = NodeId::numeric(0, 2253);

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns `true` if this is a null node ID (ns=0, i=0).
    #[inline]
    pub fn is_null(&self) -> bool {
        self.namespace_index == 0 && matches!(self.identifier, NodeIdentifier::Numeric(0))
    }

    /// Returns the numeric value if this is a numeric identifier.
    #[inline]
    pub fn as_numeric(&self) -> Option<u32> {
        match &self.identifier {
            NodeIdentifier::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    /// Converts to the OPC UA string format.
    ///
    /// The namespace prefix is omitted for namespace 0.
    pub fn to_opc_string(&self) -> String {
        if self.namespace_index == 0 {
            self.identifier.to_string()
        } else {
            format!("ns={};{}", self.namespace_index, self.identifier)
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_opc_string())
    }
}

impl FromStr for NodeId {
    type Err = UaError;

    /// Parses a NodeId from OPC UA string format.
    ///
    /// Supported formats:
    /// - `ns=2;i=1001` (numeric)
    /// - `ns=2;s=MyNode` (string)
    /// - `ns=2;g=550e8400-e29b-41d4-a716-446655440000` (GUID)
    /// - `ns=2;b=SGVsbG8=` (opaque, base64 encoded)
    /// - `i=1001` (numeric, namespace 0)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (namespace_index, identifier_part) = match s.strip_prefix("ns=") {
            Some(rest) => {
                let (ns_str, id) = rest.split_once(';').ok_or_else(|| {
                    UaError::invalid_node_id(s, "Missing identifier after namespace")
                })?;
                let ns: u16 = ns_str
                    .parse()
                    .map_err(|_| UaError::invalid_node_id(s, "Invalid namespace index"))?;
                (ns, id)
            }
            None => (0, s),
        };

        let identifier = NodeIdentifier::parse(identifier_part)
            .map_err(|reason| UaError::invalid_node_id(s, reason))?;

        Ok(Self {
            namespace_index,
            identifier,
        })
    }
}

// =============================================================================
// NodeIdentifier
// =============================================================================

/// OPC UA node identifier types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum NodeIdentifier {
    /// Numeric identifier.
    Numeric(u32),

    /// String identifier.
    String(String),

    /// GUID identifier.
    Guid(Uuid),

    /// Opaque identifier.
    Opaque(Vec<u8>),
}

impl NodeIdentifier {
    /// Parses the `i=`, `s=`, `g=` or `b=` part of a node id string.
    fn parse(part: &str) -> Result<Self, String> {
        if let Some(id) = part.strip_prefix("i=") {
            id.parse()
                .map(Self::Numeric)
                .map_err(|_| "Invalid numeric identifier".to_string())
        } else if let Some(id) = part.strip_prefix("s=") {
            Ok(Self::String(id.to_string()))
        } else if let Some(id) = part.strip_prefix("g=") {
            Uuid::parse_str(id)
                .map(Self::Guid)
                .map_err(|e| format!("Invalid GUID: {}", e))
        } else if let Some(id) = part.strip_prefix("b=") {
            BASE64
                .decode(id)
                .map(Self::Opaque)
                .map_err(|e| format!("Invalid base64: {}", e))
        } else {
            Err("Unknown identifier type. Expected i=, s=, g=, or b=".to_string())
        }
    }
}

impl fmt::Display for NodeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "i={}", v),
            Self::String(v) => write!(f, "s={}", v),
            Self::Guid(v) => write!(f, "g={}", v),
            Self::Opaque(v) => write!(f, "b={}", BASE64.encode(v)),
        }
    }
}

// =============================================================================
// ExpandedNodeId
// =============================================================================

/// Namespace of an [`ExpandedNodeId`], either by index or by URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceRef {
    /// Namespace index into the server's namespace table.
    Index(u16),
    /// Namespace URI.
    Uri(String),
}

/// A node identifier that may reference its namespace by URI and may live on
/// another server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpandedNodeId {
    /// Server index (0 = local server).
    pub server_index: u32,

    /// Namespace reference.
    pub namespace: NamespaceRef,

    /// The node identifier.
    pub identifier: NodeIdentifier,
}

impl ExpandedNodeId {
    /// Creates a local expanded node ID with a namespace URI.
    pub fn with_uri(uri: impl Into<String>, identifier: NodeIdentifier) -> Self {
        Self {
            server_index: 0,
            namespace: NamespaceRef::Uri(uri.into()),
            identifier,
        }
    }

    /// Returns the null expanded node ID.
    pub fn null() -> Self {
        NodeId::null().into()
    }

    /// Returns `true` if this refers to the null node.
    pub fn is_null(&self) -> bool {
        self.server_index == 0
            && matches!(self.namespace, NamespaceRef::Index(0))
            && matches!(self.identifier, NodeIdentifier::Numeric(0))
    }

    /// Returns `true` if the node lives on the local server.
    #[inline]
    pub fn is_local(&self) -> bool {
        self.server_index == 0
    }

    /// Parses an expanded node ID string.
    ///
    /// An optional `svr=<n>;` prefix comes first, followed by an optional
    /// `ns=<n>;` or `nsu=<uri>;` prefix. Everything after the prefixes is
    /// the identifier, so string identifiers may contain `;`.
    pub fn parse(s: &str) -> UaResult<Self> {
        let input = s.trim();
        let invalid = |reason: &str| {
            UaError::Configuration(ConfigurationError::invalid_expanded_node_id(input, reason))
        };

        let mut rest = input;

        let mut server_index = 0;
        if let Some(after) = rest.strip_prefix("svr=") {
            let (svr, tail) = after.split_once(';').ok_or_else(|| invalid("Missing identifier"))?;
            server_index = svr.parse().map_err(|_| invalid("Invalid server index"))?;
            rest = tail;
        }

        let mut namespace = NamespaceRef::Index(0);
        if let Some(after) = rest.strip_prefix("nsu=") {
            let (uri, tail) = after.split_once(';').ok_or_else(|| invalid("Missing identifier"))?;
            if uri.is_empty() {
                return Err(invalid("Empty namespace URI"));
            }
            namespace = NamespaceRef::Uri(uri.to_string());
            rest = tail;
        } else if let Some(after) = rest.strip_prefix("ns=") {
            let (ns, tail) = after.split_once(';').ok_or_else(|| invalid("Missing identifier"))?;
            namespace =
                NamespaceRef::Index(ns.parse().map_err(|_| invalid("Invalid namespace index"))?);
            rest = tail;
        }

        let identifier = NodeIdentifier::parse(rest).map_err(|r| invalid(&r))?;

        Ok(Self {
            server_index,
            namespace,
            identifier,
        })
    }

    /// Resolves this expanded node ID to a local [`NodeId`].
    ///
    /// # Errors
    ///
    /// Fails if the node lives on another server or its namespace URI is not
    /// registered in `namespaces`.
    pub fn to_node_id(&self, namespaces: &NamespaceTable) -> UaResult<NodeId> {
        if !self.is_local() {
            return Err(ConfigurationError::not_local(self.to_string(), self.server_index).into());
        }

        let namespace_index = match &self.namespace {
            NamespaceRef::Index(index) => *index,
            NamespaceRef::Uri(uri) => namespaces
                .index_of(uri)
                .ok_or_else(|| ConfigurationError::unknown_namespace(uri.clone()))?,
        };

        Ok(NodeId {
            namespace_index,
            identifier: self.identifier.clone(),
        })
    }
}

impl From<NodeId> for ExpandedNodeId {
    fn from(node_id: NodeId) -> Self {
        Self {
            server_index: 0,
            namespace: NamespaceRef::Index(node_id.namespace_index),
            identifier: node_id.identifier,
        }
    }
}

impl FromStr for ExpandedNodeId {
    type Err = UaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ExpandedNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.server_index != 0 {
            write!(f, "svr={};", self.server_index)?;
        }
        match &self.namespace {
            NamespaceRef::Uri(uri) => write!(f, "nsu={};", uri)?,
            NamespaceRef::Index(0) => {}
            NamespaceRef::Index(index) => write!(f, "ns={};", index)?,
        }
        write!(f, "{}", self.identifier)
    }
}

// =============================================================================
// Well-known Nodes
// =============================================================================

/// Standard reference type node IDs (namespace 0).
pub mod reference_types {
    use super::NodeId;

    /// References (i=31).
    pub const REFERENCES: NodeId = NodeId::numeric(0, 31);
    /// HierarchicalReferences (i=33).
    pub const HIERARCHICAL_REFERENCES: NodeId = NodeId::numeric(0, 33);
    /// Organizes (i=35).
    pub const ORGANIZES: NodeId = NodeId::numeric(0, 35);
    /// HasTypeDefinition (i=40).
    pub const HAS_TYPE_DEFINITION: NodeId = NodeId::numeric(0, 40);
    /// HasProperty (i=46).
    pub const HAS_PROPERTY: NodeId = NodeId::numeric(0, 46);
    /// HasComponent (i=47).
    pub const HAS_COMPONENT: NodeId = NodeId::numeric(0, 47);
}

/// Standard type definition node IDs (namespace 0).
pub mod type_definitions {
    use super::NodeId;

    /// BaseObjectType (i=58).
    pub const BASE_OBJECT_TYPE: NodeId = NodeId::numeric(0, 58);
    /// FolderType (i=61).
    pub const FOLDER_TYPE: NodeId = NodeId::numeric(0, 61);
    /// BaseDataVariableType (i=63).
    pub const BASE_DATA_VARIABLE_TYPE: NodeId = NodeId::numeric(0, 63);
    /// PropertyType (i=68).
    pub const PROPERTY_TYPE: NodeId = NodeId::numeric(0, 68);
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_parse_all_identifier_kinds() {
        assert_eq!("ns=2;i=1001".parse::<NodeId>().unwrap(), NodeId::numeric(2, 1001));
        assert_eq!("s=Plain".parse::<NodeId>().unwrap(), NodeId::string(0, "Plain"));

        let guid: NodeId = "ns=1;g=550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert!(matches!(guid.identifier, NodeIdentifier::Guid(_)));

        let opaque: NodeId = "ns=3;b=SGVsbG8=".parse().unwrap();
        assert_eq!(opaque, NodeId::opaque(3, b"Hello".to_vec()));
    }

    #[test]
    fn test_node_id_parse_errors() {
        assert!("ns=2".parse::<NodeId>().is_err());
        assert!("ns=x;i=1".parse::<NodeId>().is_err());
        assert!("q=1".parse::<NodeId>().is_err());
        assert!("i=abc".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::numeric(0, 85).to_string(), "i=85");
        assert_eq!(NodeId::string(4, "A.B").to_string(), "ns=4;s=A.B");
        assert!(NodeId::null().is_null());
    }

    #[test]
    fn test_expanded_parse_uri_form() {
        let id = ExpandedNodeId::parse("nsu=http://opcfoundation.org/UA/;i=14533").unwrap();
        assert_eq!(id.namespace, NamespaceRef::Uri("http://opcfoundation.org/UA/".into()));
        assert_eq!(id.identifier, NodeIdentifier::Numeric(14533));
        assert!(id.is_local());
        assert_eq!(id.to_string(), "nsu=http://opcfoundation.org/UA/;i=14533");
    }

    #[test]
    fn test_expanded_parse_index_and_server_forms() {
        let id = ExpandedNodeId::parse("ns=0;i=46").unwrap();
        assert_eq!(id.namespace, NamespaceRef::Index(0));
        assert_eq!(id.to_string(), "i=46");

        let remote = ExpandedNodeId::parse("svr=2;nsu=urn:other;s=Foo").unwrap();
        assert_eq!(remote.server_index, 2);
        assert_eq!(remote.to_string(), "svr=2;nsu=urn:other;s=Foo");
        assert!(remote.to_node_id(&NamespaceTable::default()).is_err());
    }

    #[test]
    fn test_expanded_parse_errors() {
        assert!(ExpandedNodeId::parse("nsu=;i=1").is_err());
        assert!(ExpandedNodeId::parse("svr=x;i=1").is_err());
        assert!(ExpandedNodeId::parse("foo=1;i=1").is_err());
        assert!(ExpandedNodeId::parse("nsu=urn:a").is_err());
        assert!(ExpandedNodeId::parse("ns=1;ns=2;i=1").is_err());
    }

    #[test]
    fn test_expanded_string_identifier_may_contain_separator() {
        let node_id: NodeId = "ns=1;s=Line;Motor".parse().unwrap();
        assert_eq!(node_id.identifier, NodeIdentifier::String("Line;Motor".into()));

        let expanded = ExpandedNodeId::from(node_id.clone());
        assert_eq!(expanded.to_string(), "ns=1;s=Line;Motor");
        let reparsed = ExpandedNodeId::parse(&expanded.to_string()).unwrap();
        assert_eq!(reparsed, expanded);
        assert_eq!(reparsed.to_node_id(&NamespaceTable::default()).unwrap(), node_id);

        let by_uri = ExpandedNodeId::parse("svr=0;nsu=urn:sylvex:demo;s=a;b;c").unwrap();
        assert_eq!(by_uri.namespace, NamespaceRef::Uri("urn:sylvex:demo".into()));
        assert_eq!(by_uri.identifier, NodeIdentifier::String("a;b;c".into()));
        assert_eq!(by_uri.to_string(), "nsu=urn:sylvex:demo;s=a;b;c");
    }

    #[test]
    fn test_expanded_to_node_id() {
        let mut table = NamespaceTable::default();
        let index = table.register("urn:sylvex:demo");

        let id = ExpandedNodeId::parse("nsu=urn:sylvex:demo;s=Line1").unwrap();
        assert_eq!(id.to_node_id(&table).unwrap(), NodeId::string(index, "Line1"));

        let unknown = ExpandedNodeId::parse("nsu=urn:missing;i=1").unwrap();
        let err = unknown.to_node_id(&table).unwrap_err();
        assert!(matches!(
            err,
            UaError::Configuration(ConfigurationError::UnknownNamespace { .. })
        ));
    }
}
