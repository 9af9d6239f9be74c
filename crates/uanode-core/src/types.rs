// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Attribute metadata types.
//!
//! - [`QualifiedName`]: namespace-qualified browse name
//! - [`LocalizedText`]: display text with an optional locale
//! - [`AttributeId`]: the 27 node attributes
//! - [`NodeClass`]: node class bitmask values
//! - [`ValueRank`]: scalar or array declaration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, UaError};
use crate::variant::Variant;

// =============================================================================
// QualifiedName
// =============================================================================

/// A name qualified by a namespace index.
///
/// # Examples
///
/// ```
/// use uanode_core::QualifiedName;
///
/// let name: QualifiedName = "2:Enabled".parse().unwrap();
/// assert_eq!(name.namespace_index, 2);
/// assert_eq!(name.name, "Enabled");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QualifiedName {
    /// Namespace index.
    pub namespace_index: u16,
    /// Name.
    pub name: String,
}

impl QualifiedName {
    /// Creates a new qualified name.
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }

    /// Returns `true` if the name is empty.
    pub fn is_null(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_index == 0 {
            f.write_str(&self.name)
        } else {
            write!(f, "{}:{}", self.namespace_index, self.name)
        }
    }
}

impl FromStr for QualifiedName {
    type Err = UaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((ns, name)) if !ns.is_empty() && ns.bytes().all(|b| b.is_ascii_digit()) => {
                let namespace_index = ns.parse().map_err(|_| {
                    ConfigurationError::invalid_qualified_name(s, "Namespace index out of range")
                })?;
                if name.is_empty() {
                    return Err(ConfigurationError::invalid_qualified_name(s, "Empty name").into());
                }
                Ok(Self::new(namespace_index, name))
            }
            _ if s.is_empty() => {
                Err(ConfigurationError::invalid_qualified_name(s, "Empty name").into())
            }
            _ => Ok(Self::new(0, s)),
        }
    }
}

// =============================================================================
// LocalizedText
// =============================================================================

/// Human readable text with an optional locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalizedText {
    /// Locale identifier such as `en-US`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Text.
    pub text: String,
}

impl LocalizedText {
    /// Creates localized text with a locale.
    pub fn new(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
            text: text.into(),
        }
    }

    /// Creates localized text without a locale.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            locale: None,
            text: text.into(),
        }
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for LocalizedText {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

// =============================================================================
// AttributeId
// =============================================================================

/// Node attribute identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u32)]
pub enum AttributeId {
    /// NodeId.
    NodeId = 1,
    /// NodeClass.
    NodeClass = 2,
    /// BrowseName.
    BrowseName = 3,
    /// DisplayName.
    DisplayName = 4,
    /// Description.
    Description = 5,
    /// WriteMask.
    WriteMask = 6,
    /// UserWriteMask.
    UserWriteMask = 7,
    /// IsAbstract.
    IsAbstract = 8,
    /// Symmetric.
    Symmetric = 9,
    /// InverseName.
    InverseName = 10,
    /// ContainsNoLoops.
    ContainsNoLoops = 11,
    /// EventNotifier.
    EventNotifier = 12,
    /// Value.
    Value = 13,
    /// DataType.
    DataType = 14,
    /// ValueRank.
    ValueRank = 15,
    /// ArrayDimensions.
    ArrayDimensions = 16,
    /// AccessLevel.
    AccessLevel = 17,
    /// UserAccessLevel.
    UserAccessLevel = 18,
    /// MinimumSamplingInterval.
    MinimumSamplingInterval = 19,
    /// Historizing.
    Historizing = 20,
    /// Executable.
    Executable = 21,
    /// UserExecutable.
    UserExecutable = 22,
    /// DataTypeDefinition.
    DataTypeDefinition = 23,
    /// RolePermissions.
    RolePermissions = 24,
    /// UserRolePermissions.
    UserRolePermissions = 25,
    /// AccessRestrictions.
    AccessRestrictions = 26,
    /// AccessLevelEx.
    AccessLevelEx = 27,
}

impl AttributeId {
    const ALL: [AttributeId; 27] = [
        Self::NodeId,
        Self::NodeClass,
        Self::BrowseName,
        Self::DisplayName,
        Self::Description,
        Self::WriteMask,
        Self::UserWriteMask,
        Self::IsAbstract,
        Self::Symmetric,
        Self::InverseName,
        Self::ContainsNoLoops,
        Self::EventNotifier,
        Self::Value,
        Self::DataType,
        Self::ValueRank,
        Self::ArrayDimensions,
        Self::AccessLevel,
        Self::UserAccessLevel,
        Self::MinimumSamplingInterval,
        Self::Historizing,
        Self::Executable,
        Self::UserExecutable,
        Self::DataTypeDefinition,
        Self::RolePermissions,
        Self::UserRolePermissions,
        Self::AccessRestrictions,
        Self::AccessLevelEx,
    ];

    /// Returns the numeric attribute id.
    #[inline]
    pub const fn value(self) -> u32 {
        self as u32
    }

    /// Looks up an attribute by its numeric id.
    pub fn from_value(value: u32) -> Option<Self> {
        value
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i as usize))
            .copied()
    }

    /// Returns `true` for attributes every node class carries.
    pub const fn is_base_node_attribute(self) -> bool {
        matches!(
            self,
            Self::NodeId
                | Self::NodeClass
                | Self::BrowseName
                | Self::DisplayName
                | Self::Description
                | Self::WriteMask
                | Self::UserWriteMask
        )
    }

    /// Returns the attribute name.
    pub fn name(self) -> &'static str {
        match self {
            Self::NodeId => "NodeId",
            Self::NodeClass => "NodeClass",
            Self::BrowseName => "BrowseName",
            Self::DisplayName => "DisplayName",
            Self::Description => "Description",
            Self::WriteMask => "WriteMask",
            Self::UserWriteMask => "UserWriteMask",
            Self::IsAbstract => "IsAbstract",
            Self::Symmetric => "Symmetric",
            Self::InverseName => "InverseName",
            Self::ContainsNoLoops => "ContainsNoLoops",
            Self::EventNotifier => "EventNotifier",
            Self::Value => "Value",
            Self::DataType => "DataType",
            Self::ValueRank => "ValueRank",
            Self::ArrayDimensions => "ArrayDimensions",
            Self::AccessLevel => "AccessLevel",
            Self::UserAccessLevel => "UserAccessLevel",
            Self::MinimumSamplingInterval => "MinimumSamplingInterval",
            Self::Historizing => "Historizing",
            Self::Executable => "Executable",
            Self::UserExecutable => "UserExecutable",
            Self::DataTypeDefinition => "DataTypeDefinition",
            Self::RolePermissions => "RolePermissions",
            Self::UserRolePermissions => "UserRolePermissions",
            Self::AccessRestrictions => "AccessRestrictions",
            Self::AccessLevelEx => "AccessLevelEx",
        }
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// NodeClass
// =============================================================================

/// Node class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum NodeClass {
    /// Unspecified.
    Unspecified = 0,
    /// Object.
    Object = 1,
    /// Variable.
    Variable = 2,
    /// Method.
    Method = 4,
    /// ObjectType.
    ObjectType = 8,
    /// VariableType.
    VariableType = 16,
    /// ReferenceType.
    ReferenceType = 32,
    /// DataType.
    DataType = 64,
    /// View.
    View = 128,
}

impl NodeClass {
    /// Returns the mask value.
    #[inline]
    pub const fn value(self) -> u32 {
        self as u32
    }

    /// Looks up a node class by its mask value.
    pub fn from_value(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Unspecified),
            1 => Some(Self::Object),
            2 => Some(Self::Variable),
            4 => Some(Self::Method),
            8 => Some(Self::ObjectType),
            16 => Some(Self::VariableType),
            32 => Some(Self::ReferenceType),
            64 => Some(Self::DataType),
            128 => Some(Self::View),
            _ => None,
        }
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// =============================================================================
// ValueRank
// =============================================================================

/// Declared dimensionality of a variable's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueRank(pub i32);

impl ValueRank {
    /// Scalar or array with any dimensions.
    pub const ANY: Self = Self(-2);
    /// Scalar.
    pub const SCALAR: Self = Self(-1);
    /// Scalar or one-dimensional array.
    pub const SCALAR_OR_ONE_DIMENSION: Self = Self(-3);
    /// Array with one or more dimensions.
    pub const ONE_OR_MORE_DIMENSIONS: Self = Self(0);
    /// One-dimensional array.
    pub const ONE_DIMENSION: Self = Self(1);

    /// Returns `true` if only scalars are allowed.
    #[inline]
    pub const fn is_scalar(&self) -> bool {
        self.0 == -1
    }

    /// Returns `true` if only arrays are allowed.
    #[inline]
    pub const fn is_array(&self) -> bool {
        self.0 >= 0
    }

    /// Returns `true` if the variant's shape is allowed by this rank.
    ///
    /// An empty variant is accepted by every rank.
    pub fn accepts(&self, value: &Variant) -> bool {
        if value.is_empty() {
            return true;
        }
        match self.0 {
            -1 => !value.is_array(),
            -3 | -2 => true,
            n if n >= 0 => value.is_array(),
            _ => false,
        }
    }
}

impl Default for ValueRank {
    fn default() -> Self {
        Self::SCALAR
    }
}

impl fmt::Display for ValueRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================
