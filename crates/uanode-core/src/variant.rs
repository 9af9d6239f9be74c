// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Attribute values.
//!
//! [`Variant`] is the wire-shaped value held by node proxies and exchanged
//! with the attribute channel. [`DataValue`] pairs a variant with the status
//! and timestamps of the read or write that produced it.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::encoding::ExtensionObject;
use crate::node_id::NodeId;
use crate::status::StatusCode;
use crate::types::{LocalizedText, QualifiedName};

// =============================================================================
// ByteString
// =============================================================================

/// An opaque byte sequence, serialized as base64.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ByteString(pub Vec<u8>);

impl ByteString {
    /// Returns the bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the number of bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for ByteString {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl Serialize for ByteString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for ByteString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64
            .decode(encoded.as_bytes())
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Variant
// =============================================================================

/// A value of any OPC UA built-in type.
///
/// # Examples
///
/// ```
/// use uanode_core::Variant;
///
/// let value = Variant::from(42i32);
/// assert_eq!(value.as_i64(), Some(42));
/// assert_eq!(value.type_name(), "Int32");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "Type", content = "Body")]
pub enum Variant {
    /// No value.
    #[default]
    Empty,
    /// Boolean.
    Boolean(bool),
    /// Signed 8-bit integer.
    SByte(i8),
    /// Unsigned 8-bit integer.
    Byte(u8),
    /// Signed 16-bit integer.
    Int16(i16),
    /// Unsigned 16-bit integer.
    UInt16(u16),
    /// Signed 32-bit integer.
    Int32(i32),
    /// Unsigned 32-bit integer.
    UInt32(u32),
    /// Signed 64-bit integer.
    Int64(i64),
    /// Unsigned 64-bit integer.
    UInt64(u64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// String.
    String(String),
    /// UTC timestamp.
    DateTime(DateTime<Utc>),
    /// GUID.
    Guid(Uuid),
    /// Byte string.
    ByteString(ByteString),
    /// Status code.
    StatusCode(StatusCode),
    /// Node identifier.
    NodeId(NodeId),
    /// Qualified name.
    QualifiedName(QualifiedName),
    /// Localized text.
    LocalizedText(LocalizedText),
    /// Encoded structure.
    ExtensionObject(ExtensionObject),
    /// One-dimensional array.
    Array(Vec<Variant>),
}

impl Variant {
    /// Returns `true` if this is [`Variant::Empty`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` if this is an array.
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns the built-in type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "Null",
            Self::Boolean(_) => "Boolean",
            Self::SByte(_) => "SByte",
            Self::Byte(_) => "Byte",
            Self::Int16(_) => "Int16",
            Self::UInt16(_) => "UInt16",
            Self::Int32(_) => "Int32",
            Self::UInt32(_) => "UInt32",
            Self::Int64(_) => "Int64",
            Self::UInt64(_) => "UInt64",
            Self::Float(_) => "Float",
            Self::Double(_) => "Double",
            Self::String(_) => "String",
            Self::DateTime(_) => "DateTime",
            Self::Guid(_) => "Guid",
            Self::ByteString(_) => "ByteString",
            Self::StatusCode(_) => "StatusCode",
            Self::NodeId(_) => "NodeId",
            Self::QualifiedName(_) => "QualifiedName",
            Self::LocalizedText(_) => "LocalizedText",
            Self::ExtensionObject(_) => "ExtensionObject",
            Self::Array(_) => "Array",
        }
    }

    /// Returns the built-in type id (0 for an empty value).
    ///
    /// Arrays report the type of their first element.
    pub fn builtin_type_id(&self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Boolean(_) => 1,
            Self::SByte(_) => 2,
            Self::Byte(_) => 3,
            Self::Int16(_) => 4,
            Self::UInt16(_) => 5,
            Self::Int32(_) => 6,
            Self::UInt32(_) => 7,
            Self::Int64(_) => 8,
            Self::UInt64(_) => 9,
            Self::Float(_) => 10,
            Self::Double(_) => 11,
            Self::String(_) => 12,
            Self::DateTime(_) => 13,
            Self::Guid(_) => 14,
            Self::ByteString(_) => 15,
            Self::NodeId(_) => 17,
            Self::StatusCode(_) => 19,
            Self::QualifiedName(_) => 20,
            Self::LocalizedText(_) => 21,
            Self::ExtensionObject(_) => 22,
            Self::Array(items) => items.first().map_or(0, Variant::builtin_type_id),
        }
    }

    /// Returns the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns any integer value widened to `i64`.
    ///
    /// `UInt64` values above `i64::MAX` return `None`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::SByte(v) => Some(*v as i64),
            Self::Byte(v) => Some(*v as i64),
            Self::Int16(v) => Some(*v as i64),
            Self::UInt16(v) => Some(*v as i64),
            Self::Int32(v) => Some(*v as i64),
            Self::UInt32(v) => Some(*v as i64),
            Self::Int64(v) => Some(*v),
            Self::UInt64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Returns any numeric value as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v as f64),
            Self::Double(v) => Some(*v),
            Self::UInt64(v) => Some(*v as f64),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    /// Returns the value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the array elements.
    pub fn as_array(&self) -> Option<&[Variant]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the encoded structure.
    pub fn as_extension_object(&self) -> Option<&ExtensionObject> {
        match self {
            Self::ExtensionObject(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "null"),
            Self::Boolean(v) => write!(f, "{}", v),
            Self::SByte(v) => write!(f, "{}", v),
            Self::Byte(v) => write!(f, "{}", v),
            Self::Int16(v) => write!(f, "{}", v),
            Self::UInt16(v) => write!(f, "{}", v),
            Self::Int32(v) => write!(f, "{}", v),
            Self::UInt32(v) => write!(f, "{}", v),
            Self::Int64(v) => write!(f, "{}", v),
            Self::UInt64(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "\"{}\"", v),
            Self::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Guid(v) => write!(f, "{}", v),
            Self::ByteString(v) => write!(f, "<{} bytes>", v.len()),
            Self::StatusCode(v) => write!(f, "{}", v),
            Self::NodeId(v) => write!(f, "{}", v),
            Self::QualifiedName(v) => write!(f, "{}", v),
            Self::LocalizedText(v) => write!(f, "{}", v),
            Self::ExtensionObject(v) => write!(f, "ExtensionObject({})", v.encoding_id),
            Self::Array(items) => write!(f, "[{} items]", items.len()),
        }
    }
}

macro_rules! impl_from_for_variant {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Variant {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_for_variant! {
    bool => Boolean,
    i8 => SByte,
    u8 => Byte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    String => String,
    DateTime<Utc> => DateTime,
    Uuid => Guid,
    ByteString => ByteString,
    StatusCode => StatusCode,
    NodeId => NodeId,
    QualifiedName => QualifiedName,
    LocalizedText => LocalizedText,
    ExtensionObject => ExtensionObject,
    Vec<Variant> => Array,
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

// =============================================================================
// DataValue
// =============================================================================

/// A value together with the status and timestamps reported for it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataValue {
    /// The value.
    pub value: Variant,

    /// Status of the value.
    pub status: StatusCode,

    /// Timestamp assigned by the data source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_timestamp: Option<DateTime<Utc>>,

    /// Timestamp assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_timestamp: Option<DateTime<Utc>>,
}

impl DataValue {
    /// Creates a data value with Good status and no timestamps.
    pub fn value_only(value: impl Into<Variant>) -> Self {
        Self {
            value: value.into(),
            status: StatusCode::GOOD,
            source_timestamp: None,
            server_timestamp: None,
        }
    }

    /// Creates a data value with no value and the given status.
    pub fn from_status(status: StatusCode) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// Replaces the status.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Sets the source timestamp.
    pub fn with_source_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.source_timestamp = Some(timestamp);
        self
    }

    /// Sets the server timestamp.
    pub fn with_server_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.server_timestamp = Some(timestamp);
        self
    }

    /// Returns `true` if the status is Good.
    #[inline]
    pub fn is_good(&self) -> bool {
        self.status.is_good()
    }
}

// =============================================================================
// Tests
// =============================================================================
