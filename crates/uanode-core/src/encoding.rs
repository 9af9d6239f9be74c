// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Extension object envelope and the shared encoding context.
//!
//! Structured values travel inside an [`ExtensionObject`] tagged with the
//! node id of their encoding. The [`EncodingContext`] produces and unpacks
//! these envelopes for any [`UaStructure`] and enforces the configured
//! [`EncodingLimits`]. Only JSON bodies are produced here; binary bodies come
//! from the transport and are rejected on decode.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{EncodingError, UaResult};
use crate::namespace::NamespaceTable;
use crate::node_id::NodeId;

// =============================================================================
// ExtensionObject
// =============================================================================

/// Body of an extension object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "Encoding", content = "Body")]
pub enum ExtensionBody {
    /// No body.
    #[default]
    None,
    /// JSON encoded body.
    Json(serde_json::Value),
    /// Binary encoded body.
    Binary(Vec<u8>),
}

impl ExtensionBody {
    /// Returns the body encoding name.
    pub fn encoding_name(&self) -> &'static str {
        match self {
            Self::None => "empty",
            Self::Json(_) => "json",
            Self::Binary(_) => "binary",
        }
    }
}

/// The generic envelope carrying an encoded structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExtensionObject {
    /// Node id of the encoding used for the body.
    pub encoding_id: NodeId,
    /// Encoded body.
    pub body: ExtensionBody,
}

impl ExtensionObject {
    /// Creates an extension object holding a JSON body.
    pub fn json(encoding_id: NodeId, body: serde_json::Value) -> Self {
        Self {
            encoding_id,
            body: ExtensionBody::Json(body),
        }
    }

    /// Returns `true` if the envelope has no body.
    pub fn is_empty(&self) -> bool {
        matches!(self.body, ExtensionBody::None)
    }
}

// =============================================================================
// UaStructure
// =============================================================================

/// A structure that can travel inside an [`ExtensionObject`].
pub trait UaStructure: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Structure type name.
    const TYPE_NAME: &'static str;

    /// Node id of the structure's data type.
    const DATA_TYPE_ID: NodeId;

    /// Node id of the JSON encoding.
    const ENCODING_ID: NodeId;
}

// =============================================================================
// EncodingLimits
// =============================================================================

/// Limits applied while encoding and decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingLimits {
    /// Maximum number of elements in an array value.
    pub max_array_length: usize,

    /// Maximum size of a single encoded body in bytes.
    pub max_body_bytes: usize,
}

impl EncodingLimits {
    /// Default maximum array length.
    pub const DEFAULT_MAX_ARRAY_LENGTH: usize = 65_535;

    /// Default maximum body size (1 MiB).
    pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
}

impl Default for EncodingLimits {
    fn default() -> Self {
        Self {
            max_array_length: Self::DEFAULT_MAX_ARRAY_LENGTH,
            max_body_bytes: Self::DEFAULT_MAX_BODY_BYTES,
        }
    }
}

// =============================================================================
// EncodingContext
// =============================================================================

#[derive(Debug)]
struct ContextInner {
    namespaces: NamespaceTable,
    limits: EncodingLimits,
}

/// Shared context for encoding and decoding structured values.
///
/// Cloning is cheap; all clones share the same namespace table and limits.
///
/// # Examples
///
/// ```
/// use uanode_core::{EncodingContext, KeyValuePair, QualifiedName, Variant};
///
/// let context = EncodingContext::default();
/// let pair = KeyValuePair::new(QualifiedName::new(0, "Mode"), Variant::from("fast"));
///
/// let envelope = context.encode(&pair).unwrap();
/// let decoded: KeyValuePair = context.decode(&envelope).unwrap();
/// assert_eq!(decoded, pair);
/// ```
#[derive(Debug, Clone)]
pub struct EncodingContext {
    inner: Arc<ContextInner>,
}

impl EncodingContext {
    /// Creates a new encoding context.
    pub fn new(namespaces: NamespaceTable, limits: EncodingLimits) -> Self {
        Self {
            inner: Arc::new(ContextInner { namespaces, limits }),
        }
    }

    /// Returns the namespace table.
    #[inline]
    pub fn namespaces(&self) -> &NamespaceTable {
        &self.inner.namespaces
    }

    /// Returns the encoding limits.
    #[inline]
    pub fn limits(&self) -> &EncodingLimits {
        &self.inner.limits
    }

    /// Fails if an array of `len` elements exceeds the configured limit.
    pub fn check_array_length(&self, len: usize) -> UaResult<()> {
        let max = self.inner.limits.max_array_length;
        if len > max {
            return Err(EncodingError::limit_exceeded("array length", max, len).into());
        }
        Ok(())
    }

    /// Encodes a structure into an extension object.
    pub fn encode<T: UaStructure>(&self, value: &T) -> UaResult<ExtensionObject> {
        let body = serde_json::to_value(value)
            .map_err(|e| EncodingError::serialize(T::TYPE_NAME, e.to_string()))?;
        self.check_body_size(T::TYPE_NAME, &body)?;

        Ok(ExtensionObject::json(T::ENCODING_ID, body))
    }

    /// Encodes a slice of structures.
    pub fn encode_array<T: UaStructure>(&self, values: &[T]) -> UaResult<Vec<ExtensionObject>> {
        self.check_array_length(values.len())?;
        values.iter().map(|v| self.encode(v)).collect()
    }

    /// Decodes a structure from an extension object.
    ///
    /// # Errors
    ///
    /// Fails if the envelope carries another encoding, has no body, has a
    /// binary body, exceeds the body size limit or does not deserialize.
    pub fn decode<T: UaStructure>(&self, envelope: &ExtensionObject) -> UaResult<T> {
        if envelope.encoding_id != T::ENCODING_ID {
            return Err(EncodingError::encoding_id_mismatch(
                T::TYPE_NAME,
                &T::ENCODING_ID,
                &envelope.encoding_id,
            )
            .into());
        }

        match &envelope.body {
            ExtensionBody::None => Err(EncodingError::empty_body(T::TYPE_NAME).into()),
            ExtensionBody::Binary(_) => {
                Err(EncodingError::unsupported_body(T::TYPE_NAME, "binary").into())
            }
            ExtensionBody::Json(body) => {
                self.check_body_size(T::TYPE_NAME, body)?;
                T::deserialize(body)
                    .map_err(|e| EncodingError::deserialize(T::TYPE_NAME, e.to_string()).into())
            }
        }
    }

    /// Decodes a slice of extension objects.
    pub fn decode_array<T: UaStructure>(&self, envelopes: &[ExtensionObject]) -> UaResult<Vec<T>> {
        self.check_array_length(envelopes.len())?;
        envelopes.iter().map(|e| self.decode(e)).collect()
    }

    fn check_body_size(&self, type_name: &str, body: &serde_json::Value) -> UaResult<()> {
        let max = self.inner.limits.max_body_bytes;
        let size = serde_json::to_vec(body)
            .map_err(|e| EncodingError::serialize(type_name, e.to_string()))?
            .len();
        if size > max {
            return Err(EncodingError::limit_exceeded("body bytes", max, size).into());
        }
        Ok(())
    }
}

impl Default for EncodingContext {
    fn default() -> Self {
        Self::new(NamespaceTable::default(), EncodingLimits::default())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EncodingError, UaError};
    use crate::structures::{Argument, KeyValuePair, TimeZoneDataType};
    use crate::types::{LocalizedText, QualifiedName};
    use crate::variant::Variant;

    fn small_context() -> EncodingContext {
        EncodingContext::new(
            NamespaceTable::default(),
            EncodingLimits {
                max_array_length: 2,
                max_body_bytes: 256,
            },
        )
    }

    #[test]
    fn test_argument_array_round_trip() {
        let context = EncodingContext::default();
        let arguments = vec![
            Argument::scalar("SetPoint", NodeId::numeric(0, 11), LocalizedText::text("Target")),
            Argument::array("Samples", NodeId::numeric(0, 6), LocalizedText::default()),
        ];

        let encoded = context.encode_array(&arguments).unwrap();
        assert_eq!(encoded.len(), 2);
        assert_eq!(encoded[0].encoding_id, Argument::ENCODING_ID);

        let decoded: Vec<Argument> = context.decode_array(&encoded).unwrap();
        assert_eq!(decoded, arguments);
    }

    #[test]
    fn test_empty_array_round_trip() {
        let context = EncodingContext::default();
        let encoded = context.encode_array::<KeyValuePair>(&[]).unwrap();
        assert!(encoded.is_empty());
        assert!(context.decode_array::<KeyValuePair>(&encoded).unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_other_encoding() {
        let context = EncodingContext::default();
        let envelope = context.encode(&TimeZoneDataType::new(60, true)).unwrap();

        let err = context.decode::<KeyValuePair>(&envelope).unwrap_err();
        assert!(matches!(
            err,
            UaError::Encoding(EncodingError::EncodingIdMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_binary_and_empty_bodies() {
        let context = EncodingContext::default();

        let binary = ExtensionObject {
            encoding_id: KeyValuePair::ENCODING_ID,
            body: ExtensionBody::Binary(vec![1, 2, 3]),
        };
        assert!(matches!(
            context.decode::<KeyValuePair>(&binary),
            Err(UaError::Encoding(EncodingError::UnsupportedBody { .. }))
        ));

        let empty = ExtensionObject {
            encoding_id: KeyValuePair::ENCODING_ID,
            body: ExtensionBody::None,
        };
        assert!(matches!(
            context.decode::<KeyValuePair>(&empty),
            Err(UaError::Encoding(EncodingError::EmptyBody { .. }))
        ));
    }

    #[test]
    fn test_array_length_limit() {
        let context = small_context();
        let pairs: Vec<KeyValuePair> = (0..3)
            .map(|i| KeyValuePair::new(QualifiedName::new(0, format!("k{}", i)), Variant::Int32(i)))
            .collect();

        let err = context.encode_array(&pairs).unwrap_err();
        assert!(matches!(
            err,
            UaError::Encoding(EncodingError::LimitExceeded { max: 2, actual: 3, .. })
        ));
    }

    #[test]
    fn test_body_size_limit() {
        let context = small_context();
        let pair = KeyValuePair::new(QualifiedName::new(0, "Big"), Variant::from("x".repeat(512)));

        let err = context.encode(&pair).unwrap_err();
        assert_eq!(err.status_code(), crate::StatusCode::BAD_ENCODING_LIMITS_EXCEEDED);
    }

    #[test]
    fn test_malformed_body() {
        let context = EncodingContext::default();
        let envelope = ExtensionObject::json(
            TimeZoneDataType::ENCODING_ID,
            serde_json::json!({"Offset": "not a number"}),
        );
        assert!(matches!(
            context.decode::<TimeZoneDataType>(&envelope),
            Err(UaError::Encoding(EncodingError::Deserialize { .. }))
        ));
    }
}
