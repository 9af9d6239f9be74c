// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Property descriptors and value codecs.
//!
//! A [`QualifiedProperty<T>`] is a constant describing one property of a
//! type definition. `T` selects the [`PropertyValue`] codec that converts
//! between the wire [`Variant`] and the Rust value:
//!
//! | `T`                               | Wire shape                    | Decoded as        |
//! |-----------------------------------|-------------------------------|-------------------|
//! | primitives, strings, ids          | matching built-in variant     | `T`               |
//! | [`Variant`]                       | anything (BaseDataType)       | `Variant`         |
//! | enumerations                      | `Int32` or `Name_Value`       | [`Decoded<T>`]    |
//! | structures ([`UaStructure`])      | `ExtensionObject`             | `T`               |
//! | `Vec<T>`                          | `Array` of the element shape  | `Vec<T::Output>`  |

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use uanode_core::{
    ApplicationType, Argument, ByteString, CoercionError, Decoded, EncodingContext, ExpandedNodeId,
    KeyValuePair, LocalizedText, MessageSecurityMode, NodeId, QualifiedName, StatusCode,
    TimeZoneDataType, UaEnumeration, UaError, UaResult, UaStructure, ValueRank, Variant,
};

use crate::resolver::MemberRequest;

// =============================================================================
// QualifiedProperty
// =============================================================================

/// Compile-time description of one property of a type definition.
///
/// # Examples
///
/// ```
/// use uanode_client::QualifiedProperty;
///
/// const ENABLED: QualifiedProperty<bool> = QualifiedProperty::new(
///     "http://opcfoundation.org/UA/",
///     "Enabled",
///     "nsu=http://opcfoundation.org/UA/;i=1",
///     -1,
/// );
/// assert_eq!(ENABLED.browse_name(), "Enabled");
/// ```
pub struct QualifiedProperty<T> {
    namespace_uri: &'static str,
    browse_name: &'static str,
    data_type: &'static str,
    value_rank: i32,
    _value: PhantomData<fn() -> T>,
}

impl<T> Clone for QualifiedProperty<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for QualifiedProperty<T> {}

impl<T> std::fmt::Debug for QualifiedProperty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QualifiedProperty")
            .field("namespace_uri", &self.namespace_uri)
            .field("browse_name", &self.browse_name)
            .field("data_type", &self.data_type)
            .field("value_rank", &self.value_rank)
            .finish()
    }
}

impl<T> QualifiedProperty<T> {
    /// Creates a property descriptor.
    ///
    /// `data_type` is an expanded node id string such as
    /// `nsu=http://opcfoundation.org/UA/;i=12` or `ns=0;i=12`.
    pub const fn new(
        namespace_uri: &'static str,
        browse_name: &'static str,
        data_type: &'static str,
        value_rank: i32,
    ) -> Self {
        Self {
            namespace_uri,
            browse_name,
            data_type,
            value_rank,
            _value: PhantomData,
        }
    }

    /// Namespace URI of the browse name.
    pub const fn namespace_uri(&self) -> &'static str {
        self.namespace_uri
    }

    /// Browse name.
    pub const fn browse_name(&self) -> &'static str {
        self.browse_name
    }

    /// Declared data type as written in the type table.
    pub const fn data_type_str(&self) -> &'static str {
        self.data_type
    }

    /// Declared data type.
    pub fn data_type(&self) -> UaResult<ExpandedNodeId> {
        ExpandedNodeId::parse(self.data_type)
    }

    /// Declared value rank.
    pub const fn value_rank(&self) -> ValueRank {
        ValueRank(self.value_rank)
    }

    /// Member request locating this property under a node.
    pub fn member_request(&self) -> MemberRequest {
        MemberRequest::property(self.namespace_uri, self.browse_name)
    }
}

impl<T: PropertyValue> QualifiedProperty<T> {
    /// Returns the type-erased descriptor.
    pub const fn descriptor(&self) -> PropertyDescriptor {
        PropertyDescriptor {
            namespace_uri: self.namespace_uri,
            browse_name: self.browse_name,
            data_type: self.data_type,
            value_rank: self.value_rank,
            value_type: T::TYPE_NAME,
            is_array: T::IS_ARRAY,
        }
    }
}

/// Type-erased property descriptor, used in type tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Namespace URI of the browse name.
    pub namespace_uri: &'static str,
    /// Browse name.
    pub browse_name: &'static str,
    /// Declared data type string.
    pub data_type: &'static str,
    /// Declared value rank.
    pub value_rank: i32,
    /// Name of the Rust value type.
    pub value_type: &'static str,
    /// `true` for array-valued properties.
    pub is_array: bool,
}

impl PropertyDescriptor {
    /// Member request locating this property under a node.
    pub fn member_request(&self) -> MemberRequest {
        MemberRequest::property(self.namespace_uri, self.browse_name)
    }
}

// =============================================================================
// PropertyValue
// =============================================================================

/// Converts between a property's Rust value and its wire variant.
///
/// Implementations never see [`Variant::Empty`] at the top level; an empty
/// value is reported as absent before decoding.
pub trait PropertyValue: Send + Sync + 'static {
    /// The decoded value.
    type Output: Send + 'static;

    /// Name of the value type, for error messages.
    const TYPE_NAME: &'static str;

    /// `true` for array codecs.
    const IS_ARRAY: bool = false;

    /// Encodes a value.
    fn to_variant(&self, context: &EncodingContext) -> UaResult<Variant>;

    /// Decodes a value.
    fn from_variant(value: &Variant, context: &EncodingContext) -> UaResult<Self::Output>;
}

fn mismatch(expected: &str, actual: &Variant) -> UaError {
    if actual.is_array() {
        CoercionError::value_rank_mismatch(ValueRank::SCALAR.0, actual.type_name()).into()
    } else {
        UaError::type_mismatch(expected, actual.type_name())
    }
}

// =============================================================================
// Primitive Codecs
// =============================================================================

macro_rules! impl_integer_property {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl PropertyValue for $ty {
                type Output = $ty;
                const TYPE_NAME: &'static str = stringify!($variant);

                fn to_variant(&self, _: &EncodingContext) -> UaResult<Variant> {
                    Ok(Variant::$variant(*self))
                }

                fn from_variant(value: &Variant, _: &EncodingContext) -> UaResult<$ty> {
                    if let Variant::$variant(v) = value {
                        return Ok(*v);
                    }
                    let wide = value
                        .as_i64()
                        .ok_or_else(|| mismatch(Self::TYPE_NAME, value))?;
                    <$ty>::try_from(wide)
                        .map_err(|_| CoercionError::out_of_range(Self::TYPE_NAME, wide).into())
                }
            }
        )+
    };
}

impl_integer_property! {
    i8 => SByte,
    u8 => Byte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
}

macro_rules! impl_exact_property {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl PropertyValue for $ty {
                type Output = $ty;
                const TYPE_NAME: &'static str = stringify!($variant);

                fn to_variant(&self, _: &EncodingContext) -> UaResult<Variant> {
                    Ok(Variant::$variant(self.clone()))
                }

                fn from_variant(value: &Variant, _: &EncodingContext) -> UaResult<$ty> {
                    match value {
                        Variant::$variant(v) => Ok(v.clone()),
                        other => Err(mismatch(Self::TYPE_NAME, other)),
                    }
                }
            }
        )+
    };
}

impl_exact_property! {
    bool => Boolean,
    f32 => Float,
    String => String,
    DateTime<Utc> => DateTime,
    Uuid => Guid,
    ByteString => ByteString,
    StatusCode => StatusCode,
    NodeId => NodeId,
    QualifiedName => QualifiedName,
    LocalizedText => LocalizedText,
}

impl PropertyValue for f64 {
    type Output = f64;
    const TYPE_NAME: &'static str = "Double";

    fn to_variant(&self, _: &EncodingContext) -> UaResult<Variant> {
        Ok(Variant::Double(*self))
    }

    fn from_variant(value: &Variant, _: &EncodingContext) -> UaResult<f64> {
        match value {
            Variant::Double(v) => Ok(*v),
            Variant::Float(v) => Ok(f64::from(*v)),
            other => Err(mismatch(Self::TYPE_NAME, other)),
        }
    }
}

/// BaseDataType: any value, passed through untouched.
impl PropertyValue for Variant {
    type Output = Variant;
    const TYPE_NAME: &'static str = "BaseDataType";

    fn to_variant(&self, _: &EncodingContext) -> UaResult<Variant> {
        Ok(self.clone())
    }

    fn from_variant(value: &Variant, _: &EncodingContext) -> UaResult<Variant> {
        Ok(value.clone())
    }
}

// =============================================================================
// Enumeration Codecs
// =============================================================================

macro_rules! impl_enum_property {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl PropertyValue for $ty {
                type Output = Decoded<$ty>;
                const TYPE_NAME: &'static str = <$ty as UaEnumeration>::TYPE_NAME;

                fn to_variant(&self, _: &EncodingContext) -> UaResult<Variant> {
                    Ok(Variant::Int32(UaEnumeration::value(self)))
                }

                fn from_variant(value: &Variant, _: &EncodingContext) -> UaResult<Decoded<$ty>> {
                    if value.is_array() {
                        return Err(mismatch(<Self as PropertyValue>::TYPE_NAME, value));
                    }
                    Ok(Decoded::from_variant(value).unwrap_or_else(|| Decoded::Unknown(value.clone())))
                }
            }
        )+
    };
}

impl_enum_property!(MessageSecurityMode, ApplicationType);

// =============================================================================
// Structure Codecs
// =============================================================================

macro_rules! impl_structure_property {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl PropertyValue for $ty {
                type Output = $ty;
                const TYPE_NAME: &'static str = <$ty as UaStructure>::TYPE_NAME;

                fn to_variant(&self, context: &EncodingContext) -> UaResult<Variant> {
                    context.encode(self).map(Variant::ExtensionObject)
                }

                fn from_variant(value: &Variant, context: &EncodingContext) -> UaResult<$ty> {
                    match value {
                        Variant::ExtensionObject(envelope) => context.decode(envelope),
                        other => Err(mismatch(<Self as PropertyValue>::TYPE_NAME, other)),
                    }
                }
            }
        )+
    };
}

impl_structure_property!(Argument, KeyValuePair, TimeZoneDataType);

// =============================================================================
// Array Codec
// =============================================================================

impl<T: PropertyValue> PropertyValue for Vec<T> {
    type Output = Vec<T::Output>;
    const TYPE_NAME: &'static str = T::TYPE_NAME;
    const IS_ARRAY: bool = true;

    fn to_variant(&self, context: &EncodingContext) -> UaResult<Variant> {
        context.check_array_length(self.len())?;
        self.iter()
            .map(|item| item.to_variant(context))
            .collect::<UaResult<Vec<_>>>()
            .map(Variant::Array)
    }

    fn from_variant(value: &Variant, context: &EncodingContext) -> UaResult<Self::Output> {
        let items = value.as_array().ok_or_else(|| {
            UaError::from(CoercionError::value_rank_mismatch(
                ValueRank::ONE_DIMENSION.0,
                value.type_name(),
            ))
        })?;
        context.check_array_length(items.len())?;
        items
            .iter()
            .map(|item| T::from_variant(item, context))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use uanode_core::{EncodingLimits, NamespaceTable, UA_NAMESPACE_URI};

    fn ctx() -> EncodingContext {
        EncodingContext::default()
    }

    #[test]
    fn test_integer_widening_and_range() {
        assert_eq!(u32::from_variant(&Variant::UInt16(7), &ctx()).unwrap(), 7);
        assert_eq!(i64::from_variant(&Variant::UInt32(u32::MAX), &ctx()).unwrap(), u32::MAX as i64);

        let err = u8::from_variant(&Variant::Int32(300), &ctx()).unwrap_err();
        assert!(matches!(err, UaError::Coercion(CoercionError::OutOfRange { .. })));

        let err = u16::from_variant(&Variant::from("7"), &ctx()).unwrap_err();
        assert!(matches!(err, UaError::Coercion(CoercionError::TypeMismatch { .. })));
    }

    #[test]
    fn test_double_accepts_float() {
        assert_eq!(f64::from_variant(&Variant::Float(0.5), &ctx()).unwrap(), 0.5);
        assert!(f32::from_variant(&Variant::Double(0.5), &ctx()).is_err());
    }

    #[test]
    fn test_exact_codecs_are_strict() {
        assert!(String::from_variant(&Variant::from("abc"), &ctx()).is_ok());
        assert!(bool::from_variant(&Variant::Int32(1), &ctx()).is_err());
        assert!(NodeId::from_variant(&Variant::from("i=85"), &ctx()).is_err());
    }

    #[test]
    fn test_scalar_codec_rejects_array() {
        let err = bool::from_variant(&Variant::Array(vec![Variant::Boolean(true)]), &ctx()).unwrap_err();
        assert!(matches!(err, UaError::Coercion(CoercionError::ValueRankMismatch { declared: -1, .. })));
    }

    #[test]
    fn test_enum_codec() {
        let decoded = MessageSecurityMode::from_variant(&Variant::Int32(2), &ctx()).unwrap();
        assert_eq!(decoded, Decoded::Value(MessageSecurityMode::Sign));

        let unknown = MessageSecurityMode::from_variant(&Variant::Int32(99), &ctx()).unwrap();
        assert_eq!(unknown, Decoded::Unknown(Variant::Int32(99)));

        assert_eq!(
            ApplicationType::ClientAndServer.to_variant(&ctx()).unwrap(),
            Variant::Int32(2)
        );
    }

    #[test]
    fn test_structure_codec() {
        let pair = KeyValuePair::new(QualifiedName::new(0, "Mode"), Variant::from("fast"));
        let encoded = pair.to_variant(&ctx()).unwrap();
        assert!(matches!(encoded, Variant::ExtensionObject(_)));
        assert_eq!(KeyValuePair::from_variant(&encoded, &ctx()).unwrap(), pair);

        let err = Argument::from_variant(&encoded, &ctx()).unwrap_err();
        assert!(matches!(err, UaError::Encoding(_)));
    }

    #[test]
    fn test_array_codec() {
        let values = vec![1u32, 2, 3];
        let encoded = values.to_variant(&ctx()).unwrap();
        assert_eq!(Vec::<u32>::from_variant(&encoded, &ctx()).unwrap(), values);

        let empty: Vec<Argument> = Vec::new();
        let encoded = empty.to_variant(&ctx()).unwrap();
        assert_eq!(encoded, Variant::Array(Vec::new()));
        assert!(Vec::<Argument>::from_variant(&encoded, &ctx()).unwrap().is_empty());

        let err = Vec::<u32>::from_variant(&Variant::UInt32(1), &ctx()).unwrap_err();
        assert!(matches!(err, UaError::Coercion(CoercionError::ValueRankMismatch { declared: 1, .. })));
    }

    #[test]
    fn test_array_limit() {
        let limited = EncodingContext::new(
            NamespaceTable::new(),
            EncodingLimits {
                max_array_length: 2,
                ..EncodingLimits::default()
            },
        );
        assert!(vec![1i32, 2, 3].to_variant(&limited).is_err());
        let wire = Variant::Array(vec![Variant::Int32(1); 3]);
        assert!(Vec::<i32>::from_variant(&wire, &limited).is_err());
    }

    #[test]
    fn test_descriptor() {
        const ARGS: QualifiedProperty<Vec<Argument>> = QualifiedProperty::new(
            UA_NAMESPACE_URI,
            "InputArguments",
            "nsu=http://opcfoundation.org/UA/;i=296",
            1,
        );
        let descriptor = ARGS.descriptor();
        assert!(descriptor.is_array);
        assert_eq!(descriptor.value_type, "Argument");
        assert_eq!(ARGS.value_rank(), ValueRank::ONE_DIMENSION);
        assert_eq!(
            ARGS.data_type().unwrap().to_node_id(&NamespaceTable::new()).unwrap(),
            NodeId::numeric(0, 296)
        );
        assert!(ARGS.member_request().is_property);
    }
}
