// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Enumerated data types and permissive enum decoding.
//!
//! Enumerations travel as `Int32` values. A value may also arrive already
//! named, in the `Name_Value` string form used by the non-reversible JSON
//! encoding. Values this client does not know are kept as
//! [`Decoded::Unknown`] instead of failing the read.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node_id::NodeId;
use crate::variant::Variant;

// =============================================================================
// UaEnumeration
// =============================================================================

/// An OPC UA enumerated data type.
pub trait UaEnumeration: Copy + Send + Sync + 'static {
    /// Enumeration type name.
    const TYPE_NAME: &'static str;

    /// Node id of the enumeration's data type.
    const DATA_TYPE_ID: NodeId;

    /// Looks up a member by its numeric value.
    fn from_value(value: i32) -> Option<Self>;

    /// Returns the numeric value.
    fn value(&self) -> i32;

    /// Returns the member name.
    fn name(&self) -> &'static str;
}

// =============================================================================
// Decoded
// =============================================================================

/// Outcome of decoding a present enumeration value.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<E> {
    /// A known member.
    Value(E),
    /// A value this client does not recognize, kept as received.
    Unknown(Variant),
}

impl<E: UaEnumeration> Decoded<E> {
    /// Decodes a variant permissively.
    ///
    /// Returns `None` for an empty variant. Integers and `Name_Value`
    /// strings naming a known member decode to [`Decoded::Value`];
    /// everything else is [`Decoded::Unknown`].
    pub fn from_variant(value: &Variant) -> Option<Self> {
        if value.is_empty() {
            return None;
        }

        let known = match value {
            Variant::String(s) => s.rsplit_once('_').and_then(|(name, n)| {
                n.parse::<i32>()
                    .ok()
                    .and_then(E::from_value)
                    .filter(|member| member.name() == name)
            }),
            other => other
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .and_then(E::from_value),
        };

        Some(match known {
            Some(member) => Self::Value(member),
            None => Self::Unknown(value.clone()),
        })
    }

    /// Returns the known member, if any.
    pub fn value(&self) -> Option<E> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Unknown(_) => None,
        }
    }

    /// Returns `true` if the value was not recognized.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl<E: UaEnumeration> From<E> for Decoded<E> {
    fn from(value: E) -> Self {
        Self::Value(value)
    }
}

// =============================================================================
// Enumerations
// =============================================================================

macro_rules! ua_enumeration {
    (
        $(#[$meta:meta])*
        $name:ident = $data_type:literal {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[repr(i32)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value),+
        }

        impl UaEnumeration for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            const DATA_TYPE_ID: NodeId = NodeId::numeric(0, $data_type);

            fn from_value(value: i32) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }

            fn value(&self) -> i32 {
                *self as i32
            }

            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}_{}", self.name(), self.value())
            }
        }
    };
}

ua_enumeration! {
    /// Security applied to messages on a channel or in a PubSub group.
    MessageSecurityMode = 302 {
        /// Invalid.
        Invalid = 0,
        /// No security.
        None = 1,
        /// Signed.
        Sign = 2,
        /// Signed and encrypted.
        SignAndEncrypt = 3,
    }
}

ua_enumeration! {
    /// Role of an application.
    ApplicationType = 307 {
        /// Server.
        Server = 0,
        /// Client.
        Client = 1,
        /// Client and server.
        ClientAndServer = 2,
        /// Discovery server.
        DiscoveryServer = 3,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_integer_decodes() {
        let decoded = Decoded::<MessageSecurityMode>::from_variant(&Variant::Int32(3));
        assert_eq!(decoded, Some(Decoded::Value(MessageSecurityMode::SignAndEncrypt)));
    }

    #[test]
    fn test_other_integer_widths_decode() {
        let decoded = Decoded::<ApplicationType>::from_variant(&Variant::UInt32(1));
        assert_eq!(decoded.and_then(|d| d.value()), Some(ApplicationType::Client));
    }

    #[test]
    fn test_named_form_decodes() {
        let decoded = Decoded::<MessageSecurityMode>::from_variant(&Variant::from("Sign_2"));
        assert_eq!(decoded, Some(Decoded::Value(MessageSecurityMode::Sign)));
    }

    #[test]
    fn test_named_form_with_wrong_name_is_unknown() {
        let raw = Variant::from("Bogus_2");
        let decoded = Decoded::<MessageSecurityMode>::from_variant(&raw).unwrap();
        assert_eq!(decoded, Decoded::Unknown(raw));

        let swapped = Variant::from("SignAndEncrypt_2");
        assert!(Decoded::<MessageSecurityMode>::from_variant(&swapped).unwrap().is_unknown());
    }

    #[test]
    fn test_unknown_value_is_kept() {
        let raw = Variant::Int32(42);
        let decoded = Decoded::<MessageSecurityMode>::from_variant(&raw).unwrap();
        assert!(decoded.is_unknown());
        assert_eq!(decoded, Decoded::Unknown(raw));

        let text = Decoded::<ApplicationType>::from_variant(&Variant::from("whatever")).unwrap();
        assert!(text.is_unknown());
    }

    #[test]
    fn test_empty_is_absent() {
        assert_eq!(Decoded::<ApplicationType>::from_variant(&Variant::Empty), None);
    }

    #[test]
    fn test_display_and_metadata() {
        assert_eq!(MessageSecurityMode::SignAndEncrypt.to_string(), "SignAndEncrypt_3");
        assert_eq!(ApplicationType::DATA_TYPE_ID, NodeId::numeric(0, 307));
        assert_eq!(MessageSecurityMode::TYPE_NAME, "MessageSecurityMode");
    }
}
