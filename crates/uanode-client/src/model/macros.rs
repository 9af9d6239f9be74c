// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Declarative type tables.
//!
//! `ua_object_type!` turns a property table into a typed wrapper:
//!
//! ```text
//! ua_object_type! {
//!     /// Docs for the type.
//!     SecurityGroupType(15471) {
//!         namespace: UA_NAMESPACE_URI,
//!         /// Docs for the property.
//!         SECURITY_GROUP_ID security_group_id: String = ("SecurityGroupId", "ns=0;i=12", -1),
//!     }
//! }
//! ```
//!
//! For each row the wrapper gets a `QualifiedProperty` constant and an
//! accessor method. A `: Parent` suffix links the parent's
//! [`TypeInfo`](super::TypeInfo) and adds a `base()` view of the node as
//! the parent type.

macro_rules! ua_object_type {
    (@type_definition) => { None };
    (@type_definition $id:literal) => { Some(::uanode_core::NodeId::numeric(0, $id)) };

    (@parent) => { None };
    (@parent $parent:ident) => { Some($parent::type_info as fn() -> &'static $crate::model::TypeInfo) };

    (
        $(#[$meta:meta])*
        $name:ident $(($type_id:literal))? $(: $parent:ident)? {
            namespace: $namespace:expr,
            $(
                $(#[$pmeta:meta])*
                $konst:ident $method:ident : $ty:ty = ($browse_name:literal, $data_type:literal, $rank:literal)
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            node: ::std::sync::Arc<$crate::node::UaNode>,
        }

        impl $name {
            /// Browse name of the type definition.
            pub const TYPE_NAME: &'static str = stringify!($name);

            /// Node id of the type definition, if it has one.
            pub const TYPE_DEFINITION: Option<::uanode_core::NodeId> =
                ua_object_type!(@type_definition $($type_id)?);

            $(
                $(#[$pmeta])*
                pub const $konst: $crate::property::QualifiedProperty<$ty> =
                    $crate::property::QualifiedProperty::new(
                        $namespace,
                        $browse_name,
                        $data_type,
                        $rank,
                    );
            )*

            /// Properties declared directly on this type.
            pub const PROPERTIES: &'static [$crate::property::PropertyDescriptor] =
                &[$($name::$konst.descriptor()),*];

            /// Returns the type's table entry.
            pub fn type_info() -> &'static $crate::model::TypeInfo {
                static INFO: $crate::model::TypeInfo = $crate::model::TypeInfo {
                    browse_name: $name::TYPE_NAME,
                    type_definition: $name::TYPE_DEFINITION,
                    parent: ua_object_type!(@parent $($parent)?),
                    properties: $name::PROPERTIES,
                };
                &INFO
            }

            /// Wraps a node proxy.
            pub fn new(node: ::std::sync::Arc<$crate::node::UaNode>) -> Self {
                Self { node }
            }

            /// Returns the wrapped node proxy.
            pub fn node(&self) -> &::std::sync::Arc<$crate::node::UaNode> {
                &self.node
            }

            $(
                /// Views this node as its parent type.
                pub fn base(&self) -> $parent {
                    $parent::new(::std::sync::Arc::clone(&self.node))
                }
            )?

            $(
                $(#[$pmeta])*
                #[doc = ""]
                #[doc = concat!("Accessor for the `", $browse_name, "` property.")]
                pub fn $method(&self) -> $crate::accessor::PropertyAccessor<'_, $ty> {
                    $crate::accessor::PropertyAccessor::new(&self.node, $name::$konst)
                }
            )*
        }

        impl From<::std::sync::Arc<$crate::node::UaNode>> for $name {
            fn from(node: ::std::sync::Arc<$crate::node::UaNode>) -> Self {
                Self::new(node)
            }
        }
    };
}
