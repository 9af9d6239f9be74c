// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # uanode-client
//!
//! Typed access to the properties of OPC UA nodes.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  model::*  (ApplicationConfigurationType, BaseEventType…)  │
//! │            one table row per property                      │
//! └───────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │  PropertyAccessor<T>   get / set / read / write / *_async  │
//! │  PropertyValue codecs  Variant <-> T                       │
//! └───────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │  UaNode   cached Value, cached attributes, member cache    │
//! └───────────────────────────────────────────────────────────┘
//!                 │                              │
//!                 ▼                              ▼
//!        AttributeChannel                  NodeResolver
//!        (read/write attribute)            (locate members)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use uanode_client::prelude::*;
//!
//! let context = ClientContext::builder()
//!     .channel(channel)
//!     .resolver(BrowseResolver::new(browse, namespaces))
//!     .build()?;
//! let node = context.node(node_id, NodeClass::Object, QualifiedName::new(1, "App"));
//! let config = ApplicationConfigurationType::new(node);
//!
//! config.enabled().write(true)?;
//! assert_eq!(config.enabled().get()?, Some(true));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod accessor;
pub mod blocking;
pub mod channel;
pub mod context;
pub mod model;
pub mod node;
pub mod property;
pub mod resolver;

pub use accessor::PropertyAccessor;
pub use blocking::{BlockingRuntime, Interrupter};
pub use channel::{AttributeChannel, ChannelStatistics, InstrumentedChannel};
pub use context::{AccessorStatistics, ClientContext, ClientContextBuilder, StatisticsSnapshot};
pub use node::{CachedMember, UaNode};
pub use property::{PropertyDescriptor, PropertyValue, QualifiedProperty};
pub use resolver::{
    BrowseDescription, BrowseResolver, BrowseService, BrowseStatistics, MemberKey, MemberRequest,
    NodeResolver, ReferenceDescription, ResolvedNode,
};

/// Commonly used items.
pub mod prelude {
    pub use crate::accessor::PropertyAccessor;
    pub use crate::blocking::Interrupter;
    pub use crate::channel::AttributeChannel;
    pub use crate::context::ClientContext;
    pub use crate::model::*;
    pub use crate::node::UaNode;
    pub use crate::property::{PropertyValue, QualifiedProperty};
    pub use crate::resolver::{BrowseResolver, BrowseService, MemberRequest, NodeResolver};
    pub use uanode_core::{
        Decoded, NodeClass, NodeId, QualifiedName, StatusCode, UaError, UaResult, Variant,
    };
}
