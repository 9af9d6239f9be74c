// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # uanode-core
//!
//! Built-in OPC UA types shared by the typed node accessor.
//!
//! ## Modules
//!
//! - [`node_id`]: `NodeId`, `ExpandedNodeId` and well-known node ids
//! - [`namespace`]: namespace table
//! - [`types`]: qualified names, localized text, attribute ids, node classes
//! - [`status`]: status codes
//! - [`variant`]: `Variant` and `DataValue`
//! - [`encoding`]: extension objects and the shared encoding context
//! - [`structures`]: `KeyValuePair`, `Argument`, `TimeZoneDataType`
//! - [`enums`]: enumerated data types and permissive decoding
//! - [`error`]: the error hierarchy

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod encoding;
pub mod enums;
pub mod error;
pub mod namespace;
pub mod node_id;
pub mod status;
pub mod structures;
pub mod types;
pub mod variant;

pub use encoding::{EncodingContext, EncodingLimits, ExtensionBody, ExtensionObject, UaStructure};
pub use enums::{ApplicationType, Decoded, MessageSecurityMode, UaEnumeration};
pub use error::{
    CoercionError, ConfigurationError, EncodingError, ErrorCode, ErrorSeverity, InterruptedError,
    NodeAbsentError, ServiceError, UaError, UaErrorContext, UaResult, UnexpectedError,
};
pub use namespace::{NamespaceTable, UA_NAMESPACE_URI};
pub use node_id::{reference_types, type_definitions, ExpandedNodeId, NamespaceRef, NodeId, NodeIdentifier};
pub use status::StatusCode;
pub use structures::{Argument, KeyValuePair, TimeZoneDataType};
pub use types::{AttributeId, LocalizedText, NodeClass, QualifiedName, ValueRank};
pub use variant::{ByteString, DataValue, Variant};
