// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Standard structures carried in extension objects.

use serde::{Deserialize, Serialize};

use crate::encoding::UaStructure;
use crate::node_id::NodeId;
use crate::types::{LocalizedText, QualifiedName, ValueRank};
use crate::variant::Variant;

// =============================================================================
// KeyValuePair
// =============================================================================

/// A named value, used for connection and group properties.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyValuePair {
    /// Key.
    pub key: QualifiedName,
    /// Value.
    pub value: Variant,
}

impl KeyValuePair {
    /// Creates a new pair.
    pub fn new(key: QualifiedName, value: impl Into<Variant>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

impl UaStructure for KeyValuePair {
    const TYPE_NAME: &'static str = "KeyValuePair";
    const DATA_TYPE_ID: NodeId = NodeId::numeric(0, 14533);
    const ENCODING_ID: NodeId = NodeId::numeric(0, 15041);
}

// =============================================================================
// Argument
// =============================================================================

/// Describes one input or output argument of a method.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Argument {
    /// Argument name.
    pub name: String,
    /// Data type node id.
    pub data_type: NodeId,
    /// Value rank.
    pub value_rank: i32,
    /// Array dimensions, empty for scalars.
    #[serde(default)]
    pub array_dimensions: Vec<u32>,
    /// Description.
    #[serde(default)]
    pub description: LocalizedText,
}

impl Argument {
    /// Creates a scalar argument.
    pub fn scalar(name: impl Into<String>, data_type: NodeId, description: LocalizedText) -> Self {
        Self {
            name: name.into(),
            data_type,
            value_rank: ValueRank::SCALAR.0,
            array_dimensions: Vec::new(),
            description,
        }
    }

    /// Creates a one-dimensional array argument of unbounded length.
    pub fn array(name: impl Into<String>, data_type: NodeId, description: LocalizedText) -> Self {
        Self {
            name: name.into(),
            data_type,
            value_rank: ValueRank::ONE_DIMENSION.0,
            array_dimensions: vec![0],
            description,
        }
    }
}

impl UaStructure for Argument {
    const TYPE_NAME: &'static str = "Argument";
    const DATA_TYPE_ID: NodeId = NodeId::numeric(0, 296);
    const ENCODING_ID: NodeId = NodeId::numeric(0, 15081);
}

// =============================================================================
// TimeZoneDataType
// =============================================================================

/// Offset from UTC in minutes at the time of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimeZoneDataType {
    /// Offset in minutes.
    pub offset: i16,
    /// Whether daylight saving time is included in the offset.
    pub daylight_saving_in_offset: bool,
}

impl TimeZoneDataType {
    /// Creates a new time zone value.
    pub fn new(offset: i16, daylight_saving_in_offset: bool) -> Self {
        Self {
            offset,
            daylight_saving_in_offset,
        }
    }
}

impl UaStructure for TimeZoneDataType {
    const TYPE_NAME: &'static str = "TimeZoneDataType";
    const DATA_TYPE_ID: NodeId = NodeId::numeric(0, 8912);
    const ENCODING_ID: NodeId = NodeId::numeric(0, 15086);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_are_pascal_case() {
        let json = serde_json::to_value(TimeZoneDataType::new(-300, false)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Offset": -300, "DaylightSavingInOffset": false})
        );
    }

    #[test]
    fn test_argument_constructors() {
        let scalar = Argument::scalar("In", NodeId::numeric(0, 1), LocalizedText::default());
        assert_eq!(scalar.value_rank, -1);
        assert!(scalar.array_dimensions.is_empty());

        let array = Argument::array("Out", NodeId::numeric(0, 12), LocalizedText::default());
        assert_eq!(array.value_rank, 1);
        assert_eq!(array.array_dimensions, vec![0]);
    }

    #[test]
    fn test_argument_accepts_missing_optional_fields() {
        let json = serde_json::json!({
            "Name": "Count",
            "DataType": {"namespace_index": 0, "identifier": {"type": "Numeric", "value": 7}},
            "ValueRank": -1
        });
        let argument: Argument = serde_json::from_value(json).unwrap();
        assert_eq!(argument.data_type, NodeId::numeric(0, 7));
        assert_eq!(argument.description, LocalizedText::default());
    }
}
