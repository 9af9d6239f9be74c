// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Event types.

use chrono::{DateTime, Utc};
use uanode_core::{ByteString, LocalizedText, NodeId, TimeZoneDataType, UA_NAMESPACE_URI};

ua_object_type! {
    /// The base type of all events.
    BaseEventType(2041) {
        namespace: UA_NAMESPACE_URI,
        /// Unique identifier of the event occurrence.
        EVENT_ID event_id: ByteString = ("EventId", "nsu=http://opcfoundation.org/UA/;i=15", -1),
        /// Type definition of the event.
        EVENT_TYPE event_type: NodeId = ("EventType", "nsu=http://opcfoundation.org/UA/;i=17", -1),
        /// Node that originated the event.
        SOURCE_NODE source_node: NodeId = ("SourceNode", "nsu=http://opcfoundation.org/UA/;i=17", -1),
        /// Description of the source.
        SOURCE_NAME source_name: String = ("SourceName", "nsu=http://opcfoundation.org/UA/;i=12", -1),
        /// Time the event occurred.
        TIME time: DateTime<Utc> = ("Time", "nsu=http://opcfoundation.org/UA/;i=294", -1),
        /// Time the server received the event.
        RECEIVE_TIME receive_time: DateTime<Utc> = ("ReceiveTime", "nsu=http://opcfoundation.org/UA/;i=294", -1),
        /// Offset to local time at the source.
        LOCAL_TIME local_time: TimeZoneDataType = ("LocalTime", "nsu=http://opcfoundation.org/UA/;i=8912", -1),
        /// Human readable description.
        MESSAGE message: LocalizedText = ("Message", "nsu=http://opcfoundation.org/UA/;i=21", -1),
        /// Urgency, from 1 to 1000.
        SEVERITY severity: u16 = ("Severity", "nsu=http://opcfoundation.org/UA/;i=5", -1),
        /// Condition class.
        CONDITION_CLASS_ID condition_class_id: NodeId = ("ConditionClassId", "nsu=http://opcfoundation.org/UA/;i=17", -1),
        /// Name of the condition class.
        CONDITION_CLASS_NAME condition_class_name: LocalizedText = ("ConditionClassName", "nsu=http://opcfoundation.org/UA/;i=21", -1),
        /// Condition sub classes.
        CONDITION_SUB_CLASS_ID condition_sub_class_id: Vec<NodeId> = ("ConditionSubClassId", "nsu=http://opcfoundation.org/UA/;i=17", 1),
        /// Names of the condition sub classes.
        CONDITION_SUB_CLASS_NAME condition_sub_class_name: Vec<LocalizedText> = ("ConditionSubClassName", "nsu=http://opcfoundation.org/UA/;i=21", 1),
    }
}

ua_object_type! {
    /// Events generated for auditing.
    AuditEventType(2052): BaseEventType {
        namespace: UA_NAMESPACE_URI,
        /// Time the audited action was requested.
        ACTION_TIME_STAMP action_time_stamp: DateTime<Utc> = ("ActionTimeStamp", "nsu=http://opcfoundation.org/UA/;i=294", -1),
        /// Whether the action succeeded.
        STATUS status: bool = ("Status", "nsu=http://opcfoundation.org/UA/;i=1", -1),
        /// Server that generated the event.
        SERVER_ID server_id: String = ("ServerId", "nsu=http://opcfoundation.org/UA/;i=12", -1),
        /// Audit entry id supplied by the client.
        CLIENT_AUDIT_ENTRY_ID client_audit_entry_id: String = ("ClientAuditEntryId", "nsu=http://opcfoundation.org/UA/;i=12", -1),
        /// User that performed the action.
        CLIENT_USER_ID client_user_id: String = ("ClientUserId", "nsu=http://opcfoundation.org/UA/;i=12", -1),
    }
}
