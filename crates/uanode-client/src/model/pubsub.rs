// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! PubSub types.

use uanode_core::{KeyValuePair, MessageSecurityMode, Variant, UA_NAMESPACE_URI};

ua_object_type! {
    /// A PubSub connection.
    PubSubConnectionType(14209) {
        namespace: UA_NAMESPACE_URI,
        /// Publisher id; any scalar data type.
        PUBLISHER_ID publisher_id: Variant = ("PublisherId", "ns=0;i=24", -1),
        /// Vendor specific connection properties.
        CONNECTION_PROPERTIES connection_properties: Vec<KeyValuePair> = ("ConnectionProperties", "ns=0;i=14533", 1),
    }
}

// SecurityKeyServices (EndpointDescription[]) is not in this table; the
// EndpointDescription structure is not modeled.
ua_object_type! {
    /// A writer or reader group.
    PubSubGroupType(14232) {
        namespace: UA_NAMESPACE_URI,
        /// Security applied to group messages.
        SECURITY_MODE security_mode: MessageSecurityMode = ("SecurityMode", "ns=0;i=302", -1),
        /// Security group providing the keys.
        SECURITY_GROUP_ID security_group_id: String = ("SecurityGroupId", "ns=0;i=12", -1),
        /// Maximum size of a network message.
        MAX_NETWORK_MESSAGE_SIZE max_network_message_size: u32 = ("MaxNetworkMessageSize", "ns=0;i=7", -1),
        /// Vendor specific group properties.
        GROUP_PROPERTIES group_properties: Vec<KeyValuePair> = ("GroupProperties", "ns=0;i=14533", 1),
    }
}
