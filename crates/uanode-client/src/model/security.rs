// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Security key management types.

use uanode_core::{StatusCode, UA_NAMESPACE_URI};

ua_object_type! {
    /// A group of PubSub security keys.
    SecurityGroupType(15471) {
        namespace: UA_NAMESPACE_URI,
        /// Identifier of the group.
        SECURITY_GROUP_ID security_group_id: String = ("SecurityGroupId", "ns=0;i=12", -1),
        /// Lifetime of a key, a `Duration` (i=290) counted in milliseconds.
        KEY_LIFETIME key_lifetime: f64 = ("KeyLifetime", "ns=0;i=290", -1),
        /// Security policy of the keys.
        SECURITY_POLICY_URI security_policy_uri: String = ("SecurityPolicyUri", "ns=0;i=12", -1),
        /// Number of future keys returned.
        MAX_FUTURE_KEY_COUNT max_future_key_count: u32 = ("MaxFutureKeyCount", "ns=0;i=7", -1),
        /// Number of past keys kept.
        MAX_PAST_KEY_COUNT max_past_key_count: u32 = ("MaxPastKeyCount", "ns=0;i=7", -1),
    }
}

ua_object_type! {
    /// Credentials used to access an external resource.
    KeyCredentialConfigurationType(18001) {
        namespace: UA_NAMESPACE_URI,
        /// Resource the credential grants access to.
        RESOURCE_URI resource_uri: String = ("ResourceUri", "ns=0;i=12", -1),
        /// Profile of the credential.
        PROFILE_URI profile_uri: String = ("ProfileUri", "ns=0;i=12", -1),
        /// Endpoints of the resource.
        ENDPOINT_URLS endpoint_urls: Vec<String> = ("EndpointUrls", "ns=0;i=12", 1),
        /// Result of the last credential update.
        SERVICE_STATUS service_status: StatusCode = ("ServiceStatus", "ns=0;i=19", -1),
    }
}
