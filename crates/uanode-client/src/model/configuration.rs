// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application configuration types.

use uanode_core::{ApplicationType, UA_NAMESPACE_URI};

ua_object_type! {
    /// Configuration of an application managed through the address space.
    ApplicationConfigurationType(25731) {
        namespace: UA_NAMESPACE_URI,
        /// Application URI.
        APPLICATION_URI application_uri: String = ("ApplicationUri", "nsu=http://opcfoundation.org/UA/;i=23751", -1),
        /// Product URI.
        PRODUCT_URI product_uri: String = ("ProductUri", "nsu=http://opcfoundation.org/UA/;i=23751", -1),
        /// Role of the application.
        APPLICATION_TYPE application_type: ApplicationType = ("ApplicationType", "ns=0;i=307", -1),
        /// Whether the configuration is active.
        ENABLED enabled: bool = ("Enabled", "ns=0;i=1", -1),
    }
}
