// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Method nodes.

use uanode_core::{Argument, UA_NAMESPACE_URI};

ua_object_type! {
    /// A method and its argument descriptions.
    MethodNode {
        namespace: UA_NAMESPACE_URI,
        /// Arguments the method accepts.
        INPUT_ARGUMENTS input_arguments: Vec<Argument> = ("InputArguments", "ns=0;i=296", 1),
        /// Arguments the method returns.
        OUTPUT_ARGUMENTS output_arguments: Vec<Argument> = ("OutputArguments", "ns=0;i=296", 1),
    }
}
