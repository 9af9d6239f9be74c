// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Namespace table.

use serde::{Deserialize, Serialize};

/// URI of the OPC UA standard namespace (index 0).
pub const UA_NAMESPACE_URI: &str = "http://opcfoundation.org/UA/";

/// Ordered list of namespace URIs; the position of a URI is its index.
///
/// Index 0 is always the OPC UA standard namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct NamespaceTable {
    uris: Vec<String>,
}

impl NamespaceTable {
    /// Creates a table holding only the standard namespace.
    pub fn new() -> Self {
        Self {
            uris: vec![UA_NAMESPACE_URI.to_string()],
        }
    }

    /// Creates a table from a server namespace array.
    ///
    /// Returns `None` if the first entry is not the standard namespace.
    pub fn from_uris(uris: Vec<String>) -> Option<Self> {
        match uris.first() {
            Some(first) if first == UA_NAMESPACE_URI => Some(Self { uris }),
            _ => None,
        }
    }

    /// Returns the index of the given URI.
    pub fn index_of(&self, uri: &str) -> Option<u16> {
        self.uris
            .iter()
            .position(|u| u == uri)
            .and_then(|i| u16::try_from(i).ok())
    }

    /// Returns the URI at the given index.
    pub fn uri_of(&self, index: u16) -> Option<&str> {
        self.uris.get(index as usize).map(String::as_str)
    }

    /// Registers a URI and returns its index.
    ///
    /// Registering a URI that is already present returns its existing index.
    pub fn register(&mut self, uri: impl Into<String>) -> u16 {
        let uri = uri.into();
        if let Some(index) = self.index_of(&uri) {
            return index;
        }
        self.uris.push(uri);
        (self.uris.len() - 1) as u16
    }

    /// Returns the number of registered namespaces.
    #[inline]
    pub fn len(&self) -> usize {
        self.uris.len()
    }

    /// Always `false`; the standard namespace is always present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }

    /// Iterates over the URIs in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.uris.iter().map(String::as_str)
    }
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<String>> for NamespaceTable {
    type Error = String;

    fn try_from(uris: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_uris(uris)
            .ok_or_else(|| format!("namespace 0 must be '{}'", UA_NAMESPACE_URI))
    }
}

impl From<NamespaceTable> for Vec<String> {
    fn from(table: NamespaceTable) -> Self {
        table.uris
    }
}
