// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use crate::xml::ns;

/// Namespace-qualified name of a `WebDAV` property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyName {
    /// XML namespace, e.g. `DAV:`. Empty for properties without one.
    pub namespace: String,
    /// Local name, e.g. `getcontentlength`.
    pub name: String,
}

impl PropertyName {
    /// Creates a property name.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Creates a property name in the `DAV:` namespace.
    #[must_use]
    pub fn dav(name: impl Into<String>) -> Self {
        Self::new(ns::DAV, name)
    }

    /// The `public_url` property used to publish resources.
    #[must_use]
    pub fn public_url() -> Self {
        Self::new(ns::DISK_META, "public_url")
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.namespace, self.name)
    }
}

/// Metadata of a remote resource, as reported by PROPFIND.
///
/// Fields the server did not report are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceInfo {
    /// Creation date (`creationdate`).
    pub created: Option<String>,
    /// Display name (`displayname`).
    pub name: Option<String>,
    /// Size in bytes (`getcontentlength`).
    pub size: Option<u64>,
    /// Last modification date (`getlastmodified`).
    pub modified: Option<String>,
    /// Whether the resource is a collection (`resourcetype`).
    pub is_directory: bool,
}
