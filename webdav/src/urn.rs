// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Canonical remote resource identifiers.

use std::borrow::Cow;
use std::fmt;

/// Path separator used by remote identifiers.
pub const SEPARATOR: char = '/';

/// Canonical path to a remote resource.
///
/// An `Urn` is built from a user-supplied path such as `docs//report 1.txt`
/// and always holds a percent-encoded absolute path (`/docs/report%201.txt`).
/// Repeated separators are collapsed and `.`/`..` segments are resolved
/// against the root, so an identifier can never point above `/`. Together
/// with the client's server root this confines every request to a subtree
/// of the server.
///
/// Directory identifiers end with a separator, file identifiers never do.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Urn(String);

impl Urn {
    /// Creates an identifier from a raw path.
    ///
    /// A trailing separator in `raw` is kept, so `"/docs/"` denotes a
    /// directory while `"/docs"` does not.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self::with_kind(raw, false)
    }

    /// Creates a directory identifier, appending a trailing separator if
    /// `raw` lacks one.
    #[must_use]
    pub fn directory(raw: &str) -> Self {
        Self::with_kind(raw, true)
    }

    /// Creates an identifier, forcing a trailing separator when `directory`
    /// is set.
    #[must_use]
    pub fn with_kind(raw: &str, directory: bool) -> Self {
        let mut segments: Vec<&str> = Vec::new();
        for segment in raw.split(SEPARATOR) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                segment => segments.push(segment),
            }
        }

        let mut path = String::with_capacity(raw.len() + 2);
        for segment in segments {
            path.push(SEPARATOR);
            path.push_str(&urlencoding::encode(segment));
        }

        if path.is_empty() || directory || raw.ends_with(SEPARATOR) {
            path.push(SEPARATOR);
        }

        Self(path)
    }

    /// Returns the root identifier `/`.
    #[must_use]
    pub fn root() -> Self {
        Self(SEPARATOR.to_string())
    }

    /// Returns the decoded path, for display and for comparisons.
    #[must_use]
    pub fn path(&self) -> String {
        decode(&self.0).into_owned()
    }

    /// Returns the percent-encoded path, as used inside URLs.
    #[must_use]
    pub fn raw_path(&self) -> &str {
        &self.0
    }

    /// Returns the decoded last segment.
    ///
    /// Directories keep their trailing separator: `/a/b/c/` yields `c/`.
    #[must_use]
    pub fn filename(&self) -> String {
        let trimmed = self.0.strip_suffix(SEPARATOR).unwrap_or(&self.0);
        let name = trimmed.rsplit(SEPARATOR).next().unwrap_or_default();
        let mut name = decode(name).into_owned();
        if self.is_directory() {
            name.push(SEPARATOR);
        }
        name
    }

    /// Returns the decoded path of the enclosing directory, always
    /// separator-terminated. The parent of the root is the root.
    #[must_use]
    pub fn parent(&self) -> String {
        let trimmed = self.0.strip_suffix(SEPARATOR).unwrap_or(&self.0);
        match trimmed.rsplit_once(SEPARATOR) {
            Some((head, _)) => {
                let mut parent = decode(head).into_owned();
                parent.push(SEPARATOR);
                parent
            }
            None => SEPARATOR.to_string(),
        }
    }

    /// Returns the number of separators, not counting a trailing one.
    #[must_use]
    pub fn nesting_level(&self) -> usize {
        self.0
            .chars()
            .rev()
            .skip(1)
            .filter(|&c| c == SEPARATOR)
            .count()
    }

    /// Whether this identifier denotes a directory.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.0.ends_with(SEPARATOR)
    }

    /// Whether this identifier is the root `/`.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// Returns the identifier of a child of this one.
    ///
    /// A trailing separator on `name` makes the child a directory.
    #[must_use]
    pub fn join(&self, name: &str) -> Self {
        let mut parent = self.path();
        if !parent.ends_with(SEPARATOR) {
            parent.push(SEPARATOR);
        }
        Self::new(&format!("{parent}{name}"))
    }
}

impl Default for Urn {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        decode(&self.0).fmt(f)
    }
}

impl From<&str> for Urn {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Urn {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

/// Percent-decodes `encoded`, replacing invalid UTF-8 lossily.
pub(crate) fn decode(encoded: &str) -> Cow<'_, str> {
    match urlencoding::decode_binary(encoded.as_bytes()) {
        Cow::Borrowed(_) => Cow::Borrowed(encoded),
        Cow::Owned(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urn_collapses_separators_and_forces_leading_one() {
        assert_eq!(Urn::new("a//b").raw_path(), "/a/b");
        assert_eq!(Urn::new("///").raw_path(), "/");
        assert_eq!(Urn::new("").raw_path(), "/");
    }

    #[test]
    fn urn_encodes_segments_but_keeps_separators() {
        let urn = Urn::new("/my docs/ü.txt");
        assert_eq!(urn.raw_path(), "/my%20docs/%C3%BC.txt");
        assert_eq!(urn.path(), "/my docs/ü.txt");
    }

    #[test]
    fn urn_dot_segments_never_climb_above_root() {
        assert_eq!(Urn::new("../user2/secret").path(), "/user2/secret");
        assert_eq!(Urn::new("/a/./b/../../..").path(), "/");
    }

    #[test]
    fn urn_decode_leaves_plain_paths_borrowed() {
        assert!(matches!(decode("/plain/path"), Cow::Borrowed(_)));
    }
}
