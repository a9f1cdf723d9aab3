// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

/// `WebDAV` client errors.
///
/// Every public operation either succeeds or fails with exactly one of these
/// variants; nothing is retried automatically.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum WebDavError {
    /// A local file or directory does not exist.
    #[error("Local file: {} not found", .0.display())]
    LocalResourceNotFound(PathBuf),

    /// A remote resource does not exist.
    #[error("Remote resource: {0} not found")]
    RemoteResourceNotFound(String),

    /// The parent collection of a remote resource does not exist.
    #[error("Remote parent for: {0} not found")]
    RemoteParentNotFound(String),

    /// An operation parameter or transport option is invalid.
    #[error("Option ({name}={value}) have invalid name or value")]
    OptionNotValid {
        /// Name of the offending option.
        name: String,
        /// Value that was rejected.
        value: String,
    },

    /// The server certificate was rejected.
    #[error("Certificate not valid: {0}")]
    CertificateNotValid(String),

    /// The server could not be reached.
    #[error("Not connection with {hostname}: {reason}")]
    NotConnection {
        /// Server the request was sent to.
        hostname: String,
        /// Diagnostic text from the transport.
        reason: String,
    },

    /// The server answered `507 Insufficient Storage`.
    #[error("Not enough space on the server")]
    NotEnoughSpace,

    /// The server does not implement the requested method.
    #[error("Method {name} not supported for {server}")]
    MethodNotSupported {
        /// HTTP method name.
        name: String,
        /// Server the request was sent to.
        server: String,
    },

    /// The server answered `500 Internal Server Error`.
    #[error("Internal Server Error: Permission Problem?")]
    InternalServerError,

    /// Any other failure: unexpected status, malformed response, local I/O.
    #[error("Unhandled error: {0}")]
    UnhandledError(String),

    /// A spawned transfer was cancelled before it finished.
    #[error("Transfer cancelled")]
    Cancelled,
}

impl WebDavError {
    /// Creates an [`WebDavError::OptionNotValid`] error.
    pub fn option(name: impl Into<String>, value: impl ToString) -> Self {
        Self::OptionNotValid {
            name: name.into(),
            value: value.to_string(),
        }
    }

    /// Whether this is one of the not-found errors.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::LocalResourceNotFound(_)
                | Self::RemoteResourceNotFound(_)
                | Self::RemoteParentNotFound(_)
        )
    }

    /// Maps a local I/O failure on `path`.
    pub(crate) fn local_io(path: impl Into<PathBuf>, e: &std::io::Error) -> Self {
        let path = path.into();
        match e.kind() {
            std::io::ErrorKind::NotFound => Self::LocalResourceNotFound(path),
            _ => Self::UnhandledError(format!("IO error on {}: {e}", path.display())),
        }
    }
}

impl From<quick_xml::Error> for WebDavError {
    fn from(e: quick_xml::Error) -> Self {
        Self::UnhandledError(format!("XML error: {e}"))
    }
}
