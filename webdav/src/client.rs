// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `WebDAV` client for remote resource operations.

use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::config::WebDavConfig;
use crate::error::WebDavError;
use crate::http::{HttpClient, Operation, OperationKind};
use crate::request::{PropFindRequest, PropertyUpdateRequest};
use crate::resource::Resource;
use crate::response::{MultiStatusResponse, ResponseItem};
use crate::types::{PropertyName, ResourceInfo};
use crate::urn::{SEPARATOR, Urn, decode};
use crate::xml::find_element_text;

/// `WebDAV` client for listing, transferring and tagging remote resources.
///
/// Paths are given the way local paths are (`/docs/report.txt`, `docs//a/`)
/// and normalized with [`Urn`]; a trailing separator marks a directory.
/// Every request is confined below the configured server root.
///
/// Cloning is cheap: clones share the underlying HTTP connection pool.
///
/// # Example
///
/// ```ignore
/// use webdav_client::{WebDavClient, WebDavConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = WebDavConfig {
///     server_login: "user".to_string(),
///     server_password: "pass".to_string(),
///     server_root: "/user1".to_string(),
///     ..WebDavConfig::new("https://webdav.example.com")
/// };
///
/// let client = WebDavClient::new(config)?;
/// for name in client.list("/docs/").await? {
///     println!("{name}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WebDavClient {
    http: Arc<HttpClient>,
}

impl WebDavClient {
    /// Creates a new `WebDAV` client.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::OptionNotValid`] if the configuration is
    /// invalid or the HTTP client cannot be built from it.
    pub fn new(config: WebDavConfig) -> Result<Self, WebDavError> {
        let http = HttpClient::new(config)?;
        Ok(Self {
            http: Arc::new(http),
        })
    }

    /// The configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &WebDavConfig {
        self.http.config()
    }

    /// Returns a handle bound to `remote_path`.
    #[must_use]
    pub fn resource(&self, remote_path: &str) -> Resource {
        Resource::new(self.clone(), Urn::new(remote_path))
    }

    /// Checks whether the server answers at the configured root.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::NotConnection`] if the server cannot be reached.
    pub async fn check_connection(&self) -> Result<bool, WebDavError> {
        let op = Operation::new(&self.http, OperationKind::Check, &Urn::root());
        match self.http.execute(op).await {
            Ok(_) => Ok(true),
            Err(
                e @ (WebDavError::NotConnection { .. } | WebDavError::CertificateNotValid(_)),
            ) => Err(e),
            Err(e) => {
                tracing::debug!(err = %e, "connection check answered with an error");
                Ok(false)
            }
        }
    }

    /// Lists the names of the direct children of a remote directory.
    ///
    /// Directory names keep their trailing separator (`sub/`); the directory
    /// itself is not included.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::RemoteResourceNotFound`] if the directory does
    /// not exist.
    pub async fn list(&self, remote_path: &str) -> Result<Vec<String>, WebDavError> {
        let directory = Urn::directory(remote_path);
        tracing::debug!(path = %directory, "listing directory");

        if !directory.is_root() && !self.exists(&directory.path()).await? {
            return Err(WebDavError::RemoteResourceNotFound(directory.path()));
        }

        self.list_children(&directory).await
    }

    /// Checks whether a remote resource exists, by listing its parent.
    ///
    /// The root always exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent listing fails for another reason than
    /// the parent being absent.
    pub async fn exists(&self, remote_path: &str) -> Result<bool, WebDavError> {
        let urn = Urn::new(remote_path);
        if urn.is_root() {
            return Ok(true);
        }

        let parent = Urn::directory(&urn.parent());
        let names = match self.list_children(&parent).await {
            Ok(names) => names,
            Err(WebDavError::RemoteResourceNotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };

        let name = urn.filename();
        Ok(names.iter().any(|n| {
            *n == name || (!urn.is_directory() && n.strip_suffix(SEPARATOR) == Some(name.as_str()))
        }))
    }

    /// Creates a remote directory.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::RemoteParentNotFound`] if the parent directory
    /// does not exist; no MKCOL is sent in that case.
    pub async fn mkdir(&self, remote_path: &str) -> Result<(), WebDavError> {
        let directory = Urn::directory(remote_path);
        tracing::debug!(path = %directory, "creating directory");

        if !self.exists(&directory.parent()).await? {
            return Err(WebDavError::RemoteParentNotFound(directory.path()));
        }

        let op = Operation::new(&self.http, OperationKind::Mkdir, &directory);
        self.http.execute(op).await?;
        Ok(())
    }

    /// Deletes a remote resource. Directories are deleted with their content.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::RemoteResourceNotFound`] if the resource does
    /// not exist.
    pub async fn clear(&self, remote_path: &str) -> Result<(), WebDavError> {
        let urn = Urn::new(remote_path);
        tracing::debug!(path = %urn, "deleting resource");

        if !self.exists(&urn.path()).await? {
            return Err(WebDavError::RemoteResourceNotFound(urn.path()));
        }

        let op = Operation::new(&self.http, OperationKind::Clear, &urn);
        self.http.execute(op).await?;
        Ok(())
    }

    /// Copies a remote resource on the server.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::RemoteResourceNotFound`] if the source is
    /// missing, or [`WebDavError::RemoteParentNotFound`] if the target's
    /// parent is.
    pub async fn copy(
        &self,
        remote_path_from: &str,
        remote_path_to: &str,
    ) -> Result<(), WebDavError> {
        self.relocate(OperationKind::Copy, remote_path_from, remote_path_to)
            .await
    }

    /// Moves a remote resource on the server.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::RemoteResourceNotFound`] if the source is
    /// missing, or [`WebDavError::RemoteParentNotFound`] if the target's
    /// parent is.
    pub async fn move_to(
        &self,
        remote_path_from: &str,
        remote_path_to: &str,
    ) -> Result<(), WebDavError> {
        self.relocate(OperationKind::Move, remote_path_from, remote_path_to)
            .await
    }

    async fn relocate(&self, kind: OperationKind, from: &str, to: &str) -> Result<(), WebDavError> {
        let urn_from = Urn::new(from);
        let urn_to = Urn::new(to);
        tracing::debug!(?kind, from = %urn_from, to = %urn_to, "relocating resource");

        if !self.exists(&urn_from.path()).await? {
            return Err(WebDavError::RemoteResourceNotFound(urn_from.path()));
        }

        if !self.exists(&urn_to.parent()).await? {
            return Err(WebDavError::RemoteParentNotFound(urn_to.path()));
        }

        let op = Operation::new(&self.http, kind, &urn_from)
            .header("Destination", self.http.url(&urn_to));
        self.http.execute(op).await?;
        Ok(())
    }

    /// Returns metadata of a remote resource.
    ///
    /// The parent directory is queried; if the server's answer does not
    /// mention the resource, an empty [`ResourceInfo`] is returned.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::RemoteResourceNotFound`] if the resource does
    /// not exist.
    pub async fn info(&self, remote_path: &str) -> Result<ResourceInfo, WebDavError> {
        let urn = Urn::new(remote_path);
        tracing::debug!(path = %urn, "querying resource info");

        if !self.exists(&urn.path()).await? {
            return Err(WebDavError::RemoteResourceNotFound(urn.path()));
        }

        let parent = Urn::directory(&urn.parent());
        let op = Operation::new(&self.http, OperationKind::Info, &parent);
        let resp = self.http.execute(op).await?;
        let xml = self.http.text(resp).await?;
        let multistatus = MultiStatusResponse::from_xml(&xml)?;

        let target = trimmed_path(&urn);
        let parent_path = trimmed_path(&parent);
        let info = multistatus
            .responses
            .iter()
            .filter_map(|r| self.entry_urn(r).map(|entry| (r, entry)))
            .find(|(_, entry)| {
                let path = trimmed_path(entry);
                path == target && (urn.is_root() || path != parent_path)
            })
            .map(|(r, _)| r.info());

        Ok(info.unwrap_or_default())
    }

    /// Returns the number of bytes available on the server.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::UnhandledError`] if the server does not report
    /// `quota-available-bytes`.
    pub async fn free(&self) -> Result<u64, WebDavError> {
        tracing::debug!("querying free space");
        let body = PropFindRequest::quota().build()?;
        let op = Operation::new(&self.http, OperationKind::Free, &Urn::root()).xml(body);
        let resp = self.http.execute(op).await?;
        let xml = self.http.text(resp).await?;

        let available = property_value(&xml, "quota-available-bytes")?.ok_or_else(|| {
            WebDavError::UnhandledError("quota-available-bytes missing from response".to_string())
        })?;
        available.parse().map_err(|_| {
            WebDavError::UnhandledError(format!("invalid quota-available-bytes: {available}"))
        })
    }

    /// Publishes a remote resource, returning its public URL if the server
    /// reports one.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::RemoteResourceNotFound`] if the resource does
    /// not exist.
    pub async fn publish(&self, remote_path: &str) -> Result<Option<String>, WebDavError> {
        let body = PropertyUpdateRequest::new()
            .set(PropertyName::public_url(), "true")
            .build()?;
        let xml = self
            .property_exchange(OperationKind::Publish, remote_path, body)
            .await?;
        Ok(property_value(&xml, "public_url")?.filter(|url| !url.is_empty()))
    }

    /// Withdraws the public URL of a remote resource.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::RemoteResourceNotFound`] if the resource does
    /// not exist.
    pub async fn unpublish(&self, remote_path: &str) -> Result<(), WebDavError> {
        let body = PropertyUpdateRequest::new()
            .remove(PropertyName::public_url())
            .build()?;
        self.property_exchange(OperationKind::Unpublish, remote_path, body)
            .await?;
        Ok(())
    }

    /// Returns the public URL of a remote resource, if it is published.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::RemoteResourceNotFound`] if the resource does
    /// not exist.
    pub async fn published(&self, remote_path: &str) -> Result<Option<String>, WebDavError> {
        let mut request = PropFindRequest::new();
        request.add_property(PropertyName::public_url());
        let xml = self
            .property_exchange(OperationKind::Published, remote_path, request.build()?)
            .await?;
        Ok(property_value(&xml, "public_url")?.filter(|url| !url.is_empty()))
    }

    /// Reads a property of a remote resource.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::RemoteResourceNotFound`] if the resource does
    /// not exist.
    pub async fn get_property(
        &self,
        remote_path: &str,
        property: &PropertyName,
    ) -> Result<Option<String>, WebDavError> {
        let mut request = PropFindRequest::new();
        request.add_property(property.clone());
        let xml = self
            .property_exchange(OperationKind::GetProperty, remote_path, request.build()?)
            .await?;
        property_value(&xml, &property.name)
    }

    /// Writes a property of a remote resource.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::RemoteResourceNotFound`] if the resource does
    /// not exist.
    pub async fn set_property(
        &self,
        remote_path: &str,
        property: &PropertyName,
        value: &str,
    ) -> Result<(), WebDavError> {
        let body = PropertyUpdateRequest::new()
            .set(property.clone(), value)
            .build()?;
        self.property_exchange(OperationKind::SetProperty, remote_path, body)
            .await?;
        Ok(())
    }

    async fn property_exchange(
        &self,
        kind: OperationKind,
        remote_path: &str,
        body: String,
    ) -> Result<String, WebDavError> {
        let urn = Urn::new(remote_path);
        tracing::debug!(?kind, path = %urn, "exchanging properties");

        if !self.exists(&urn.path()).await? {
            return Err(WebDavError::RemoteResourceNotFound(urn.path()));
        }

        let op = Operation::new(&self.http, kind, &urn).xml(body);
        let resp = self.http.execute(op).await?;
        self.http.text(resp).await
    }

    /// Downloads a remote file into `writer`, returning the number of bytes
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::OptionNotValid`] if `remote_path` denotes a
    /// directory, or [`WebDavError::RemoteResourceNotFound`] if it does not
    /// exist.
    pub async fn download_to<W>(
        &self,
        writer: &mut W,
        remote_path: &str,
    ) -> Result<u64, WebDavError>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        let urn = Urn::new(remote_path);
        if urn.is_directory() {
            return Err(WebDavError::option("remote_path", remote_path));
        }

        if !self.exists(&urn.path()).await? {
            return Err(WebDavError::RemoteResourceNotFound(urn.path()));
        }

        self.fetch(&urn, writer).await
    }

    /// Uploads `data` to a remote file.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::OptionNotValid`] if `remote_path` denotes a
    /// directory, [`WebDavError::RemoteParentNotFound`] if its parent does
    /// not exist, or [`WebDavError::NotEnoughSpace`] if the server is full.
    pub async fn upload_from(&self, data: Vec<u8>, remote_path: &str) -> Result<(), WebDavError> {
        let urn = Urn::new(remote_path);
        if urn.is_directory() {
            return Err(WebDavError::option("remote_path", remote_path));
        }

        if !self.exists(&urn.parent()).await? {
            return Err(WebDavError::RemoteParentNotFound(urn.path()));
        }

        tracing::debug!(path = %urn, size = data.len(), "uploading buffer");
        let op = Operation::new(&self.http, OperationKind::Upload, &urn).body(data);
        self.http.execute(op).await?;
        Ok(())
    }

    /// Sends a GET for `urn` and streams the body into `writer`.
    pub(crate) async fn fetch<W>(&self, urn: &Urn, writer: &mut W) -> Result<u64, WebDavError>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        tracing::debug!(path = %urn, "downloading file");
        let op = Operation::new(&self.http, OperationKind::Download, urn);
        let mut resp = self.http.execute(op).await?;

        let mut written = 0_u64;
        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| self.http.transport_error(&e))?
        {
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| WebDavError::UnhandledError(format!("write failed: {e}")))?;
            written += chunk.len() as u64;
        }
        writer
            .flush()
            .await
            .map_err(|e| WebDavError::UnhandledError(format!("write failed: {e}")))?;

        Ok(written)
    }

    /// Sends a PUT for `urn` with a prepared body.
    pub(crate) async fn put(
        &self,
        urn: &Urn,
        body: reqwest::Body,
        size: u64,
    ) -> Result<(), WebDavError> {
        tracing::debug!(path = %urn, size, "uploading file");
        let op = Operation::new(&self.http, OperationKind::Upload, urn)
            .header("Content-Length", size.to_string())
            .body(body);
        self.http.execute(op).await?;
        Ok(())
    }

    /// Sends a PROPFIND for `directory` and returns its children's names.
    pub(crate) async fn list_children(&self, directory: &Urn) -> Result<Vec<String>, WebDavError> {
        let op = Operation::new(&self.http, OperationKind::List, directory);
        let resp = self.http.execute(op).await?;
        let xml = self.http.text(resp).await?;
        let multistatus = MultiStatusResponse::from_xml(&xml)?;

        let own = trimmed_path(directory);
        Ok(multistatus
            .responses
            .iter()
            .filter_map(|r| self.entry_urn(r))
            .filter(|urn| trimmed_path(urn) != own)
            .filter(|urn| {
                let child = urn.parent().trim_end_matches(SEPARATOR) == own;
                if !child {
                    tracing::warn!(
                        path = %urn,
                        directory = %directory,
                        "ignoring entry outside the listed directory"
                    );
                }
                child
            })
            .map(|urn| urn.filename())
            .collect())
    }

    /// Converts the href of a response entry into an identifier relative to
    /// the server root. Collections always get a trailing separator.
    fn entry_urn(&self, item: &ResponseItem) -> Option<Urn> {
        let urn = self.href_to_urn(&item.href)?;
        if item.is_collection() && !urn.is_directory() {
            Some(Urn::directory(&urn.path()))
        } else {
            Some(urn)
        }
    }

    fn href_to_urn(&self, href: &str) -> Option<Urn> {
        let path = match reqwest::Url::parse(href) {
            Ok(url) => url.path().to_string(),
            Err(_) => href.to_string(),
        };
        let path = decode(&path);

        let root = decode(&self.http.config().href_prefix()).into_owned();
        if root.is_empty() {
            return Some(Urn::new(&path));
        }

        match path.strip_prefix(root.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with(SEPARATOR) => Some(Urn::new(rest)),
            _ => {
                tracing::warn!(href, root = %root, "ignoring href outside the server root");
                None
            }
        }
    }
}

/// Decoded path without a trailing separator, for comparing entries.
fn trimmed_path(urn: &Urn) -> String {
    urn.path().trim_end_matches(SEPARATOR).to_string()
}

/// Extracts a property from a PROPFIND/PROPPATCH answer.
///
/// Standard multistatus bodies are read through their successful propstats;
/// anything else falls back to the first element with that name.
fn property_value(xml: &str, name: &str) -> Result<Option<String>, WebDavError> {
    let multistatus = MultiStatusResponse::from_xml(xml)?;
    if multistatus.responses.iter().any(|r| !r.prop_stats.is_empty()) {
        return Ok(multistatus.property(name).map(str::to_string));
    }
    find_element_text(xml, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(root: &str) -> WebDavClient {
        WebDavClient::new(WebDavConfig {
            server_root: root.to_string(),
            ..WebDavConfig::new("https://dav.example.com")
        })
        .unwrap()
    }

    #[test]
    fn client_href_to_urn_strips_server_root() {
        let client = client("/user 1");
        let urn = client.href_to_urn("/user%201/docs/a%20b.txt").unwrap();
        assert_eq!(urn.path(), "/docs/a b.txt");

        let urn = client
            .href_to_urn("https://dav.example.com/user%201/docs/")
            .unwrap();
        assert_eq!(urn.path(), "/docs/");

        assert!(client.href_to_urn("/user%2010/docs/").is_none());
        assert!(client.href_to_urn("/other/docs/").is_none());
    }

    #[test]
    fn client_href_to_urn_without_root() {
        let client = client("");
        let urn = client.href_to_urn("/docs/sub/").unwrap();
        assert_eq!(urn.filename(), "sub/");
    }

    #[test]
    fn client_href_to_urn_strips_hostname_path() {
        let client = WebDavClient::new(WebDavConfig {
            server_root: "/files".to_string(),
            ..WebDavConfig::new("https://cloud.example.com/remote.php/dav/")
        })
        .unwrap();

        let urn = client
            .href_to_urn("/remote.php/dav/files/docs/a.txt")
            .unwrap();
        assert_eq!(urn.path(), "/docs/a.txt");

        let urn = client
            .href_to_urn("https://cloud.example.com/remote.php/dav/files/")
            .unwrap();
        assert!(urn.is_root());

        assert!(client.href_to_urn("/files/docs/a.txt").is_none());
    }

    #[test]
    fn client_property_value_reads_successful_propstats_only() {
        let xml = r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:">
  <d:response>
    <d:href>/a.txt</d:href>
    <d:propstat>
      <d:prop><x:color xmlns:x="urn:x"/></d:prop>
      <d:status>HTTP/1.1 404 Not Found</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#;
        assert_eq!(property_value(xml, "color").unwrap(), None);
    }

    #[test]
    fn client_property_value_falls_back_to_plain_documents() {
        let xml = "<result><public_url>https://yadi.sk/d/abc</public_url></result>";
        assert_eq!(
            property_value(xml, "public_url").unwrap().as_deref(),
            Some("https://yadi.sk/d/abc")
        );
    }
}
