// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Handle bound to a single remote resource.

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWrite;

use crate::client::WebDavClient;
use crate::error::WebDavError;
use crate::transfer::{Callback, TransferHandle};
use crate::types::{PropertyName, ResourceInfo};
use crate::urn::Urn;

/// A remote resource bound to a client.
///
/// Every method forwards to the [`WebDavClient`] operation of the same
/// purpose with the bound path. `rename` and `move_to` rebind the handle to
/// the new location once the server has accepted the move.
#[derive(Debug, Clone)]
pub struct Resource {
    client: WebDavClient,
    urn: Urn,
}

impl Resource {
    pub(crate) const fn new(client: WebDavClient, urn: Urn) -> Self {
        Self { client, urn }
    }

    /// The identifier this handle is bound to.
    #[must_use]
    pub const fn urn(&self) -> &Urn {
        &self.urn
    }

    /// Renames the resource within its parent directory.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying move.
    pub async fn rename(&mut self, new_name: &str) -> Result<(), WebDavError> {
        let name = Urn::new(new_name).filename();
        let target = Urn::with_kind(
            &format!("{}{name}", self.urn.parent()),
            self.urn.is_directory(),
        );
        self.client
            .move_to(&self.urn.path(), &target.path())
            .await?;
        self.urn = target;
        Ok(())
    }

    /// Moves the resource to `remote_path`.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying move.
    pub async fn move_to(&mut self, remote_path: &str) -> Result<(), WebDavError> {
        let target = Urn::new(remote_path);
        self.client
            .move_to(&self.urn.path(), &target.path())
            .await?;
        self.urn = target;
        Ok(())
    }

    /// Copies the resource to `remote_path`, returning a handle to the copy.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying copy.
    pub async fn copy_to(&self, remote_path: &str) -> Result<Self, WebDavError> {
        let target = Urn::new(remote_path);
        self.client.copy(&self.urn.path(), &target.path()).await?;
        Ok(Self::new(self.client.clone(), target))
    }

    /// Returns the resource metadata.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::RemoteResourceNotFound`] if the resource does
    /// not exist.
    pub async fn info(&self) -> Result<ResourceInfo, WebDavError> {
        self.client.info(&self.urn.path()).await
    }

    /// Downloads the resource into `writer`.
    ///
    /// # Errors
    ///
    /// See [`WebDavClient::download_to`].
    pub async fn read_to<W>(&self, writer: &mut W) -> Result<u64, WebDavError>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        self.client.download_to(writer, &self.urn.path()).await
    }

    /// Downloads the resource to `local_path`.
    ///
    /// # Errors
    ///
    /// See [`WebDavClient::download`].
    pub async fn read(&self, local_path: impl AsRef<Path>) -> Result<(), WebDavError> {
        self.client.download(local_path, &self.urn.path()).await
    }

    /// Downloads the resource to `local_path` in the background.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn read_async(
        &self,
        local_path: impl Into<PathBuf>,
        callback: Option<Callback>,
    ) -> TransferHandle {
        self.client
            .spawn_download(local_path, self.urn.path(), callback)
    }

    /// Uploads `data` as the resource content.
    ///
    /// # Errors
    ///
    /// See [`WebDavClient::upload_from`].
    pub async fn write_from(&self, data: Vec<u8>) -> Result<(), WebDavError> {
        self.client.upload_from(data, &self.urn.path()).await
    }

    /// Uploads `local_path` as the resource content.
    ///
    /// # Errors
    ///
    /// See [`WebDavClient::upload`].
    pub async fn write(&self, local_path: impl AsRef<Path>) -> Result<(), WebDavError> {
        self.client.upload(local_path, &self.urn.path()).await
    }

    /// Uploads `local_path` as the resource content in the background.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn write_async(
        &self,
        local_path: impl Into<PathBuf>,
        callback: Option<Callback>,
    ) -> TransferHandle {
        self.client
            .spawn_upload(local_path, self.urn.path(), callback)
    }

    /// Reads a property of the resource.
    ///
    /// # Errors
    ///
    /// See [`WebDavClient::get_property`].
    pub async fn property(&self, property: &PropertyName) -> Result<Option<String>, WebDavError> {
        self.client.get_property(&self.urn.path(), property).await
    }

    /// Writes a property of the resource.
    ///
    /// # Errors
    ///
    /// See [`WebDavClient::set_property`].
    pub async fn set_property(
        &self,
        property: &PropertyName,
        value: &str,
    ) -> Result<(), WebDavError> {
        self.client
            .set_property(&self.urn.path(), property, value)
            .await
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource {}", self.urn)
    }
}
