// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! File and directory transfers between the local filesystem and the server.

use std::path::{Path, PathBuf};

use futures::{FutureExt, future::BoxFuture};
use tokio::fs;
use tokio::task::JoinHandle;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;

use crate::client::WebDavClient;
use crate::error::WebDavError;
use crate::urn::{SEPARATOR, Urn};

/// Completion callback of a transfer, invoked once on success.
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a transfer running on the tokio runtime.
///
/// Dropping the handle detaches the transfer; it keeps running.
#[derive(Debug)]
pub struct TransferHandle {
    task: JoinHandle<Result<(), WebDavError>>,
    cancel: CancellationToken,
}

impl TransferHandle {
    /// Requests cancellation.
    ///
    /// Directory transfers stop before the next tree node and report
    /// [`WebDavError::Cancelled`]; a single file exchange already in flight
    /// runs to completion.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the transfer has ended, successfully or not.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the transfer to end.
    ///
    /// # Errors
    ///
    /// Returns the transfer's error, or [`WebDavError::Cancelled`] if it was
    /// cancelled.
    pub async fn wait(self) -> Result<(), WebDavError> {
        self.task.await.map_err(|e| {
            if e.is_cancelled() {
                WebDavError::Cancelled
            } else {
                WebDavError::UnhandledError(format!("transfer task failed: {e}"))
            }
        })?
    }
}

impl WebDavClient {
    /// Downloads a remote file or directory tree to `local_path`.
    ///
    /// A remote path with a trailing separator is downloaded recursively
    /// with [`download_directory`](Self::download_directory), anything else
    /// with [`download_file`](Self::download_file).
    ///
    /// # Errors
    ///
    /// Returns the first error met; a failed directory download leaves the
    /// local tree partially populated.
    pub async fn download(
        &self,
        local_path: impl AsRef<Path>,
        remote_path: &str,
    ) -> Result<(), WebDavError> {
        self.download_until(local_path.as_ref(), remote_path, &CancellationToken::new())
            .await
    }

    /// Downloads a remote file to `local_path`, returning the number of bytes
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::OptionNotValid`] if `remote_path` denotes a
    /// directory or `local_path` is one, and
    /// [`WebDavError::RemoteResourceNotFound`] if the file does not exist.
    pub async fn download_file(
        &self,
        local_path: impl AsRef<Path>,
        remote_path: &str,
    ) -> Result<u64, WebDavError> {
        let local_path = local_path.as_ref();
        let urn = Urn::new(remote_path);
        if urn.is_directory() {
            return Err(WebDavError::option("remote_path", remote_path));
        }

        if is_local_dir(local_path).await {
            return Err(WebDavError::option("local_path", local_path.display()));
        }

        if !self.exists(&urn.path()).await? {
            return Err(WebDavError::RemoteResourceNotFound(urn.path()));
        }

        self.fetch_file(local_path, &urn).await
    }

    /// Downloads a remote directory tree, replacing whatever is at
    /// `local_path`.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::OptionNotValid`] if `remote_path` is not a
    /// directory and [`WebDavError::RemoteResourceNotFound`] if it does not
    /// exist.
    #[tracing::instrument(skip(self, local_path))]
    pub async fn download_directory(
        &self,
        local_path: impl AsRef<Path>,
        remote_path: &str,
    ) -> Result<(), WebDavError> {
        let urn = Urn::new(remote_path);
        self.download_tree(local_path.as_ref(), urn, &CancellationToken::new())
            .await
    }

    /// Uploads a local file or directory tree to `remote_path`.
    ///
    /// A local directory is uploaded recursively with
    /// [`upload_directory`](Self::upload_directory), anything else with
    /// [`upload_file`](Self::upload_file).
    ///
    /// # Errors
    ///
    /// Returns the first error met; a failed directory upload leaves the
    /// remote tree partially populated.
    pub async fn upload(
        &self,
        local_path: impl AsRef<Path>,
        remote_path: &str,
    ) -> Result<(), WebDavError> {
        self.upload_until(local_path.as_ref(), remote_path, &CancellationToken::new())
            .await
    }

    /// Uploads a local file to `remote_path`.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::LocalResourceNotFound`] if the local file is
    /// missing, before any request is sent. Returns
    /// [`WebDavError::RemoteParentNotFound`] if the remote parent directory
    /// does not exist and [`WebDavError::NotEnoughSpace`] if the server is
    /// full.
    pub async fn upload_file(
        &self,
        local_path: impl AsRef<Path>,
        remote_path: &str,
    ) -> Result<(), WebDavError> {
        let local_path = local_path.as_ref();
        let metadata = fs::metadata(local_path)
            .await
            .map_err(|e| WebDavError::local_io(local_path, &e))?;
        if metadata.is_dir() {
            return Err(WebDavError::option("local_path", local_path.display()));
        }

        let urn = Urn::new(remote_path);
        if urn.is_directory() {
            return Err(WebDavError::option("remote_path", remote_path));
        }

        if !self.exists(&urn.parent()).await? {
            return Err(WebDavError::RemoteParentNotFound(urn.path()));
        }

        self.send_file(local_path, &urn).await
    }

    /// Uploads a local directory tree, replacing the remote directory if it
    /// exists.
    ///
    /// The remote directory is deleted and recreated before any child is
    /// uploaded; this is a replace, not a merge.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::OptionNotValid`] if `remote_path` is not a
    /// directory or `local_path` is not one, and
    /// [`WebDavError::LocalResourceNotFound`] if `local_path` is missing.
    #[tracing::instrument(skip(self, local_path))]
    pub async fn upload_directory(
        &self,
        local_path: impl AsRef<Path>,
        remote_path: &str,
    ) -> Result<(), WebDavError> {
        let urn = Urn::new(remote_path);
        self.upload_tree(local_path.as_ref(), urn, &CancellationToken::new())
            .await
    }

    /// Runs [`download`](Self::download), then invokes `callback` on success.
    ///
    /// # Errors
    ///
    /// Returns the download error; the callback is not invoked then.
    pub async fn download_then(
        &self,
        local_path: impl AsRef<Path>,
        remote_path: &str,
        callback: Option<Callback>,
    ) -> Result<(), WebDavError> {
        self.download(local_path, remote_path).await?;
        if let Some(callback) = callback {
            callback();
        }
        Ok(())
    }

    /// Runs [`upload`](Self::upload), then invokes `callback` on success.
    ///
    /// # Errors
    ///
    /// Returns the upload error; the callback is not invoked then.
    pub async fn upload_then(
        &self,
        local_path: impl AsRef<Path>,
        remote_path: &str,
        callback: Option<Callback>,
    ) -> Result<(), WebDavError> {
        self.upload(local_path, remote_path).await?;
        if let Some(callback) = callback {
            callback();
        }
        Ok(())
    }

    /// Spawns [`download`](Self::download) on the current tokio runtime.
    ///
    /// `callback` runs on the runtime once the download has succeeded.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn_download(
        &self,
        local_path: impl Into<PathBuf>,
        remote_path: impl Into<String>,
        callback: Option<Callback>,
    ) -> TransferHandle {
        let client = self.clone();
        let local_path = local_path.into();
        let remote_path = remote_path.into();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            client
                .download_until(&local_path, &remote_path, &token)
                .await?;
            if let Some(callback) = callback {
                callback();
            }
            Ok(())
        });

        TransferHandle { task, cancel }
    }

    /// Spawns [`upload`](Self::upload) on the current tokio runtime.
    ///
    /// `callback` runs on the runtime once the upload has succeeded.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn_upload(
        &self,
        local_path: impl Into<PathBuf>,
        remote_path: impl Into<String>,
        callback: Option<Callback>,
    ) -> TransferHandle {
        let client = self.clone();
        let local_path = local_path.into();
        let remote_path = remote_path.into();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            client.upload_until(&local_path, &remote_path, &token).await?;
            if let Some(callback) = callback {
                callback();
            }
            Ok(())
        });

        TransferHandle { task, cancel }
    }

    async fn download_until(
        &self,
        local_path: &Path,
        remote_path: &str,
        cancel: &CancellationToken,
    ) -> Result<(), WebDavError> {
        if cancel.is_cancelled() {
            return Err(WebDavError::Cancelled);
        }

        let urn = Urn::new(remote_path);
        if urn.is_directory() {
            self.download_tree(local_path, urn, cancel).await
        } else {
            self.download_file(local_path, remote_path).await?;
            Ok(())
        }
    }

    async fn upload_until(
        &self,
        local_path: &Path,
        remote_path: &str,
        cancel: &CancellationToken,
    ) -> Result<(), WebDavError> {
        if cancel.is_cancelled() {
            return Err(WebDavError::Cancelled);
        }

        if is_local_dir(local_path).await {
            self.upload_tree(local_path, Urn::new(remote_path), cancel)
                .await
        } else {
            self.upload_file(local_path, remote_path).await
        }
    }

    /// Depth-first download of `urn` into `local_path`, one child at a time.
    fn download_tree<'a>(
        &'a self,
        local_path: &'a Path,
        urn: Urn,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<(), WebDavError>> {
        async move {
            if cancel.is_cancelled() {
                return Err(WebDavError::Cancelled);
            }

            if !urn.is_directory() {
                return Err(WebDavError::option("remote_path", urn.path()));
            }

            if !self.exists(&urn.path()).await? {
                return Err(WebDavError::RemoteResourceNotFound(urn.path()));
            }

            replace_local_dir(local_path).await?;

            for name in self.list_children(&urn).await? {
                if cancel.is_cancelled() {
                    return Err(WebDavError::Cancelled);
                }

                let stem = name.trim_end_matches(SEPARATOR);
                if stem.is_empty() || stem.contains(SEPARATOR) || stem == "." || stem == ".." {
                    return Err(WebDavError::UnhandledError(format!(
                        "invalid entry {name:?} in listing of {urn}"
                    )));
                }

                let child = urn.join(&name);
                let child_path = local_path.join(stem);
                if child.is_directory() {
                    self.download_tree(&child_path, child, cancel).await?;
                } else {
                    self.fetch_file(&child_path, &child).await?;
                }
            }

            Ok(())
        }
        .boxed()
    }

    /// Depth-first upload of `local_path` into `urn`, children in name order.
    fn upload_tree<'a>(
        &'a self,
        local_path: &'a Path,
        urn: Urn,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<(), WebDavError>> {
        async move {
            if cancel.is_cancelled() {
                return Err(WebDavError::Cancelled);
            }

            if !urn.is_directory() {
                return Err(WebDavError::option("remote_path", urn.path()));
            }

            let metadata = fs::metadata(local_path)
                .await
                .map_err(|e| WebDavError::local_io(local_path, &e))?;
            if !metadata.is_dir() {
                return Err(WebDavError::option("local_path", local_path.display()));
            }

            if self.exists(&urn.path()).await? {
                self.clear(&urn.path()).await?;
            }
            self.mkdir(&urn.path()).await?;

            for (name, path, is_dir) in sorted_entries(local_path).await? {
                if cancel.is_cancelled() {
                    return Err(WebDavError::Cancelled);
                }

                if is_dir {
                    let child = Urn::directory(&urn.join(&name).path());
                    self.upload_tree(&path, child, cancel).await?;
                } else {
                    self.send_file(&path, &urn.join(&name)).await?;
                }
            }

            Ok(())
        }
        .boxed()
    }

    async fn fetch_file(&self, local_path: &Path, urn: &Urn) -> Result<u64, WebDavError> {
        let mut file = fs::File::create(local_path)
            .await
            .map_err(|e| WebDavError::local_io(local_path, &e))?;
        self.fetch(urn, &mut file).await
    }

    async fn send_file(&self, local_path: &Path, urn: &Urn) -> Result<(), WebDavError> {
        let file = fs::File::open(local_path)
            .await
            .map_err(|e| WebDavError::local_io(local_path, &e))?;
        let size = file
            .metadata()
            .await
            .map_err(|e| WebDavError::local_io(local_path, &e))?
            .len();

        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        self.put(urn, body, size).await
    }
}

/// Removes whatever is at `path` and creates an empty directory there.
async fn replace_local_dir(path: &Path) -> Result<(), WebDavError> {
    match fs::symlink_metadata(path).await {
        Ok(metadata) if metadata.is_dir() => fs::remove_dir_all(path).await,
        Ok(_) => fs::remove_file(path).await,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
    .map_err(|e| WebDavError::local_io(path, &e))?;

    fs::create_dir_all(path)
        .await
        .map_err(|e| WebDavError::local_io(path, &e))
}

async fn is_local_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

/// Lists a local directory as `(name, path, is_dir)`, sorted by name.
///
/// Symlinks to files are followed; symlinks to directories are skipped.
async fn sorted_entries(dir: &Path) -> Result<Vec<(String, PathBuf, bool)>, WebDavError> {
    let mut read_dir = fs::read_dir(dir)
        .await
        .map_err(|e| WebDavError::local_io(dir, &e))?;

    let mut entries = Vec::new();
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| WebDavError::local_io(dir, &e))?
    {
        let path = entry.path();
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| WebDavError::local_io(&path, &e))?;
        let is_dir = if file_type.is_symlink() {
            let target = fs::metadata(&path)
                .await
                .map_err(|e| WebDavError::local_io(&path, &e))?;
            if target.is_dir() {
                tracing::warn!(path = %path.display(), "skipping symlinked directory");
                continue;
            }
            false
        } else {
            file_type.is_dir()
        };
        entries.push((entry.file_name().to_string_lossy().into_owned(), path, is_dir));
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}
