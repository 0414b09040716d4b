use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{MultipartUpload, ObjectStore, PutPayload};

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::StoragePath;

/// Stages uploads in a local directory.
///
/// Data goes through an `object_store` multipart upload, which writes to a
/// hidden sibling file and renames it into place on completion. A partially
/// received upload therefore never shows up under its key.
pub struct LocalStagingStore {
    fs: LocalFileSystem,
    base_path: PathBuf,
}

impl LocalStagingStore {
    pub fn new(base_path: PathBuf) -> Result<Self, StagingStoreError> {
        std::fs::create_dir_all(&base_path).map_err(|e| {
            StagingStoreError::WriteFailed(format!("cannot create {}: {e}", base_path.display()))
        })?;
        let fs = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| StagingStoreError::WriteFailed(e.to_string()))?;
        Ok(Self { fs, base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Removes every upload left in the directory, typically by a previous
    /// process that stopped mid-request. Returns how many were removed.
    pub async fn purge_leftovers(&self) -> Result<usize, StagingStoreError> {
        let leftovers: Vec<ObjectPath> = self
            .fs
            .list(None)
            .map_ok(|meta| meta.location)
            .try_collect()
            .await
            .map_err(|e| StagingStoreError::ReadFailed(e.to_string()))?;

        for location in &leftovers {
            self.fs
                .delete(location)
                .await
                .map_err(|e| StagingStoreError::RemoveFailed(e.to_string()))?;
        }

        if !leftovers.is_empty() {
            tracing::info!(count = leftovers.len(), "Removed leftover staged uploads");
        }
        Ok(leftovers.len())
    }

    async fn ensure_vacant(&self, location: &ObjectPath) -> Result<(), StagingStoreError> {
        match self.fs.head(location).await {
            Ok(_) => Err(StagingStoreError::AlreadyStaged(location.to_string())),
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(StagingStoreError::WriteFailed(e.to_string())),
        }
    }
}

fn object_path(path: &StoragePath) -> ObjectPath {
    ObjectPath::from(path.as_str())
}

#[async_trait::async_trait]
impl StagingStore for LocalStagingStore {
    async fn stage(
        &self,
        path: &StoragePath,
        mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, StagingStoreError> {
        let location = object_path(path);
        self.ensure_vacant(&location).await?;

        let mut upload = self
            .fs
            .put_multipart(&location)
            .await
            .map_err(|e| StagingStoreError::WriteFailed(e.to_string()))?;

        let mut staged_bytes: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let written = match chunk {
                Ok(bytes) if bytes.is_empty() => continue,
                Ok(bytes) => {
                    let len = bytes.len() as u64;
                    upload
                        .put_part(PutPayload::from(bytes))
                        .await
                        .map(|_| len)
                        .map_err(|e| StagingStoreError::WriteFailed(e.to_string()))
                }
                Err(e) => Err(StagingStoreError::Io(e)),
            };

            match written {
                Ok(len) => staged_bytes += len,
                Err(e) => {
                    let _ = upload.abort().await;
                    return Err(e);
                }
            }
        }

        if let Err(e) = upload.complete().await {
            let _ = upload.abort().await;
            return Err(StagingStoreError::WriteFailed(e.to_string()));
        }

        tracing::debug!(path = %path, bytes = staged_bytes, "Upload staged on disk");
        Ok(staged_bytes)
    }

    async fn read(&self, path: &StoragePath) -> Result<Vec<u8>, StagingStoreError> {
        let result = self.fs.get(&object_path(path)).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => StagingStoreError::NotFound(path.to_string()),
            e => StagingStoreError::ReadFailed(e.to_string()),
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StagingStoreError::ReadFailed(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn remove(&self, path: &StoragePath) -> Result<(), StagingStoreError> {
        self.fs
            .delete(&object_path(path))
            .await
            .map_err(|e| match e {
                object_store::Error::NotFound { .. } => {
                    StagingStoreError::NotFound(path.to_string())
                }
                e => StagingStoreError::RemoveFailed(e.to_string()),
            })
    }
}
