use std::io;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::domain::StoragePath;

/// Holds an upload for the lifetime of the one request that sent it.
///
/// Keys are write-once: staging under a key that already holds an upload is
/// refused, so two requests can never share or overwrite a file.
#[async_trait::async_trait]
pub trait StagingStore: Send + Sync {
    /// Writes the stream under `path` and returns the number of bytes staged.
    async fn stage(
        &self,
        path: &StoragePath,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, StagingStoreError>;

    async fn read(&self, path: &StoragePath) -> Result<Vec<u8>, StagingStoreError>;

    async fn remove(&self, path: &StoragePath) -> Result<(), StagingStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StagingStoreError {
    #[error("an upload is already staged at {0}")]
    AlreadyStaged(String),
    #[error("staging write failed: {0}")]
    WriteFailed(String),
    #[error("no staged upload at {0}")]
    NotFound(String),
    #[error("staging read failed: {0}")]
    ReadFailed(String),
    #[error("staging remove failed: {0}")]
    RemoveFailed(String),
    /// The incoming upload stream itself failed.
    #[error("upload stream error: {0}")]
    Io(#[from] io::Error),
}
