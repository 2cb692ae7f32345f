use std::io::Cursor;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;
use super::path::StoragePath;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Outcome of a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredBlob {
    pub path: StoragePath,
    /// Number of bytes actually written.
    pub size: u64,
}

/// Blob storage addressed by generated, collision-free paths.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes under a freshly generated path.
    async fn put(&self, data: &[u8]) -> Result<StoredBlob, StorageError> {
        let reader: BoxReader = Box::new(Cursor::new(data.to_vec()));
        self.put_stream(reader, Some(data.len() as u64)).await
    }

    /// Store data from an async reader under a freshly generated path.
    ///
    /// `size_hint` is the caller-declared length; when it already exceeds the
    /// limit nothing is read. The blob only becomes visible at its final path
    /// once fully written.
    async fn put_stream(
        &self,
        reader: BoxReader,
        size_hint: Option<u64>,
    ) -> Result<StoredBlob, StorageError>;

    /// Retrieve all bytes of a blob.
    async fn get(&self, path: &StoragePath) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.get_stream(path).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Open a blob as a streaming async reader.
    async fn get_stream(&self, path: &StoragePath) -> Result<BoxReader, StorageError>;

    /// Check whether a blob exists. Check failures read as absent.
    async fn exists(&self, path: &StoragePath) -> bool;

    /// Delete a blob. Fails with [`StorageError::NotFound`] if it is absent.
    async fn delete(&self, path: &StoragePath) -> Result<(), StorageError>;
}
