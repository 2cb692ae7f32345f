use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use super::error::StorageError;
use super::path::StoragePath;
use super::traits::{BlobStore, BoxReader, StoredBlob};

/// Filesystem-backed blob store.
///
/// Blobs are stored in a sharded directory layout:
/// `{base_path}/{first 2 key chars}/{remaining key chars}`.
/// In-flight writes live under `{base_path}/.tmp` and are renamed into place
/// only once complete.
pub struct FilesystemBlobStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemBlobStore {
    /// Create a new filesystem blob store.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    /// Compute the filesystem path for a given storage path.
    fn blob_path(&self, path: &StoragePath) -> PathBuf {
        self.base_path
            .join(path.shard_prefix())
            .join(path.shard_suffix())
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }

    /// Copy `reader` into `temp_path`, enforcing the size limit.
    async fn spool(&self, mut reader: BoxReader, temp_path: &Path) -> Result<u64, StorageError> {
        let mut total_bytes: u64 = 0;
        let mut buf = vec![0u8; 64 * 1024]; // 64KB read buffer
        let mut temp_file = fs::File::create(temp_path).await?;

        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }

            total_bytes += n as u64;
            if total_bytes > self.max_size {
                return Err(StorageError::SizeLimitExceeded {
                    actual: total_bytes,
                    limit: self.max_size,
                });
            }

            temp_file.write_all(&buf[..n]).await?;
        }

        temp_file.flush().await?;
        temp_file.sync_all().await?;
        Ok(total_bytes)
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put_stream(
        &self,
        reader: BoxReader,
        size_hint: Option<u64>,
    ) -> Result<StoredBlob, StorageError> {
        if let Some(hint) = size_hint
            && hint > self.max_size
        {
            return Err(StorageError::SizeLimitExceeded {
                actual: hint,
                limit: self.max_size,
            });
        }

        let temp_path = self.temp_path();
        let size = match self.spool(reader, &temp_path).await {
            Ok(size) => size,
            Err(e) => {
                let _ = fs::remove_file(&temp_path).await;
                return Err(e);
            }
        };

        let path = StoragePath::generate();
        let blob_path = self.blob_path(&path);

        if let Some(parent) = blob_path.parent()
            && let Err(e) = fs::create_dir_all(parent).await
        {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &blob_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        debug!(%path, size, "blob written");
        Ok(StoredBlob { path, size })
    }

    async fn get_stream(&self, path: &StoragePath) -> Result<BoxReader, StorageError> {
        let blob_path = self.blob_path(path);
        match fs::File::open(&blob_path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(*path))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, path: &StoragePath) -> bool {
        let blob_path = self.blob_path(path);
        match fs::try_exists(&blob_path).await {
            Ok(found) => found,
            Err(e) => {
                warn!(%path, error = %e, "blob existence check failed");
                false
            }
        }
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), StorageError> {
        let blob_path = self.blob_path(path);
        match fs::remove_file(&blob_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(*path))
            }
            Err(e) => Err(e.into()),
        }
    }
}
