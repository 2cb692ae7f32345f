use common::storage::StorageError;
use thiserror::Error;
use uuid::Uuid;

use crate::metadata::MetadataError;

/// Failures surfaced by [`super::DocumentCoordinator`].
///
/// The two not-found cases stay distinct so a missing record can be told
/// apart from a record whose blob has gone.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("{0}")]
    Validation(String),

    #[error("document {0} not found")]
    DocumentNotFound(Uuid),

    #[error("blob for document {id} is missing from storage")]
    BlobMissing { id: Uuid },

    #[error(transparent)]
    StorageIo(StorageError),

    #[error(transparent)]
    Persistence(#[from] MetadataError),
}

impl DocumentError {
    /// Machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DocumentNotFound(_) => "DOCUMENT_NOT_FOUND",
            Self::BlobMissing { .. } => "BLOB_MISSING",
            Self::StorageIo(_) => "STORAGE_IO_ERROR",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }
}

impl From<StorageError> for DocumentError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SizeLimitExceeded { limit, .. } => {
                Self::Validation(format!("File exceeds maximum size of {limit} bytes"))
            }
            other => Self::StorageIo(other),
        }
    }
}
