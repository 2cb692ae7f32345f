//! Keeps blobs and their metadata records consistent.
//!
//! Writes go blob first, then metadata; deletes go blob first, then metadata.
//! A crash in between leaves an orphan blob or a record with a missing blob,
//! both of which are detectable rather than silently masked.

mod error;

pub use error::DocumentError;

use std::sync::Arc;

use common::storage::{BlobStore, BoxReader, StorageError, StoragePath};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::metadata::{DocumentRecord, MetadataError, MetadataStore, NewDocument};

/// The only media type accepted for upload.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// An incoming upload as decoded by the HTTP layer.
pub struct UploadRequest {
    pub filename: String,
    /// Client-declared media type.
    pub media_type: String,
    /// Client-declared byte count, if known.
    pub size: Option<u64>,
    pub body: BoxReader,
}

/// A document ready to be streamed back to a client.
pub struct DocumentDownload {
    pub record: DocumentRecord,
    pub body: BoxReader,
}

pub struct DocumentCoordinator {
    blobs: Arc<dyn BlobStore>,
    metadata: Arc<dyn MetadataStore>,
}

impl DocumentCoordinator {
    pub fn new(blobs: Arc<dyn BlobStore>, metadata: Arc<dyn MetadataStore>) -> Self {
        Self { blobs, metadata }
    }

    /// Check upload inputs before any bytes are stored.
    ///
    /// Only the declared media type is checked; file content is not sniffed.
    pub fn validate_upload(filename: &str, media_type: &str) -> Result<(), DocumentError> {
        if filename.trim().is_empty() {
            return Err(DocumentError::Validation(
                "File must have a filename".into(),
            ));
        }

        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        if !essence.eq_ignore_ascii_case(PDF_MEDIA_TYPE) {
            return Err(DocumentError::Validation(format!(
                "Only PDF files are allowed (got '{essence}')"
            )));
        }

        Ok(())
    }

    /// Store a new document and register its metadata.
    #[instrument(skip(self, request), fields(filename = %request.filename))]
    pub async fn upload(&self, request: UploadRequest) -> Result<DocumentRecord, DocumentError> {
        Self::validate_upload(&request.filename, &request.media_type)?;

        let stored = self.blobs.put_stream(request.body, request.size).await?;

        if let Some(declared) = request.size
            && declared != stored.size
        {
            warn!(declared, actual = stored.size, "declared size differs from bytes received");
        }

        let new = NewDocument {
            filename: request.filename,
            storage_path: stored.path,
            size: stored.size,
        };

        match self.metadata.create(new).await {
            Ok(record) => {
                info!(id = %record.id, size = record.size, "document uploaded");
                Ok(record)
            }
            Err(err) => {
                self.discard_orphan(&stored.path).await;
                Err(err.into())
            }
        }
    }

    /// All documents, newest first.
    pub async fn list(&self) -> Result<Vec<DocumentRecord>, DocumentError> {
        Ok(self.metadata.list().await?)
    }

    /// Look up a document and open its blob for streaming.
    #[instrument(skip(self))]
    pub async fn download(&self, id: Uuid) -> Result<DocumentDownload, DocumentError> {
        let record = self
            .metadata
            .get(id)
            .await?
            .ok_or(DocumentError::DocumentNotFound(id))?;

        if !self.blobs.exists(&record.storage_path).await {
            warn!(storage_path = %record.storage_path, "document record has no blob");
            return Err(DocumentError::BlobMissing { id });
        }

        // The blob can still vanish between the existence check and the open.
        let body = match self.blobs.get_stream(&record.storage_path).await {
            Ok(body) => body,
            Err(StorageError::NotFound(_)) => {
                warn!(storage_path = %record.storage_path, "blob removed before it could be opened");
                return Err(DocumentError::BlobMissing { id });
            }
            Err(e) => return Err(e.into()),
        };

        Ok(DocumentDownload { record, body })
    }

    /// Remove a document's blob and its record.
    ///
    /// A failed blob delete is logged and does not stop the record from being
    /// removed. A failed record delete is always reported.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), DocumentError> {
        let record = self
            .metadata
            .get(id)
            .await?
            .ok_or(DocumentError::DocumentNotFound(id))?;

        if let Err(e) = self.blobs.delete(&record.storage_path).await {
            warn!(
                storage_path = %record.storage_path,
                error = %e,
                "failed to delete blob, removing metadata anyway"
            );
        }

        match self.metadata.delete(id).await {
            Ok(()) => {
                info!("document deleted");
                Ok(())
            }
            Err(MetadataError::NotFound(_)) => Err(DocumentError::DocumentNotFound(id)),
            Err(e) => {
                error!(error = %e, "failed to delete document record after blob removal");
                Err(e.into())
            }
        }
    }

    async fn discard_orphan(&self, path: &StoragePath) {
        match self.blobs.delete(path).await {
            Ok(()) => warn!(storage_path = %path, "metadata write failed, blob removed"),
            Err(e) => error!(
                storage_path = %path,
                error = %e,
                "metadata write failed and orphan blob could not be removed"
            ),
        }
    }
}
