//! Document metadata persistence.

mod db;

pub use db::DbMetadataStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::storage::StoragePath;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::entity::document;

/// A persisted document, as seen by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub id: Uuid,
    /// Original client-supplied name. Only ever used as a download hint.
    pub filename: String,
    /// Server-local blob locator. Never leaves the process.
    pub storage_path: StoragePath,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when registering a new document.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub filename: String,
    pub storage_path: StoragePath,
    pub size: u64,
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("document {0} not found")]
    NotFound(Uuid),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("corrupt document row: {0}")]
    Corrupt(String),
}

/// Persistent store of document records.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Insert a record. The store assigns `id` and `created_at`.
    async fn create(&self, new: NewDocument) -> Result<DocumentRecord, MetadataError>;

    /// All records, newest first. Never cached.
    async fn list(&self) -> Result<Vec<DocumentRecord>, MetadataError>;

    /// Look up a record. Absence is `Ok(None)`, not an error.
    async fn get(&self, id: Uuid) -> Result<Option<DocumentRecord>, MetadataError>;

    /// Remove a record. Fails with [`MetadataError::NotFound`] if absent.
    async fn delete(&self, id: Uuid) -> Result<(), MetadataError>;
}

impl TryFrom<document::Model> for DocumentRecord {
    type Error = MetadataError;

    fn try_from(model: document::Model) -> Result<Self, Self::Error> {
        let storage_path = StoragePath::parse(&model.storage_path)
            .map_err(|e| MetadataError::Corrupt(format!("document {}: {e}", model.id)))?;
        let size = u64::try_from(model.size).map_err(|_| {
            MetadataError::Corrupt(format!("document {}: negative size {}", model.id, model.size))
        })?;

        Ok(Self {
            id: model.id,
            filename: model.filename,
            storage_path,
            size,
            created_at: model.created_at,
        })
    }
}
