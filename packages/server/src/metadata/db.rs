use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{DocumentRecord, MetadataError, MetadataStore, NewDocument};
use crate::entity::document;

/// [`MetadataStore`] backed by a sea-orm connection pool.
///
/// Constructed once at start-up and shared; the pool is the only state.
#[derive(Clone)]
pub struct DbMetadataStore {
    db: DatabaseConnection,
}

impl DbMetadataStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MetadataStore for DbMetadataStore {
    #[instrument(skip(self, new), fields(storage_path = %new.storage_path))]
    async fn create(&self, new: NewDocument) -> Result<DocumentRecord, MetadataError> {
        let size = i64::try_from(new.size).map_err(|_| {
            MetadataError::Corrupt(format!("size {} does not fit the size column", new.size))
        })?;

        let model = document::ActiveModel {
            id: Set(Uuid::now_v7()),
            filename: Set(new.filename),
            storage_path: Set(new.storage_path.as_key()),
            size: Set(size),
            created_at: Set(Utc::now()),
        };

        let inserted = model.insert(&self.db).await?;

        debug!(id = %inserted.id, "document row inserted");
        DocumentRecord::try_from(inserted)
    }

    async fn list(&self) -> Result<Vec<DocumentRecord>, MetadataError> {
        document::Entity::find()
            .order_by_desc(document::Column::CreatedAt)
            .order_by_desc(document::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(DocumentRecord::try_from)
            .collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<DocumentRecord>, MetadataError> {
        document::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(DocumentRecord::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<(), MetadataError> {
        let result = document::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(MetadataError::NotFound(id));
        }
        Ok(())
    }
}
