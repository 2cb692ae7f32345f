use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Metadata row for an uploaded document.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document")]
pub struct Model {
    /// UUIDv7 primary key, generated by the metadata store.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Original client-supplied filename, stored verbatim.
    #[sea_orm(column_type = "Text")]
    pub filename: String,

    /// Blob store locator. Server-internal only.
    #[sea_orm(unique)]
    pub storage_path: String,

    pub size: i64,

    #[sea_orm(indexed)]
    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
