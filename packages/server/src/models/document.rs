use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::metadata::DocumentRecord;

/// Response DTO for a single document. The blob location is never exposed.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DocumentResponse {
    /// Document ID (UUIDv7).
    #[schema(example = "01936f0e-1234-7abc-8000-000000000001")]
    pub id: String,
    /// Original upload filename.
    #[schema(example = "report.pdf")]
    pub filename: String,
    /// Size in bytes.
    #[schema(example = 2048)]
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

/// Acknowledgement returned by delete.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DeleteResponse {
    #[schema(example = "Document deleted successfully.")]
    pub message: String,
}

impl From<DocumentRecord> for DocumentResponse {
    fn from(record: DocumentRecord) -> Self {
        Self {
            id: record.id.to_string(),
            filename: record.filename,
            size: record.size,
            created_at: record.created_at,
        }
    }
}
