use std::path::Path as FsPath;

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, body::Body};
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::instrument;
use uuid::Uuid;

use crate::coordinator::{DocumentCoordinator, PDF_MEDIA_TYPE, UploadRequest};
use crate::error::{AppError, ErrorBody};
use crate::models::document::{DeleteResponse, DocumentResponse};
use crate::state::AppState;

/// Multipart framing allowance on top of the blob size limit.
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

pub fn upload_body_limit(max_blob_size: u64) -> DefaultBodyLimit {
    let limit = max_blob_size.saturating_add(MULTIPART_OVERHEAD);
    DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "Documents",
    operation_id = "uploadDocument",
    summary = "Upload a PDF document",
    description = "Uploads a single PDF. The `file` multipart field is required and its declared \
        content type must be `application/pdf` (guessed from the filename when the part has none).",
    request_body(content_type = "multipart/form-data", description = "PDF file in the `file` field"),
    responses(
        (status = 201, description = "Document stored", body = DocumentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage or database failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue; // Ignore unknown fields.
        }

        let filename = field.file_name().map(str::to_string).unwrap_or_default();
        let media_type = match field.content_type() {
            Some(declared) => declared.to_string(),
            None => mime_guess::from_path(&filename)
                .first_or_octet_stream()
                .to_string(),
        };

        // Fail before spooling anything to disk.
        DocumentCoordinator::validate_upload(&filename, &media_type)?;

        let temp_path = std::env::temp_dir().join(format!("docvault-upload-{}", Uuid::new_v4()));
        let result = async {
            let size =
                spool_field_to_file(field, &temp_path, state.config.storage.max_blob_size).await?;
            let file = tokio::fs::File::open(&temp_path)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to reopen temp file: {e}")))?;

            let record = state
                .documents
                .upload(UploadRequest {
                    filename,
                    media_type,
                    size: Some(size),
                    body: Box::new(file),
                })
                .await?;
            Ok::<_, AppError>(record)
        }
        .await;

        // Best effort.
        let _ = tokio::fs::remove_file(&temp_path).await;

        let record = result?;
        return Ok((StatusCode::CREATED, Json(DocumentResponse::from(record))));
    }

    Err(AppError::Validation("No file uploaded.".into()))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Documents",
    operation_id = "listDocuments",
    summary = "List documents",
    description = "Returns every document, newest first.",
    responses(
        (status = 200, description = "Document list", body = Vec<DocumentResponse>),
        (status = 500, description = "Database failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<DocumentResponse>>, AppError> {
    let records = state.documents.list().await?;
    Ok(Json(records.into_iter().map(DocumentResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Documents",
    operation_id = "downloadDocument",
    summary = "Download a document",
    description = "Streams the stored PDF with its original filename as the download name.",
    params(("id" = String, Path, description = "Document ID (UUID)")),
    responses(
        (status = 200, description = "PDF content (application/pdf)"),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Document or its file not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Storage or database failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn download_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_document_id(&id)?;
    let download = state.documents.download(id).await?;

    let body = Body::from_stream(ReaderStream::new(download.body));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, PDF_MEDIA_TYPE)
        .header(header::CONTENT_LENGTH, download.record.size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&download.record.filename),
        )
        .header(header::CACHE_CONTROL, "no-store")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Documents",
    operation_id = "deleteDocument",
    summary = "Delete a document",
    description = "Removes the stored file and its metadata. A file that is already missing \
        does not prevent the metadata from being removed.",
    params(("id" = String, Path, description = "Document ID (UUID)")),
    responses(
        (status = 200, description = "Document deleted", body = DeleteResponse),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Document not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Database failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_document_id(&id)?;
    state.documents.delete(id).await?;

    Ok(Json(DeleteResponse {
        message: "Document deleted successfully.".into(),
    }))
}

fn parse_document_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation("Invalid document ID".into()))
}

/// Build a safe `Content-Disposition` header value.
///
/// The stored filename is untrusted, so the plain `filename` parameter keeps
/// only printable ASCII and the exact name goes in RFC 5987 `filename*`.
fn content_disposition_value(filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\' | '/'))
        .collect();
    let ascii_name = if ascii_safe.is_empty() {
        "document.pdf".to_string()
    } else {
        ascii_safe
    };

    let encoded: String = filename
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => String::from(b as char),
            _ => format!("%{b:02X}"),
        })
        .collect();

    format!("attachment; filename=\"{ascii_name}\"; filename*=UTF-8''{encoded}")
}

/// Copy a multipart field into `temp_path`, returning the byte count.
async fn spool_field_to_file(
    mut field: axum::extract::multipart::Field<'_>,
    temp_path: &FsPath,
    max_size: u64,
) -> Result<u64, AppError> {
    let mut temp_file = tokio::fs::File::create(temp_path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;

    let mut total_size: u64 = 0;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        total_size += chunk.len() as u64;
        if total_size > max_size {
            return Err(AppError::Validation(format!(
                "File exceeds maximum size of {max_size} bytes"
            )));
        }
        temp_file
            .write_all(&chunk)
            .await
            .map_err(|e| AppError::Internal(format!("Temp file write failed: {e}")))?;
    }

    temp_file
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("Temp file flush failed: {e}")))?;

    Ok(total_size)
}
