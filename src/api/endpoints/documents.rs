//! Document endpoints.
//!
//! `POST /api/documents` takes an upload as `{ name, data }` with base64
//! content (raw or a `data:` URL), runs it through OCR and opens its review.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::core_state::UploadResult;
use crate::models::{Document, DocumentStatus};
use crate::pipeline::UploadedFile;

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<DocumentStatus>,
}

#[derive(Deserialize)]
pub struct UploadRequest {
    pub name: String,
    /// Base64 payload, optionally a `data:<mime>;base64,` URL.
    pub data: String,
}

/// `GET /api/documents?status=`: documents in upload order.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(ctx.core.documents(query.status)?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(ctx.core.document(&id)?))
}

/// `PUT /api/documents/:id`: replace a document. The body id must match.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(doc): Json<Document>,
) -> Result<Json<Document>, ApiError> {
    let id = parse_id(&id)?;
    if doc.id != id {
        return Err(ApiError::BadRequest(format!(
            "Body id {} does not match path id {id}",
            doc.id
        )));
    }
    Ok(Json(ctx.core.update_document(doc)?))
}

/// `POST /api/documents`: upload, extract and open for review.
pub async fn upload(
    State(ctx): State<ApiContext>,
    Json(req): Json<UploadRequest>,
) -> Result<Json<UploadResult>, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Upload needs a file name".into()));
    }
    let file = UploadedFile::from_base64(req.name, &req.data)?;
    tracing::info!(file = %file.name, bytes = file.bytes.len(), "Upload received");
    Ok(Json(ctx.core.upload(file).await?))
}
