//! Export endpoints.
//!
//! `POST /api/export` answers with the artifact itself as a download
//! (`Content-Disposition: attachment`); the new history record id is in
//! the `x-export-id` header.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::core_state::ExportScreen;
use crate::export::ExportArtifact;
use crate::models::ExportFormat;

pub const EXPORT_ID_HEADER: &str = "x-export-id";

#[derive(Deserialize, Default)]
pub struct ExportRequest {
    /// Overrides the screen's checkbox selection.
    #[serde(default)]
    pub ids: Option<Vec<Uuid>>,
    #[serde(default)]
    pub format: Option<ExportFormat>,
}

/// Turn an artifact into a download response.
pub fn attachment(artifact: ExportArtifact, export_id: Uuid) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", artifact.file_name);
    (
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::HeaderName::from_static(EXPORT_ID_HEADER), export_id.to_string()),
        ],
        artifact.body,
    )
        .into_response()
}

/// `GET /api/export`: documents ready for export plus selection state.
pub async fn screen(State(ctx): State<ApiContext>) -> Result<Json<ExportScreen>, ApiError> {
    Ok(Json(ctx.core.export_screen()?))
}

pub async fn toggle(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<ExportScreen>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(ctx.core.toggle_export_selection(id)?))
}

pub async fn toggle_all(State(ctx): State<ApiContext>) -> Result<Json<ExportScreen>, ApiError> {
    Ok(Json(ctx.core.toggle_export_all()?))
}

/// `POST /api/export`: export the selection (JSON unless `format` says otherwise).
pub async fn run(
    State(ctx): State<ApiContext>,
    Json(req): Json<ExportRequest>,
) -> Result<Response, ApiError> {
    let format = req.format.unwrap_or(ExportFormat::Json);
    let result = ctx.core.export(req.ids, format)?;
    Ok(attachment(result.artifact, result.record.id))
}
