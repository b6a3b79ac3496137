//! Export history endpoints.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::api::endpoints::export::attachment;
use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::history::{ExportRecord, ExportSummary};
use crate::models::ExportFormat;

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub format: Option<ExportFormat>,
}

/// `GET /api/history?format=`: newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ExportSummary>>, ApiError> {
    Ok(Json(ctx.core.history(query.format)?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<ExportRecord>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(ctx.core.history_record(&id)?))
}

/// `GET /api/history/:id/download`: re-download an export.
pub async fn download(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    Ok(attachment(ctx.core.redownload(&id)?, id))
}
