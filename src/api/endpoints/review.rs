//! Review endpoints. All except `open` act on the review currently open.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::models::{Document, FieldValue, LineItemColumn};
use crate::review::{ReviewData, ReviewOutcome};

#[derive(Deserialize)]
pub struct FieldUpdate {
    pub value: FieldValue,
}

#[derive(Deserialize)]
pub struct LineItemUpdate {
    pub column: LineItemColumn,
    pub value: String,
}

#[derive(Deserialize)]
pub struct EditModeRequest {
    pub editing: bool,
}

/// `POST /api/documents/:id/review`
pub async fn open(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<ReviewData>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(ctx.core.open_review(&id)?))
}

pub async fn current(State(ctx): State<ApiContext>) -> Result<Json<ReviewData>, ApiError> {
    Ok(Json(ctx.core.review()?))
}

pub async fn approve_field(
    State(ctx): State<ApiContext>,
    Path(key): Path<String>,
) -> Result<Json<ReviewData>, ApiError> {
    Ok(Json(ctx.core.approve_field(&key)?))
}

pub async fn reject_field(
    State(ctx): State<ApiContext>,
    Path(key): Path<String>,
) -> Result<Json<ReviewData>, ApiError> {
    Ok(Json(ctx.core.reject_field(&key)?))
}

pub async fn update_field(
    State(ctx): State<ApiContext>,
    Path(key): Path<String>,
    Json(req): Json<FieldUpdate>,
) -> Result<Json<ReviewData>, ApiError> {
    Ok(Json(ctx.core.update_field(&key, req.value)?))
}

pub async fn update_line_item(
    State(ctx): State<ApiContext>,
    Path(index): Path<usize>,
    Json(req): Json<LineItemUpdate>,
) -> Result<Json<ReviewData>, ApiError> {
    Ok(Json(ctx.core.update_line_item(index, req.column, req.value)?))
}

pub async fn set_editing(
    State(ctx): State<ApiContext>,
    Json(req): Json<EditModeRequest>,
) -> Result<Json<ReviewData>, ApiError> {
    Ok(Json(ctx.core.set_editing(req.editing)?))
}

pub async fn approve(State(ctx): State<ApiContext>) -> Result<Json<Document>, ApiError> {
    Ok(Json(ctx.core.finish_review(ReviewOutcome::Approve)?))
}

pub async fn reject(State(ctx): State<ApiContext>) -> Result<Json<Document>, ApiError> {
    Ok(Json(ctx.core.finish_review(ReviewOutcome::Reject)?))
}

pub async fn save(State(ctx): State<ApiContext>) -> Result<Json<Document>, ApiError> {
    Ok(Json(ctx.core.finish_review(ReviewOutcome::Save)?))
}
