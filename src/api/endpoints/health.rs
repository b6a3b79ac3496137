//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::config;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub app: &'static str,
    pub version: &'static str,
    pub documents: usize,
}

/// `GET /api/health`: liveness plus a document count.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let documents = ctx.core.read_store()?.len();

    Ok(Json(HealthResponse {
        status: "ok",
        app: config::APP_NAME,
        version: config::APP_VERSION,
        documents,
    }))
}
