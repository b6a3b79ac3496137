//! Dashboard and view-state endpoints.
//!
//! - `GET  /api/dashboard`: totals and recent activity
//! - `GET  /api/view` / `PUT /api/view`: active screen
//! - `POST /api/view/back`: return to the dashboard
//! - `GET  /api/quick-actions` / `POST /api/quick-actions/:id`

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::dashboard::DashboardSummary;
use crate::models::View;
use crate::navigation::{NavAction, DASHBOARD_ACTIONS};

#[derive(Serialize)]
pub struct ViewResponse {
    pub active_view: View,
}

#[derive(Deserialize)]
pub struct NavigateRequest {
    pub view: View,
}

pub async fn summary(State(ctx): State<ApiContext>) -> Result<Json<DashboardSummary>, ApiError> {
    Ok(Json(ctx.core.dashboard()?))
}

pub async fn current_view(State(ctx): State<ApiContext>) -> Result<Json<ViewResponse>, ApiError> {
    Ok(Json(ViewResponse {
        active_view: ctx.core.active_view()?,
    }))
}

pub async fn navigate(
    State(ctx): State<ApiContext>,
    Json(req): Json<NavigateRequest>,
) -> Result<Json<ViewResponse>, ApiError> {
    Ok(Json(ViewResponse {
        active_view: ctx.core.navigate(req.view)?,
    }))
}

pub async fn back(State(ctx): State<ApiContext>) -> Result<Json<ViewResponse>, ApiError> {
    Ok(Json(ViewResponse {
        active_view: ctx.core.back()?,
    }))
}

pub async fn quick_actions() -> Json<&'static [NavAction]> {
    Json(DASHBOARD_ACTIONS)
}

pub async fn run_quick_action(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<ViewResponse>, ApiError> {
    Ok(Json(ViewResponse {
        active_view: ctx.core.dashboard_action(&id)?,
    }))
}
