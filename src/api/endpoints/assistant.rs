//! Review assistant endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::assistant::{AssistantSession, Message, QuickAction, QUICK_ACTIONS};

#[derive(Deserialize)]
pub struct AskRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct AskResponse {
    /// `None` when the question was blank and ignored.
    pub reply: Option<Message>,
}

/// `GET /api/documents/:id/assistant`: the transcript, started on first use.
pub async fn session(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<AssistantSession>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(ctx.core.assistant_session(&id)?))
}

/// `POST /api/documents/:id/assistant`: answers after the simulated delay.
pub async fn ask(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let id = parse_id(&id)?;
    let reply = ctx.core.ask_assistant(&id, &req.message).await?;
    Ok(Json(AskResponse { reply }))
}

pub async fn quick_actions() -> Json<&'static [QuickAction]> {
    Json(QUICK_ACTIONS)
}

pub async fn run_quick_action(
    State(ctx): State<ApiContext>,
    Path((id, action)): Path<(String, String)>,
) -> Result<Json<AskResponse>, ApiError> {
    let id = parse_id(&id)?;
    let reply = ctx.core.assistant_quick_action(&id, &action).await?;
    Ok(Json(AskResponse { reply }))
}
