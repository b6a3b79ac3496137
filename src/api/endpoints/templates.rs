//! Template screen endpoints.
//!
//! - `GET  /api/templates`: catalog with humanized field labels and options
//! - `POST /api/templates/:id/use` / `POST /api/templates/:id/edit`
//! - `GET  /api/template-screen`, `POST /api/template-screen/create|back`
//! - `PUT  /api/template-screen/form`: replace form values
//! - `POST /api/template-screen/form/actions/:action`: reset / save_draft / submit
//! - `POST /api/template-screen/form/shortcut`: Alt+R / Alt+D / Alt+S
//! - `GET  /api/template-entries`: saved drafts and submitted entries

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::templates::{
    FormAction, FormOutcome, RegisterEntry, RegisterEntryForm, SavedEntry, SelectOption,
    Template, TemplateScreen, PARTIES, SUPPLIERS, TEMPLATES,
};

#[derive(Serialize)]
pub struct TemplateCard {
    #[serde(flatten)]
    pub template: &'static Template,
    pub field_labels: Vec<String>,
}

#[derive(Serialize)]
pub struct CatalogResponse {
    pub templates: Vec<TemplateCard>,
    pub suppliers: &'static [SelectOption],
    pub parties: &'static [SelectOption],
}

#[derive(Deserialize)]
pub struct ShortcutRequest {
    #[serde(default)]
    pub alt: bool,
    pub key: String,
}

#[derive(Serialize)]
pub struct ShortcutResponse {
    /// `None` when the key press is not a shortcut.
    pub outcome: Option<FormOutcome>,
}

#[derive(Serialize)]
pub struct EntriesResponse {
    pub drafts: Vec<SavedEntry>,
    pub entries: Vec<SavedEntry>,
}

pub async fn catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        templates: TEMPLATES
            .iter()
            .map(|t| TemplateCard {
                template: t,
                field_labels: t.field_labels(),
            })
            .collect(),
        suppliers: SUPPLIERS,
        parties: PARTIES,
    })
}

pub async fn use_template(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<RegisterEntryForm>, ApiError> {
    Ok(Json(ctx.core.use_template(&id)?))
}

pub async fn edit_template(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<RegisterEntryForm>, ApiError> {
    Ok(Json(ctx.core.edit_template(&id)?))
}

pub async fn screen(State(ctx): State<ApiContext>) -> Result<Json<TemplateScreen>, ApiError> {
    Ok(Json(ctx.core.template_screen()?))
}

pub async fn create(State(ctx): State<ApiContext>) -> Result<Json<RegisterEntryForm>, ApiError> {
    Ok(Json(ctx.core.create_template()?))
}

pub async fn back(State(ctx): State<ApiContext>) -> Result<Json<TemplateScreen>, ApiError> {
    Ok(Json(ctx.core.templates_back()?))
}

pub async fn update_form(
    State(ctx): State<ApiContext>,
    Json(entry): Json<RegisterEntry>,
) -> Result<Json<RegisterEntryForm>, ApiError> {
    Ok(Json(ctx.core.update_form(entry)?))
}

pub async fn form_action(
    State(ctx): State<ApiContext>,
    Path(action): Path<FormAction>,
) -> Result<Json<FormOutcome>, ApiError> {
    Ok(Json(ctx.core.form_action(action)?))
}

pub async fn shortcut(
    State(ctx): State<ApiContext>,
    Json(req): Json<ShortcutRequest>,
) -> Result<Json<ShortcutResponse>, ApiError> {
    Ok(Json(ShortcutResponse {
        outcome: ctx.core.form_shortcut(req.alt, &req.key)?,
    }))
}

pub async fn entries(State(ctx): State<ApiContext>) -> Result<Json<EntriesResponse>, ApiError> {
    let (drafts, entries) = ctx.core.saved_entries()?;
    Ok(Json(EntriesResponse { drafts, entries }))
}
