//! API router.
//!
//! Returns a composable `Router` with every dashboard operation nested
//! under `/api/`, wrapped in request logging and a permissive CORS layer
//! for the browser front-end.

use std::sync::Arc;

use axum::http::header;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::endpoints::export::EXPORT_ID_HEADER;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        // Dashboard & navigation
        .route("/dashboard", get(endpoints::dashboard::summary))
        .route(
            "/view",
            get(endpoints::dashboard::current_view).put(endpoints::dashboard::navigate),
        )
        .route("/view/back", post(endpoints::dashboard::back))
        .route("/quick-actions", get(endpoints::dashboard::quick_actions))
        .route("/quick-actions/:id", post(endpoints::dashboard::run_quick_action))
        // Documents & upload
        .route(
            "/documents",
            get(endpoints::documents::list).post(endpoints::documents::upload),
        )
        .route(
            "/documents/:id",
            get(endpoints::documents::detail).put(endpoints::documents::update),
        )
        // Review
        .route("/documents/:id/review", post(endpoints::review::open))
        .route("/review", get(endpoints::review::current))
        .route("/review/edit", put(endpoints::review::set_editing))
        .route("/review/fields/:key", put(endpoints::review::update_field))
        .route("/review/fields/:key/approve", post(endpoints::review::approve_field))
        .route("/review/fields/:key/reject", post(endpoints::review::reject_field))
        .route("/review/line-items/:index", put(endpoints::review::update_line_item))
        .route("/review/approve", post(endpoints::review::approve))
        .route("/review/reject", post(endpoints::review::reject))
        .route("/review/save", post(endpoints::review::save))
        // Assistant
        .route(
            "/documents/:id/assistant",
            get(endpoints::assistant::session).post(endpoints::assistant::ask),
        )
        .route(
            "/documents/:id/assistant/quick/:action",
            post(endpoints::assistant::run_quick_action),
        )
        .route("/assistant/quick-actions", get(endpoints::assistant::quick_actions))
        // Export & history
        .route(
            "/export",
            get(endpoints::export::screen).post(endpoints::export::run),
        )
        .route("/export/selection/:id", post(endpoints::export::toggle))
        .route("/export/select-all", post(endpoints::export::toggle_all))
        .route("/history", get(endpoints::history::list))
        .route("/history/:id", get(endpoints::history::detail))
        .route("/history/:id/download", get(endpoints::history::download))
        // Templates
        .route("/templates", get(endpoints::templates::catalog))
        .route("/templates/:id/use", post(endpoints::templates::use_template))
        .route("/templates/:id/edit", post(endpoints::templates::edit_template))
        .route("/template-screen", get(endpoints::templates::screen))
        .route("/template-screen/create", post(endpoints::templates::create))
        .route("/template-screen/back", post(endpoints::templates::back))
        .route("/template-screen/form", put(endpoints::templates::update_form))
        .route(
            "/template-screen/form/actions/:action",
            post(endpoints::templates::form_action),
        )
        .route(
            "/template-screen/form/shortcut",
            post(endpoints::templates::shortcut),
        )
        .route("/template-entries", get(endpoints::templates::entries))
        .with_state(ctx);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            header::CONTENT_DISPOSITION,
            header::HeaderName::from_static(EXPORT_ID_HEADER),
        ]);

    Router::new()
        .nest("/api", api)
        .layer(axum::middleware::from_fn(middleware::request_log::log_request))
        .layer(cors)
}
