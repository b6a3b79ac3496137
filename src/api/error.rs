//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::export::ExportError;
use crate::pipeline::ExtractionError;
use crate::review::ReviewError;
use crate::store::StoreError;
use crate::templates::{FieldIssue, TemplateError};

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<FieldIssue>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    /// The request is valid but the screen is not in a state to take it.
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Validation failed")]
    Validation(Vec<FieldIssue>),
    #[error("Not implemented: {0}")]
    NotImplemented(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, issues) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail, Vec::new()),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail, Vec::new())
            }
            ApiError::Conflict(detail) => (StatusCode::CONFLICT, "CONFLICT", detail, Vec::new()),
            ApiError::Validation(issues) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_FAILED",
                "Register entry is invalid".to_string(),
                issues,
            ),
            ApiError::NotImplemented(detail) => (
                StatusCode::NOT_IMPLEMENTED,
                "NOT_IMPLEMENTED",
                detail,
                Vec::new(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                    Vec::new(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                issues,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::UnknownAction(_) => ApiError::NotFound(message),
            CoreError::Store(StoreError::NotFound(_)) => ApiError::NotFound(message),
            CoreError::Review(e) => match e {
                ReviewError::NoActiveReview | ReviewError::NotEditing => ApiError::Conflict(message),
                ReviewError::UnknownField(_) | ReviewError::LineItemOutOfRange { .. } => {
                    ApiError::BadRequest(message)
                }
            },
            CoreError::Export(e) => match e {
                ExportError::NothingSelected => ApiError::BadRequest(message),
                ExportError::UnsupportedFormat(_) => ApiError::NotImplemented(message),
                ExportError::RecordNotFound(_) => ApiError::NotFound(message),
                ExportError::Serialization(_) => ApiError::Internal(message),
            },
            CoreError::Extraction(e) => match e {
                ExtractionError::InvalidPayload(_) => ApiError::BadRequest(message),
                ExtractionError::Engine(_) => ApiError::Internal(message),
            },
            CoreError::Template(e) => match e {
                TemplateError::NotFound(_) => ApiError::NotFound(message),
                TemplateError::NoOpenForm => ApiError::Conflict(message),
                TemplateError::Invalid(issues) => ApiError::Validation(issues),
            },
        }
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        CoreError::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use uuid::Uuid;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let response = ApiError::NotFound("Document not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "Document not found");
        assert!(json["error"].get("issues").is_none());
    }

    #[tokio::test]
    async fn internal_hides_detail() {
        let response = ApiError::Internal("something broke".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn validation_lists_issues() {
        let issues = vec![FieldIssue {
            field: "amount",
            message: "must not be negative".into(),
        }];
        let response = ApiError::Validation(issues).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["issues"][0]["field"], "amount");
    }

    #[tokio::test]
    async fn empty_export_selection_is_bad_request_with_message() {
        let err: ApiError = CoreError::from(ExportError::NothingSelected).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(
            json["error"]["message"],
            "Please select at least one document to export"
        );
    }

    #[test]
    fn core_errors_map_to_statuses() {
        let cases: Vec<(CoreError, StatusCode)> = vec![
            (StoreError::NotFound(Uuid::nil()).into(), StatusCode::NOT_FOUND),
            (ReviewError::NoActiveReview.into(), StatusCode::CONFLICT),
            (ReviewError::NotEditing.into(), StatusCode::CONFLICT),
            (ReviewError::UnknownField("x".into()).into(), StatusCode::BAD_REQUEST),
            (
                ExportError::UnsupportedFormat(crate::models::ExportFormat::Xml).into(),
                StatusCode::NOT_IMPLEMENTED,
            ),
            (
                ExtractionError::InvalidPayload("bad".into()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (TemplateError::NoOpenForm.into(), StatusCode::CONFLICT),
            (CoreError::LockPoisoned, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
