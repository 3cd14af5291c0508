use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::routing::AllowedMethods;
use crate::store::StoreError;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: u16,
    detail: String,
}

#[derive(Debug)]
pub(crate) enum ApiError {
    NotFound(String),
    MethodNotAllowed(AllowedMethods),
    UnprocessableEntity(String),
    /// Body extraction failed: malformed JSON (400), wrong content type (415),
    /// oversized body (413) or mistyped fields (422).
    Rejected { status: StatusCode, detail: String },
    ServiceUnavailable(String),
    Internal(String),
}

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }

    /// Map a store failure; database errors are logged under `context`.
    pub(crate) fn from_store(err: StoreError, context: &str) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(format!("Couldn't find Item with 'id'={id}")),
            StoreError::Validation(errors) => Self::UnprocessableEntity(errors.to_string()),
            StoreError::Database(err) => Self::internal(err, context),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected { status: rejection.status(), detail: rejection.body_text() }
    }
}

fn json_error(status: StatusCode, detail: String) -> Response {
    (status, Json(ErrorResponse { status: status.as_u16(), detail })).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => json_error(StatusCode::NOT_FOUND, message),
            ApiError::MethodNotAllowed(allowed) => {
                let mut response = json_error(
                    StatusCode::METHOD_NOT_ALLOWED,
                    "Method not allowed for this path".to_string(),
                );
                if let Ok(value) = HeaderValue::from_str(&allowed.header_value()) {
                    response.headers_mut().insert(header::ALLOW, value);
                }
                response
            }
            ApiError::UnprocessableEntity(message) => {
                json_error(StatusCode::UNPROCESSABLE_ENTITY, message)
            }
            ApiError::Rejected { status, detail } => json_error(status, detail),
            ApiError::ServiceUnavailable(message) => {
                json_error(StatusCode::SERVICE_UNAVAILABLE, message)
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}
