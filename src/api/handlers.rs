use axum::{http::StatusCode, response::IntoResponse, Json};
use std::collections::HashMap;

use crate::api::errors::ApiError;
use crate::core::metrics;
use crate::core::state::AppState;
use crate::routing::ITEMS_PATH;
use crate::schemas::{HealthResponse, RootResponse};

pub(crate) fn root(state: &AppState) -> Json<RootResponse> {
    let api = state.settings().api();
    let response = RootResponse {
        message: api.project_name.clone(),
        version: api.version.clone(),
        items_url: ITEMS_PATH.to_string(),
    };

    Json(response)
}

pub(crate) async fn healthz(state: &AppState) -> impl IntoResponse {
    let store = state.items();
    let component = format!("store:{}", store.backend().as_str());
    let mut components = HashMap::new();

    let status = match store.ping().await {
        Ok(()) => {
            components.insert(component, "healthy".to_string());
            StatusCode::OK
        }
        Err(err) => {
            tracing::warn!(error = %err, "Item store health check failed");
            components.insert(component, format!("unhealthy: {err}"));
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    let body = HealthResponse {
        service: "item-cart".to_string(),
        status: if status == StatusCode::OK { "healthy" } else { "unhealthy" }.to_string(),
        components,
    };
    (status, Json(body))
}

pub(crate) fn metrics(state: &AppState) -> Result<impl IntoResponse, ApiError> {
    if !state.settings().telemetry().prometheus_enabled {
        return Err(ApiError::NotFound("Metrics are disabled".to_string()));
    }

    let body = metrics::render().ok_or_else(|| {
        ApiError::ServiceUnavailable("Metrics recorder is not installed".to_string())
    })?;
    Ok(([(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
