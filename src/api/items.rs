use axum::{
    body::Body,
    extract::FromRequest,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::routing::{CrudAction, PathParams};
use crate::schemas::item::{ItemCreate, ItemEnvelope, ItemResponse, ItemUpdate};

pub(crate) async fn handle(
    state: &AppState,
    action: CrudAction,
    params: &PathParams,
    request: Request<Body>,
) -> Response {
    let result = match action {
        CrudAction::Index => index(state).await.map(IntoResponse::into_response),
        CrudAction::Create => create(state, request).await.map(IntoResponse::into_response),
        CrudAction::Update => update(state, params, request).await.map(IntoResponse::into_response),
        CrudAction::Destroy => destroy(state, params).await.map(IntoResponse::into_response),
    };

    result.unwrap_or_else(IntoResponse::into_response)
}

async fn index(state: &AppState) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let items = state
        .items()
        .list_items()
        .await
        .map_err(|err| ApiError::from_store(err, "Failed to list items"))?;

    Ok(Json(items.into_iter().map(ItemResponse::from_db).collect()))
}

async fn create(
    state: &AppState,
    request: Request<Body>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let payload: ItemCreate = read_payload(request).await?;
    let item = state
        .items()
        .create_item(payload)
        .await
        .map_err(|err| ApiError::from_store(err, "Failed to create item"))?;

    tracing::info!(item_id = item.id, "Item created");
    Ok((StatusCode::CREATED, Json(ItemResponse::from_db(item))))
}

async fn update(
    state: &AppState,
    params: &PathParams,
    request: Request<Body>,
) -> Result<Json<ItemResponse>, ApiError> {
    let id = item_id(params)?;
    let payload: ItemUpdate = read_payload(request).await?;
    let item = state
        .items()
        .update_item(id, payload)
        .await
        .map_err(|err| ApiError::from_store(err, "Failed to update item"))?;

    tracing::info!(item_id = item.id, "Item updated");
    Ok(Json(ItemResponse::from_db(item)))
}

async fn destroy(state: &AppState, params: &PathParams) -> Result<StatusCode, ApiError> {
    let id = item_id(params)?;
    state
        .items()
        .delete_item(id)
        .await
        .map_err(|err| ApiError::from_store(err, "Failed to delete item"))?;

    tracing::info!(item_id = id, "Item deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn read_payload<T>(request: Request<Body>) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let Json(envelope) = Json::<ItemEnvelope<T>>::from_request(request, &()).await?;
    Ok(envelope.into_inner())
}

/// Ids outside the positive `i64` range can never name a stored item.
fn item_id(params: &PathParams) -> Result<i64, ApiError> {
    let raw = params.get("id").unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::NotFound(format!("Couldn't find Item with 'id'={raw}"))),
    }
}

#[cfg(test)]
mod tests;
