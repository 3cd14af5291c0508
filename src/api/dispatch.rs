use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
};

use crate::api::{errors::ApiError, handlers, items};
use crate::core::state::AppState;
use crate::routing::{Action, MatchResult, PathParams};

/// Single entry point for every request: resolve through the route table,
/// then hand off to the action.
pub(crate) async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let result = state.routes().lookup(request.method().as_str(), request.uri().path());
    crate::core::metrics::record_dispatch(result.outcome());
    tracing::debug!(
        method = %request.method(),
        path = %request.uri().path(),
        outcome = result.outcome(),
        "route resolved"
    );

    match result {
        MatchResult::Matched { action, params } => invoke(&state, action, &params, request).await,
        MatchResult::MethodNotAllowedForPath { allowed } => {
            ApiError::MethodNotAllowed(allowed).into_response()
        }
        MatchResult::NoRouteMatched => ApiError::NotFound(format!(
            "No route matches [{}] \"{}\"",
            request.method(),
            request.uri().path()
        ))
        .into_response(),
    }
}

async fn invoke(
    state: &AppState,
    action: Action,
    params: &PathParams,
    request: Request<Body>,
) -> Response {
    match action {
        Action::SiteIndex => handlers::root(state).into_response(),
        Action::Items(crud) => items::handle(state, crud, params, request).await,
        Action::Healthz => handlers::healthz(state).await.into_response(),
        Action::Metrics => handlers::metrics(state).into_response(),
    }
}
