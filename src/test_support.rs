use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::api;
use crate::core::{config::Settings, state::AppState};
use crate::routing;
use crate::store::MemoryItemStore;

const RESET_VARS: &[&str] = &[
    "ITEM_CART_HOST",
    "ITEM_CART_PORT",
    "ITEM_CART_STRICT_CONFIG",
    "ITEM_CART_MAX_BODY_BYTES",
    "ITEM_CART_LOG_LEVEL",
    "ITEM_CART_LOG_JSON",
    "ENVIRONMENT",
    "PROJECT_NAME",
    "VERSION",
    "BACKEND_CORS_ORIGINS",
    "ITEM_STORE",
    "DATABASE_URL",
    "POSTGRES_SERVER",
    "POSTGRES_PORT",
    "POSTGRES_USER",
    "POSTGRES_PASSWORD",
    "POSTGRES_DB",
];

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
    _guard: OwnedMutexGuard<()>,
}

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

/// `DATABASE_URL` as it was before any test reset the environment. Postgres
/// tests skip when it is unset.
pub(crate) fn test_database_url() -> Option<String> {
    static URL: OnceLock<Option<String>> = OnceLock::new();
    URL.get_or_init(|| {
        dotenvy::dotenv().ok();
        std::env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty())
    })
    .clone()
}

pub(crate) fn set_test_env() {
    test_database_url();
    for key in RESET_VARS {
        std::env::remove_var(key);
    }
    std::env::set_var("ITEM_CART_ENV", "test");
    std::env::set_var("PROMETHEUS_ENABLED", "0");
}

pub(crate) fn build_state(settings: Settings) -> AppState {
    let routes = routing::routes().expect("route table");
    AppState::new(settings, routes, Arc::new(MemoryItemStore::new()))
}

/// Fresh in-memory store and router; holds the env lock for the whole test.
pub(crate) async fn setup_test_context() -> TestContext {
    let guard = env_lock().await;
    set_test_env();

    let settings = Settings::load().expect("settings");
    let state = build_state(settings);
    let app = api::router::router(state.clone());

    TestContext { state, app, _guard: guard }
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    if let Some(body) = body {
        let bytes = serde_json::to_vec(&body).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("request body")
    } else {
        builder.body(Body::empty()).expect("request body")
    }
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}
