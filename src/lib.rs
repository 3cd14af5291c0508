pub(crate) mod api;
pub(crate) mod core;
pub(crate) mod db;
pub(crate) mod repositories;
pub(crate) mod routing;
pub(crate) mod schemas;
pub(crate) mod store;

#[cfg(test)]
mod test_support;

use crate::core::{config::Settings, state::AppState, telemetry};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;
    core::metrics::init(&settings)?;

    let routes = routing::routes()?;
    for route in routes.routes() {
        tracing::debug!(
            method = %route.method(),
            pattern = route.pattern(),
            action = %route.action(),
            "Route registered"
        );
    }

    let items = store::from_settings(&settings).await?;
    let state = AppState::new(settings, routes, items);

    let app = api::router::router(state.clone());
    let listener = tokio::net::TcpListener::bind(state.settings().server_addr()).await?;

    tracing::info!(
        host = %state.settings().server_host(),
        port = state.settings().server_port(),
        environment = %state.settings().runtime().environment.as_str(),
        store = %state.items().backend().as_str(),
        "Item Cart API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(core::shutdown::shutdown_signal())
        .await?;

    tracing::info!("Item Cart API stopped");
    Ok(())
}
