use std::sync::OnceLock;

use axum::http::Method;

use super::{Action, CrudAction, RouteTable, RouteTableError};

pub(crate) const ITEMS_PATH: &str = "/api/v1/items";

static ROUTES: OnceLock<RouteTable> = OnceLock::new();

/// The process-wide route table, built on first use.
pub(crate) fn routes() -> Result<&'static RouteTable, RouteTableError> {
    if let Some(table) = ROUTES.get() {
        return Ok(table);
    }

    let table = build()?;
    Ok(ROUTES.get_or_init(|| table))
}

fn build() -> Result<RouteTable, RouteTableError> {
    RouteTable::builder()
        .route(Method::GET, "/", Action::SiteIndex)
        .resources(
            ITEMS_PATH,
            &[CrudAction::Index, CrudAction::Create, CrudAction::Destroy, CrudAction::Update],
            Action::Items,
        )
        .route(Method::GET, "/healthz", Action::Healthz)
        .route(Method::GET, "/metrics", Action::Metrics)
        .build()
}
