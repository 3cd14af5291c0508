use std::sync::Arc;

use crate::core::config::Settings;
use crate::routing::RouteTable;
use crate::store::ItemStore;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    routes: &'static RouteTable,
    items: Arc<dyn ItemStore>,
}

impl AppState {
    pub(crate) fn new(
        settings: Settings,
        routes: &'static RouteTable,
        items: Arc<dyn ItemStore>,
    ) -> Self {
        Self { inner: Arc::new(InnerState { settings, routes, items }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn routes(&self) -> &'static RouteTable {
        self.inner.routes
    }

    pub(crate) fn items(&self) -> &dyn ItemStore {
        self.inner.items.as_ref()
    }
}
