//! Item persistence behind the item actions.
//!
//! Handlers only see [`ItemStore`]; the backend is chosen from settings at
//! startup. Payload validation is part of the store contract so every backend
//! rejects the same input.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use validator::ValidationErrors;

use crate::core::config::{Settings, StoreBackend};
use crate::db;
use crate::db::models::Item;
use crate::schemas::item::{ItemCreate, ItemUpdate};

pub(crate) use memory::MemoryItemStore;
pub(crate) use postgres::PgItemStore;

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("item {0} not found")]
    NotFound(i64),
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub(crate) trait ItemStore: Send + Sync {
    /// All items ordered by id.
    async fn list_items(&self) -> Result<Vec<Item>, StoreError>;

    async fn create_item(&self, payload: ItemCreate) -> Result<Item, StoreError>;

    async fn update_item(&self, id: i64, payload: ItemUpdate) -> Result<Item, StoreError>;

    async fn delete_item(&self, id: i64) -> Result<(), StoreError>;

    /// Cheap liveness probe used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    fn backend(&self) -> StoreBackend;
}

/// Build the configured backend. The postgres backend connects and applies
/// migrations before returning.
pub(crate) async fn from_settings(settings: &Settings) -> anyhow::Result<Arc<dyn ItemStore>> {
    match settings.store().backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryItemStore::new())),
        StoreBackend::Postgres => {
            let pool = db::init_pool(settings).await?;
            db::run_migrations(&pool).await?;
            Ok(Arc::new(PgItemStore::new(pool)))
        }
    }
}
