use async_trait::async_trait;
use sqlx::PgPool;
use validator::Validate;

use super::{ItemStore, StoreError};
use crate::core::config::StoreBackend;
use crate::core::time::primitive_now_utc;
use crate::db::models::Item;
use crate::repositories;
use crate::schemas::item::{ItemCreate, ItemUpdate};

pub(crate) struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        Ok(repositories::items::list(&self.pool).await?)
    }

    async fn create_item(&self, payload: ItemCreate) -> Result<Item, StoreError> {
        let payload = payload.normalized();
        payload.validate()?;

        let now = primitive_now_utc();
        let item = repositories::items::create(
            &self.pool,
            repositories::items::CreateItem {
                name: &payload.name,
                description: payload.description.as_deref(),
                created_at: now,
                updated_at: now,
            },
        )
        .await?;

        Ok(item)
    }

    async fn update_item(&self, id: i64, payload: ItemUpdate) -> Result<Item, StoreError> {
        let payload = payload.normalized();
        payload.validate()?;

        repositories::items::update(
            &self.pool,
            id,
            repositories::items::UpdateItem {
                name: payload.name,
                description: payload.description,
                updated_at: primitive_now_utc(),
            },
        )
        .await?
        .ok_or(StoreError::NotFound(id))
    }

    async fn delete_item(&self, id: i64) -> Result<(), StoreError> {
        if repositories::items::delete(&self.pool, id).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound(id))
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(repositories::items::ping(&self.pool).await?)
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Postgres
    }
}
