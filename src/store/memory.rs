use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use validator::Validate;

use super::{ItemStore, StoreError};
use crate::core::config::StoreBackend;
use crate::core::time::primitive_now_utc;
use crate::db::models::Item;
use crate::schemas::item::{ItemCreate, ItemUpdate};

/// Process-local store. Ids start at 1 and are never reused.
pub(crate) struct MemoryItemStore {
    inner: RwLock<Inner>,
}

struct Inner {
    next_id: i64,
    items: BTreeMap<i64, Item>,
}

impl MemoryItemStore {
    pub(crate) fn new() -> Self {
        Self { inner: RwLock::new(Inner { next_id: 1, items: BTreeMap::new() }) }
    }
}

impl Default for MemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.inner.read().await.items.values().cloned().collect())
    }

    async fn create_item(&self, payload: ItemCreate) -> Result<Item, StoreError> {
        let payload = payload.normalized();
        payload.validate()?;

        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let now = primitive_now_utc();
        let item = Item {
            id,
            name: payload.name,
            description: payload.description,
            created_at: now,
            updated_at: now,
        };
        inner.items.insert(id, item.clone());
        Ok(item)
    }

    async fn update_item(&self, id: i64, payload: ItemUpdate) -> Result<Item, StoreError> {
        let payload = payload.normalized();
        payload.validate()?;

        let mut inner = self.inner.write().await;
        let item = inner.items.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if let Some(name) = payload.name {
            item.name = name;
        }
        if let Some(description) = payload.description {
            item.description = Some(description).filter(|value| !value.is_empty());
        }
        item.updated_at = primitive_now_utc();
        Ok(item.clone())
    }

    async fn delete_item(&self, id: i64) -> Result<(), StoreError> {
        match self.inner.write().await.items.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Memory
    }
}
