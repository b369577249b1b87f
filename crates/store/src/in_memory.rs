//! In-memory store — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use std::sync::Arc;
use stockchat_core::error::StoreError;
use stockchat_core::item::{InventoryStore, ItemRecord, NewItem};
use tokio::sync::RwLock;

/// An in-memory store that keeps records in a Vec, with ids assigned
/// sequentially from 1 (matching SQLite's AUTOINCREMENT behavior).
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
    fail: bool,
}

struct Inner {
    items: Vec<ItemRecord>,
    next_id: i64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                items: Vec::new(),
                next_id: 1,
            })),
            fail: false,
        }
    }

    /// A store whose every operation fails — for exercising the storage
    /// failure path without a real backend.
    pub fn failing() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                items: Vec::new(),
                next_id: 1,
            })),
            fail: true,
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail {
            Err(StoreError::Storage("store unavailable".into()))
        } else {
            Ok(())
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn insert_item(&self, item: NewItem) -> Result<i64, StoreError> {
        self.check()?;
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        inner.items.push(ItemRecord {
            id,
            name: item.name,
            description: item.description,
            quantity: item.quantity,
            category: item.category,
        });
        Ok(id)
    }

    async fn list_items(&self, category: Option<&str>) -> Result<Vec<ItemRecord>, StoreError> {
        self.check()?;
        let inner = self.inner.read().await;
        Ok(inner
            .items
            .iter()
            .filter(|i| category.is_none_or(|c| i.category == c))
            .cloned()
            .collect())
    }

    async fn find_item_by_id(&self, id: i64) -> Result<Option<ItemRecord>, StoreError> {
        self.check()?;
        let inner = self.inner.read().await;
        Ok(inner.items.iter().find(|i| i.id == id).cloned())
    }

    async fn update_item_quantity(
        &self,
        id: i64,
        new_quantity: i64,
    ) -> Result<bool, StoreError> {
        self.check()?;
        let mut inner = self.inner.write().await;
        match inner.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.quantity = new_quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
