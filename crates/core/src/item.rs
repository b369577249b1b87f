//! Inventory item domain types and the store trait.
//!
//! The lifecycle of an item is owned entirely by the store; the rest of the
//! system only requests insert / list / find / update-quantity.

use crate::error::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A persisted inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Store-assigned identity.
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Non-negative by construction — validation happens before insert.
    pub quantity: i64,
    pub category: String,
}

/// A new item to insert. Optional fields carry their documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub category: String,
}

impl NewItem {
    /// Create a new item with all optional fields at their defaults.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            quantity: 0,
            category: String::new(),
        }
    }
}

/// The inventory storage trait.
///
/// Implementations: SQLite (production) and in-memory (tests). The store
/// serializes its own accesses; transactional semantics are its own concern.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// A human-readable name for this store (e.g. "sqlite", "in_memory").
    fn name(&self) -> &str;

    /// Insert one record and return its assigned id.
    async fn insert_item(&self, item: NewItem) -> std::result::Result<i64, StoreError>;

    /// List records, optionally filtered by exact category match.
    async fn list_items(
        &self,
        category: Option<&str>,
    ) -> std::result::Result<Vec<ItemRecord>, StoreError>;

    /// Look up a record by id.
    async fn find_item_by_id(
        &self,
        id: i64,
    ) -> std::result::Result<Option<ItemRecord>, StoreError>;

    /// Set a record's quantity. Returns false when the id does not exist.
    async fn update_item_quantity(
        &self,
        id: i64,
        new_quantity: i64,
    ) -> std::result::Result<bool, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_item_uses_defaults() {
        let item = NewItem::named("laptop");
        assert_eq!(item.name, "laptop");
        assert_eq!(item.description, "");
        assert_eq!(item.quantity, 0);
        assert_eq!(item.category, "");
    }

    #[test]
    fn new_item_deserializes_with_defaults() {
        let item: NewItem = serde_json::from_str(r#"{"name": "mouse"}"#).unwrap();
        assert_eq!(item.name, "mouse");
        assert_eq!(item.quantity, 0);
    }
}
