//! Inventory storage backends.
//!
//! Two implementations of [`InventoryStore`]: an in-memory store for tests
//! and dry runs, and the SQLite store used by the CLI.

pub mod in_memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use stockchat_core::error::StoreError;
use stockchat_core::item::{InventoryStore, NewItem};
use tracing::info;

/// Seed a fresh store with a handful of demo items.
///
/// Does nothing if the store already has items. Returns the number of
/// records inserted.
pub async fn seed_sample_items(store: &dyn InventoryStore) -> Result<usize, StoreError> {
    if !store.list_items(None).await?.is_empty() {
        info!("Store already populated, skipping seed");
        return Ok(0);
    }

    let samples = [
        ("Laptop", "Gaming laptop", 5, "Electronics"),
        ("Book", "Python programming guide", 10, "Education"),
        ("Mouse", "Wireless mouse", 15, "Electronics"),
        ("Notebook", "Spiral notebook", 20, "Stationery"),
    ];

    for (name, description, quantity, category) in samples {
        store
            .insert_item(NewItem {
                name: name.into(),
                description: description.into(),
                quantity,
                category: category.into(),
            })
            .await?;
    }

    info!("Seeded {} sample items", samples.len());
    Ok(samples.len())
}
