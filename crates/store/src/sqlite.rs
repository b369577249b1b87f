//! SQLite inventory store.
//!
//! A single database file with one `items` table. The schema is created on
//! open; WAL journal mode keeps the interactive session snappy.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use stockchat_core::error::StoreError;
use stockchat_core::item::{InventoryStore, ItemRecord, NewItem};
use tracing::{debug, info};

/// The production SQLite-backed inventory store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    ///
    /// Pass `"sqlite::memory:"` for an in-process ephemeral database
    /// (useful for tests).
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite inventory store initialized at {path}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                quantity    INTEGER NOT NULL DEFAULT 0,
                category    TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("items table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_items_category ON items(category)")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::MigrationFailed(format!("category index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    fn row_to_item(row: &sqlx::sqlite::SqliteRow) -> Result<ItemRecord, StoreError> {
        Ok(ItemRecord {
            id: row
                .try_get("id")
                .map_err(|e| StoreError::QueryFailed(format!("id column: {e}")))?,
            name: row
                .try_get("name")
                .map_err(|e| StoreError::QueryFailed(format!("name column: {e}")))?,
            description: row
                .try_get("description")
                .map_err(|e| StoreError::QueryFailed(format!("description column: {e}")))?,
            quantity: row
                .try_get("quantity")
                .map_err(|e| StoreError::QueryFailed(format!("quantity column: {e}")))?,
            category: row
                .try_get("category")
                .map_err(|e| StoreError::QueryFailed(format!("category column: {e}")))?,
        })
    }
}

#[async_trait]
impl InventoryStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn insert_item(&self, item: NewItem) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO items (name, description, quantity, category) VALUES (?, ?, ?, ?)",
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.quantity)
        .bind(&item.category)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("insert: {e}")))?;

        Ok(result.last_insert_rowid())
    }

    async fn list_items(&self, category: Option<&str>) -> Result<Vec<ItemRecord>, StoreError> {
        let rows = match category {
            Some(cat) => {
                sqlx::query("SELECT * FROM items WHERE category = ? ORDER BY id")
                    .bind(cat)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query("SELECT * FROM items ORDER BY id")
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| StoreError::QueryFailed(format!("list: {e}")))?;

        rows.iter().map(Self::row_to_item).collect()
    }

    async fn find_item_by_id(&self, id: i64) -> Result<Option<ItemRecord>, StoreError> {
        let row = sqlx::query("SELECT * FROM items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("find: {e}")))?;

        row.as_ref().map(Self::row_to_item).transpose()
    }

    async fn update_item_quantity(
        &self,
        id: i64,
        new_quantity: i64,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE items SET quantity = ? WHERE id = ?")
            .bind(new_quantity)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("update: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}
