//! Inventory repository for SQLite

use sqlx::{Row, SqlitePool};

use super::{column_u32, database_error, parse_id};
use crate::application::ports::outbound::RepositoryError;
use crate::domain::entities::{InventoryEntry, InventoryLine};
use crate::domain::value_objects::{Bulk, CharacterId, ItemId};

/// Repository for inventory_entries rows
pub struct SqliteInventoryRepository {
    pool: SqlitePool,
}

impl SqliteInventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_line(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
    ) -> Result<Option<InventoryEntry>, RepositoryError> {
        let quantity: Option<(i64,)> = sqlx::query_as(
            "SELECT quantity FROM inventory_entries WHERE character_id = ? AND item_id = ?",
        )
        .bind(character_id.to_string())
        .bind(item_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        quantity
            .map(|(quantity,)| -> Result<InventoryEntry, RepositoryError> {
                Ok(InventoryEntry {
                    character_id,
                    item_id,
                    quantity: column_u32(quantity, "quantity")?,
                })
            })
            .transpose()
    }

    pub async fn upsert_line(&self, entry: &InventoryEntry) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO inventory_entries (character_id, item_id, quantity)
            VALUES (?, ?, ?)
            ON CONFLICT(character_id, item_id) DO UPDATE SET quantity = excluded.quantity
            "#,
        )
        .bind(entry.character_id.to_string())
        .bind(entry.item_id.to_string())
        .bind(i64::from(entry.quantity))
        .execute(&self.pool)
        .await
        .map_err(database_error)?;
        Ok(())
    }

    pub async fn delete_line(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM inventory_entries WHERE character_id = ? AND item_id = ?")
            .bind(character_id.to_string())
            .bind(item_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(database_error)?;
        Ok(())
    }

    /// Lines joined with their items, ordered by item name
    pub async fn list_for(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<InventoryLine>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT i.id, i.name, i.bulk, e.quantity
            FROM inventory_entries e
            JOIN items i ON i.id = e.item_id
            WHERE e.character_id = ?
            ORDER BY i.name
            "#,
        )
        .bind(character_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.iter()
            .map(|row| -> Result<InventoryLine, RepositoryError> {
                let id: String = row.try_get("id").map_err(database_error)?;
                let bulk: i64 = row.try_get("bulk").map_err(database_error)?;
                let quantity: i64 = row.try_get("quantity").map_err(database_error)?;
                Ok(InventoryLine {
                    item_id: parse_id(&id)?,
                    item_name: row.try_get("name").map_err(database_error)?,
                    bulk: Bulk::from_storage(bulk)
                        .map_err(|e| RepositoryError::Corrupt(e.to_string()))?,
                    quantity: column_u32(quantity, "quantity")?,
                })
            })
            .collect()
    }
}
