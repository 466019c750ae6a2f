//! Item repository for SQLite

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{column_u32, database_error, now, parse_id, write_error};
use crate::application::ports::outbound::RepositoryError;
use crate::domain::entities::{EntityKind, Item};
use crate::domain::value_objects::Bulk;

/// Repository for Item rows
pub struct SqliteItemRepository {
    pool: SqlitePool,
}

impl SqliteItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, description, image_url, level, effect, bulk FROM items WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;
        row.as_ref().map(row_to_item).transpose()
    }

    /// Insert or update by id
    pub async fn save(&self, item: &Item) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO items (id, name, description, image_url, level, effect, bulk, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                image_url = excluded.image_url,
                level = excluded.level,
                effect = excluded.effect,
                bulk = excluded.bulk,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(item.id.to_string())
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.image_url.as_deref())
        .bind(i64::from(item.level))
        .bind(item.effect.as_deref())
        .bind(item.bulk.to_storage())
        .bind(now())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, EntityKind::Item, &item.name))?;
        Ok(())
    }
}

fn row_to_item(row: &SqliteRow) -> Result<Item, RepositoryError> {
    let id: String = row.try_get("id").map_err(database_error)?;
    let level: i64 = row.try_get("level").map_err(database_error)?;
    let bulk: i64 = row.try_get("bulk").map_err(database_error)?;

    Ok(Item {
        id: parse_id(&id)?,
        name: row.try_get("name").map_err(database_error)?,
        description: row.try_get("description").map_err(database_error)?,
        image_url: row.try_get("image_url").map_err(database_error)?,
        level: column_u32(level, "level")?,
        effect: row.try_get("effect").map_err(database_error)?,
        bulk: Bulk::from_storage(bulk).map_err(|e| RepositoryError::Corrupt(e.to_string()))?,
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_repository;
    use super::*;

    #[tokio::test]
    async fn test_bulk_survives_storage() {
        let repository = test_repository().await.items();
        for (name, bulk) in [
            ("Feather", Bulk::Absent),
            ("Torch", Bulk::Light),
            ("Plate Armor", Bulk::Units(4)),
        ] {
            let mut item = Item::new(name).with_bulk(bulk).with_level(2);
            item.effect = Some("Shiny".to_string());
            repository.save(&item).await.unwrap();
            assert_eq!(repository.get_by_name(name).await.unwrap(), Some(item));
        }
    }
}
