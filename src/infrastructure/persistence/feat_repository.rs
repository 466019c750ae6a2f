//! Feat repository for SQLite

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{column_u32, database_error, now, parse_id, write_error};
use crate::application::ports::outbound::RepositoryError;
use crate::domain::entities::{EntityKind, Feat};

/// Repository for Feat rows
pub struct SqliteFeatRepository {
    pool: SqlitePool,
}

impl SqliteFeatRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Feat>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, description, image_url, level, effect FROM feats WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;
        row.as_ref().map(row_to_feat).transpose()
    }

    /// Insert or update by id
    pub async fn save(&self, feat: &Feat) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO feats (id, name, description, image_url, level, effect, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                image_url = excluded.image_url,
                level = excluded.level,
                effect = excluded.effect,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(feat.id.to_string())
        .bind(&feat.name)
        .bind(&feat.description)
        .bind(feat.image_url.as_deref())
        .bind(i64::from(feat.level))
        .bind(feat.effect.as_deref())
        .bind(now())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, EntityKind::Feat, &feat.name))?;
        Ok(())
    }
}

fn row_to_feat(row: &SqliteRow) -> Result<Feat, RepositoryError> {
    let id: String = row.try_get("id").map_err(database_error)?;
    let level: i64 = row.try_get("level").map_err(database_error)?;

    Ok(Feat {
        id: parse_id(&id)?,
        name: row.try_get("name").map_err(database_error)?,
        description: row.try_get("description").map_err(database_error)?,
        image_url: row.try_get("image_url").map_err(database_error)?,
        level: column_u32(level, "level")?,
        effect: row.try_get("effect").map_err(database_error)?,
    })
}
