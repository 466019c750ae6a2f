//! Character repository for SQLite

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{column_u32, database_error, now, parse_id, write_error};
use crate::application::ports::outbound::RepositoryError;
use crate::domain::entities::{Character, EntityKind};
use crate::domain::value_objects::{AbilityScores, OwnerId};

const COLUMNS: &str = "id, name, description, image_url, owner_id, class_name, level, \
    strength, dexterity, constitution, intelligence, wisdom, charisma";

/// Repository for Character rows
pub struct SqliteCharacterRepository {
    pool: SqlitePool,
}

impl SqliteCharacterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Character>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM characters WHERE name = ?");
        let row = sqlx::query(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;
        row.as_ref().map(row_to_character).transpose()
    }

    /// Insert or update by id
    pub async fn save(&self, character: &Character) -> Result<(), RepositoryError> {
        let scores = &character.abilities;
        sqlx::query(
            r#"
            INSERT INTO characters (id, name, description, image_url, owner_id, class_name, level,
                strength, dexterity, constitution, intelligence, wisdom, charisma, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                image_url = excluded.image_url,
                owner_id = excluded.owner_id,
                class_name = excluded.class_name,
                level = excluded.level,
                strength = excluded.strength,
                dexterity = excluded.dexterity,
                constitution = excluded.constitution,
                intelligence = excluded.intelligence,
                wisdom = excluded.wisdom,
                charisma = excluded.charisma,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(character.id.to_string())
        .bind(&character.name)
        .bind(&character.description)
        .bind(character.image_url.as_deref())
        .bind(character.owner.map(|owner| owner.to_string()))
        .bind(character.class_name.as_deref())
        .bind(i64::from(character.level))
        .bind(i64::from(scores.strength))
        .bind(i64::from(scores.dexterity))
        .bind(i64::from(scores.constitution))
        .bind(i64::from(scores.intelligence))
        .bind(i64::from(scores.wisdom))
        .bind(i64::from(scores.charisma))
        .bind(now())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, EntityKind::Character, &character.name))?;
        Ok(())
    }
}

fn row_to_character(row: &SqliteRow) -> Result<Character, RepositoryError> {
    let get_i64 = |column: &str| -> Result<i64, RepositoryError> {
        row.try_get(column).map_err(database_error)
    };
    let score = |column: &str| column_u32(get_i64(column)?, column);

    let id: String = row.try_get("id").map_err(database_error)?;
    let owner: Option<String> = row.try_get("owner_id").map_err(database_error)?;
    let owner = owner
        .map(|owner| {
            owner
                .parse()
                .map(OwnerId)
                .map_err(|_| RepositoryError::Corrupt(format!("invalid owner id '{owner}'")))
        })
        .transpose()?;

    Ok(Character {
        id: parse_id(&id)?,
        name: row.try_get("name").map_err(database_error)?,
        description: row.try_get("description").map_err(database_error)?,
        image_url: row.try_get("image_url").map_err(database_error)?,
        owner,
        class_name: row.try_get("class_name").map_err(database_error)?,
        level: score("level")?,
        abilities: AbilityScores {
            strength: score("strength")?,
            dexterity: score("dexterity")?,
            constitution: score("constitution")?,
            intelligence: score("intelligence")?,
            wisdom: score("wisdom")?,
            charisma: score("charisma")?,
        },
    })
}
