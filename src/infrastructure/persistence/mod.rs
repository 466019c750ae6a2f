//! SQLite persistence adapters
//!
//! One repository per table, handed out by [`SqliteRepository`], which also
//! implements the outbound store ports by routing on the record kind.

mod character_repository;
mod feat_repository;
mod inventory_repository;
mod item_repository;

pub use character_repository::SqliteCharacterRepository;
pub use feat_repository::SqliteFeatRepository;
pub use inventory_repository::SqliteInventoryRepository;
pub use item_repository::SqliteItemRepository;

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::application::ports::outbound::{
    EntityStorePort, InventoryRepositoryPort, RepositoryError,
};
use crate::domain::entities::{Entity, EntityKind, InventoryEntry, InventoryLine};
use crate::domain::value_objects::{CharacterId, ItemId};

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS characters (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL DEFAULT '',
        image_url TEXT,
        owner_id TEXT,
        class_name TEXT,
        level INTEGER NOT NULL DEFAULT 1,
        strength INTEGER NOT NULL DEFAULT 10,
        dexterity INTEGER NOT NULL DEFAULT 10,
        constitution INTEGER NOT NULL DEFAULT 10,
        intelligence INTEGER NOT NULL DEFAULT 10,
        wisdom INTEGER NOT NULL DEFAULT 10,
        charisma INTEGER NOT NULL DEFAULT 10,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS items (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL DEFAULT '',
        image_url TEXT,
        level INTEGER NOT NULL DEFAULT 0,
        effect TEXT,
        bulk INTEGER NOT NULL DEFAULT -1,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS feats (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL DEFAULT '',
        image_url TEXT,
        level INTEGER NOT NULL DEFAULT 1,
        effect TEXT,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS inventory_entries (
        character_id TEXT NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
        item_id TEXT NOT NULL REFERENCES items(id) ON DELETE CASCADE,
        quantity INTEGER NOT NULL CHECK (quantity > 0),
        PRIMARY KEY (character_id, item_id)
    )
    "#,
];

/// Combined repository providing access to all record tables
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Open (creating if needed) the database at `database_url` and apply the schema
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        info!("Connected to {}", database_url);
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        let repository = Self { pool };
        repository.initialize_schema().await?;
        Ok(repository)
    }

    async fn initialize_schema(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!("Schema ready");
        Ok(())
    }

    /// Wait for checked-out connections and close the pool
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Database closed");
    }

    pub fn characters(&self) -> SqliteCharacterRepository {
        SqliteCharacterRepository::new(self.pool.clone())
    }

    pub fn items(&self) -> SqliteItemRepository {
        SqliteItemRepository::new(self.pool.clone())
    }

    pub fn feats(&self) -> SqliteFeatRepository {
        SqliteFeatRepository::new(self.pool.clone())
    }

    pub fn inventory(&self) -> SqliteInventoryRepository {
        SqliteInventoryRepository::new(self.pool.clone())
    }
}

#[async_trait]
impl EntityStorePort for SqliteRepository {
    async fn get(&self, kind: EntityKind, name: &str) -> Result<Option<Entity>, RepositoryError> {
        Ok(match kind {
            EntityKind::Character => self.characters().get_by_name(name).await?.map(Entity::Character),
            EntityKind::Item => self.items().get_by_name(name).await?.map(Entity::Item),
            EntityKind::Feat => self.feats().get_by_name(name).await?.map(Entity::Feat),
        })
    }

    async fn search_by_name(
        &self,
        kind: EntityKind,
        fragment: &str,
        limit: usize,
    ) -> Result<Vec<String>, RepositoryError> {
        search_names(&self.pool, kind, fragment, limit).await
    }

    async fn save(&self, entity: &Entity) -> Result<(), RepositoryError> {
        match entity {
            Entity::Character(character) => self.characters().save(character).await,
            Entity::Item(item) => self.items().save(item).await,
            Entity::Feat(feat) => self.feats().save(feat).await,
        }
    }
}

#[async_trait]
impl InventoryRepositoryPort for SqliteRepository {
    async fn get_line(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
    ) -> Result<Option<InventoryEntry>, RepositoryError> {
        self.inventory().get_line(character_id, item_id).await
    }

    async fn upsert_line(&self, entry: &InventoryEntry) -> Result<(), RepositoryError> {
        self.inventory().upsert_line(entry).await
    }

    async fn delete_line(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
    ) -> Result<(), RepositoryError> {
        self.inventory().delete_line(character_id, item_id).await
    }

    async fn list_inventory(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<InventoryLine>, RepositoryError> {
        self.inventory().list_for(character_id).await
    }
}

fn table_for(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Character => "characters",
        EntityKind::Item => "items",
        EntityKind::Feat => "feats",
    }
}

/// Case-insensitive containment match, ordered by name
async fn search_names(
    pool: &SqlitePool,
    kind: EntityKind,
    fragment: &str,
    limit: usize,
) -> Result<Vec<String>, RepositoryError> {
    let sql = format!(
        "SELECT name FROM {} WHERE instr(lower(name), lower(?)) > 0 ORDER BY name LIMIT ?",
        table_for(kind)
    );
    let rows: Vec<(String,)> = sqlx::query_as(&sql)
        .bind(fragment)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(pool)
        .await
        .map_err(database_error)?;
    Ok(rows.into_iter().map(|(name,)| name).collect())
}

pub(crate) fn database_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

/// Map a failed write, turning a unique-name violation into a conflict
pub(crate) fn write_error(e: sqlx::Error, kind: EntityKind, name: &str) -> RepositoryError {
    let duplicate = e
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if duplicate {
        RepositoryError::Conflict {
            kind,
            name: name.to_string(),
        }
    } else {
        database_error(e)
    }
}

pub(crate) fn parse_id<T: FromStr>(value: &str) -> Result<T, RepositoryError> {
    value
        .parse()
        .map_err(|_| RepositoryError::Corrupt(format!("invalid id '{value}'")))
}

pub(crate) fn column_u32(value: i64, column: &str) -> Result<u32, RepositoryError> {
    u32::try_from(value)
        .map_err(|_| RepositoryError::Corrupt(format!("{column} out of range: {value}")))
}

pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Fresh in-memory database with the schema applied
#[cfg(test)]
pub(crate) async fn test_repository() -> SqliteRepository {
    // a single connection keeps every query on the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(
            SqliteConnectOptions::from_str("sqlite::memory:")
                .unwrap()
                .foreign_keys(true),
        )
        .await
        .unwrap();
    SqliteRepository::from_pool(pool).await.unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Character, Feat, Item};

    #[tokio::test]
    async fn test_store_routes_by_kind() {
        let repository = test_repository().await;
        repository
            .save(&Entity::Item(Item::new("Longsword")))
            .await
            .unwrap();
        repository
            .save(&Entity::Feat(Feat::new("Longsword Mastery")))
            .await
            .unwrap();

        let item = repository.get(EntityKind::Item, "Longsword").await.unwrap();
        assert_eq!(item.map(|e| e.kind()), Some(EntityKind::Item));
        assert!(repository
            .get(EntityKind::Character, "Longsword")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_bounded() {
        let repository = test_repository().await;
        for i in 0..12 {
            repository
                .save(&Entity::Character(Character::new(format!("Goblin {i:02}"))))
                .await
                .unwrap();
        }
        repository
            .save(&Entity::Character(Character::new("Valeros")))
            .await
            .unwrap();

        let names = repository
            .search_by_name(EntityKind::Character, "GOB", 10)
            .await
            .unwrap();
        assert_eq!(names.len(), 10);
        assert_eq!(names[0], "Goblin 00");

        let names = repository
            .search_by_name(EntityKind::Character, "ler", 10)
            .await
            .unwrap();
        assert_eq!(names, vec!["Valeros".to_string()]);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_a_conflict() {
        let repository = test_repository().await;
        repository
            .save(&Entity::Item(Item::new("Rope")))
            .await
            .unwrap();

        let err = repository
            .save(&Entity::Item(Item::new("Rope")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Conflict {
                kind: EntityKind::Item,
                ..
            }
        ));
    }
}
