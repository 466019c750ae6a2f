//! Repository ports - Interfaces for record persistence
//!
//! These traits define the contracts that infrastructure repositories must implement.
//! Application services depend on these traits, not concrete implementations.

use async_trait::async_trait;

use crate::domain::entities::{Entity, EntityKind, InventoryEntry, InventoryLine};
use crate::domain::value_objects::{CharacterId, ItemId};

/// Upper bound on autocompletion suggestions
pub const SEARCH_LIMIT: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("A {kind} named '{name}' already exists")]
    Conflict { kind: EntityKind, name: String },
    #[error("Database error: {0}")]
    Database(String),
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

// =============================================================================
// Entity Store Port
// =============================================================================

/// Repository port for characters, items and feats
#[async_trait]
pub trait EntityStorePort: Send + Sync {
    /// Get a record by its exact name
    async fn get(&self, kind: EntityKind, name: &str) -> Result<Option<Entity>, RepositoryError>;

    /// Names containing `fragment`, case-insensitive, at most `limit`
    async fn search_by_name(
        &self,
        kind: EntityKind,
        fragment: &str,
        limit: usize,
    ) -> Result<Vec<String>, RepositoryError>;

    /// Insert or update a record by id
    async fn save(&self, entity: &Entity) -> Result<(), RepositoryError>;
}

// =============================================================================
// Inventory Repository Port
// =============================================================================

/// Repository port for inventory lines
#[async_trait]
pub trait InventoryRepositoryPort: Send + Sync {
    async fn get_line(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
    ) -> Result<Option<InventoryEntry>, RepositoryError>;

    async fn upsert_line(&self, entry: &InventoryEntry) -> Result<(), RepositoryError>;

    async fn delete_line(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
    ) -> Result<(), RepositoryError>;

    /// Every line a character carries, ordered by item name
    async fn list_inventory(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<InventoryLine>, RepositoryError>;
}
