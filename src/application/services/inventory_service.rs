//! Inventory Service - Move items in and out of character inventories

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::application::ports::outbound::{
    EntityStorePort, InventoryRepositoryPort, RepositoryError,
};
use crate::domain::entities::{
    plan_transfer, Character, Entity, EntityKind, InventoryEntry, Item,
    TransferError, TransferOutcome,
};

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error("No {kind} named '{name}'")]
    NotFound { kind: EntityKind, name: String },
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// Inventory service trait defining the application use cases
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Add `delta` copies of `item` to `character`, or remove them when negative
    async fn apply_transfer(
        &self,
        character: &Character,
        item: &Item,
        delta: i64,
    ) -> Result<TransferOutcome, InventoryError>;

    /// [`InventoryService::apply_transfer`] with both records looked up by name
    async fn give(
        &self,
        character_name: &str,
        item_name: &str,
        delta: i64,
    ) -> Result<TransferOutcome, InventoryError>;
}

#[derive(Clone)]
pub struct InventoryServiceImpl {
    store: Arc<dyn EntityStorePort>,
    inventory: Arc<dyn InventoryRepositoryPort>,
}

impl InventoryServiceImpl {
    pub fn new(
        store: Arc<dyn EntityStorePort>,
        inventory: Arc<dyn InventoryRepositoryPort>,
    ) -> Self {
        Self { store, inventory }
    }

    async fn load(&self, kind: EntityKind, name: &str) -> Result<Entity, InventoryError> {
        self.store
            .get(kind, name)
            .await?
            .ok_or_else(|| InventoryError::NotFound {
                kind,
                name: name.to_string(),
            })
    }
}

#[async_trait]
impl InventoryService for InventoryServiceImpl {
    #[instrument(skip(self, character, item), fields(character = %character.name, item = %item.name))]
    async fn apply_transfer(
        &self,
        character: &Character,
        item: &Item,
        delta: i64,
    ) -> Result<TransferOutcome, InventoryError> {
        let existing = self
            .inventory
            .get_line(character.id, item.id)
            .await?
            .map(|line| line.quantity);
        let (outcome, quantity) = plan_transfer(existing, delta)?;

        match quantity {
            Some(quantity) => {
                self.inventory
                    .upsert_line(&InventoryEntry {
                        character_id: character.id,
                        item_id: item.id,
                        quantity,
                    })
                    .await?
            }
            None => self.inventory.delete_line(character.id, item.id).await?,
        }

        info!(?outcome, "Inventory updated");
        Ok(outcome)
    }

    async fn give(
        &self,
        character_name: &str,
        item_name: &str,
        delta: i64,
    ) -> Result<TransferOutcome, InventoryError> {
        let character = match self.load(EntityKind::Character, character_name).await? {
            Entity::Character(character) => character,
            _ => {
                return Err(InventoryError::NotFound {
                    kind: EntityKind::Character,
                    name: character_name.to_string(),
                })
            }
        };
        let item = match self.load(EntityKind::Item, item_name).await? {
            Entity::Item(item) => item,
            _ => {
                return Err(InventoryError::NotFound {
                    kind: EntityKind::Item,
                    name: item_name.to_string(),
                })
            }
        };
        self.apply_transfer(&character, &item, delta).await
    }
}
