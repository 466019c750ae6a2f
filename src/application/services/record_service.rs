//! Record Service - Create, edit and view characters, items and feats
//!
//! Create and edit hand a snapshot to the wizard engine; view renders the
//! stored record and waits for the user to close it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::application::ports::outbound::{
    ChannelError, EntityStorePort, InteractionChannel, InventoryRepositoryPort, RepositoryError,
    SEARCH_LIMIT,
};
use crate::application::services::card_builder;
use crate::application::services::wizard::{EditorMode, WizardEngine, WizardError, WizardPlan};
use crate::domain::entities::{Entity, EntityKind, InventoryLine};
use crate::domain::value_objects::OwnerId;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("No {kind} named '{name}'")]
    NotFound { kind: EntityKind, name: String },
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Store(#[from] RepositoryError),
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// Record service trait defining the application use cases
#[async_trait]
pub trait RecordService: Send + Sync {
    /// Run the create wizard for a new record
    async fn create(
        &self,
        kind: EntityKind,
        image_url: Option<String>,
        owner: OwnerId,
        channel: &mut dyn InteractionChannel,
    ) -> Result<Entity, RecordError>;

    /// Run the edit wizard for an existing record
    async fn edit(
        &self,
        kind: EntityKind,
        name: &str,
        image_url: Option<String>,
        channel: &mut dyn InteractionChannel,
    ) -> Result<Entity, RecordError>;

    /// Show a record's card until the user closes it
    async fn view(
        &self,
        kind: EntityKind,
        name: &str,
        channel: &mut dyn InteractionChannel,
    ) -> Result<(), RecordError>;

    /// Load a record by exact name
    async fn find(&self, kind: EntityKind, name: &str) -> Result<Entity, RecordError>;

    /// Inventory of the named character, ordered by item name
    async fn inventory_of(&self, character_name: &str) -> Result<Vec<InventoryLine>, RecordError>;

    /// Names for autocompletion
    async fn suggest_names(
        &self,
        kind: EntityKind,
        fragment: &str,
    ) -> Result<Vec<String>, RecordError>;
}

/// Default implementation of RecordService using the store ports
#[derive(Clone)]
pub struct RecordServiceImpl {
    store: Arc<dyn EntityStorePort>,
    inventory: Arc<dyn InventoryRepositoryPort>,
    engine: WizardEngine,
}

impl RecordServiceImpl {
    pub fn new(
        store: Arc<dyn EntityStorePort>,
        inventory: Arc<dyn InventoryRepositoryPort>,
        engine: WizardEngine,
    ) -> Self {
        Self {
            store,
            inventory,
            engine,
        }
    }
}

#[async_trait]
impl RecordService for RecordServiceImpl {
    #[instrument(skip(self, channel), fields(kind = %kind))]
    async fn create(
        &self,
        kind: EntityKind,
        image_url: Option<String>,
        owner: OwnerId,
        channel: &mut dyn InteractionChannel,
    ) -> Result<Entity, RecordError> {
        let mut snapshot = match Entity::empty(kind) {
            Entity::Character(character) => Entity::Character(character.with_owner(owner)),
            other => other,
        };
        if image_url.is_some() {
            snapshot.set_image_url(image_url);
        }

        let plan = WizardPlan::for_kind(kind, EditorMode::Create);
        let saved = self
            .engine
            .run_wizard(snapshot, &plan, channel, self.store.as_ref())
            .await?;
        info!(name = %saved.name(), "Created {}", kind);
        Ok(saved)
    }

    #[instrument(skip(self, channel), fields(kind = %kind))]
    async fn edit(
        &self,
        kind: EntityKind,
        name: &str,
        image_url: Option<String>,
        channel: &mut dyn InteractionChannel,
    ) -> Result<Entity, RecordError> {
        let mut snapshot = self.find(kind, name).await?;
        if image_url.is_some() {
            snapshot.set_image_url(image_url);
        }

        let plan = WizardPlan::for_kind(kind, EditorMode::Edit);
        let saved = self
            .engine
            .run_wizard(snapshot, &plan, channel, self.store.as_ref())
            .await?;
        info!(name = %saved.name(), "Edited {}", kind);
        Ok(saved)
    }

    #[instrument(skip(self, channel), fields(kind = %kind))]
    async fn view(
        &self,
        kind: EntityKind,
        name: &str,
        channel: &mut dyn InteractionChannel,
    ) -> Result<(), RecordError> {
        let entity = self.find(kind, name).await?;
        let card = match &entity {
            Entity::Character(character) => {
                let lines = self.inventory.list_inventory(character.id).await?;
                card_builder::render_with_inventory(&entity, &lines)
            }
            _ => card_builder::render(&entity),
        };
        self.engine.present(card, channel).await?;
        debug!("Closed card for {}", name);
        Ok(())
    }

    async fn find(&self, kind: EntityKind, name: &str) -> Result<Entity, RecordError> {
        self.store
            .get(kind, name)
            .await?
            .ok_or_else(|| RecordError::NotFound {
                kind,
                name: name.to_string(),
            })
    }

    #[instrument(skip(self))]
    async fn inventory_of(&self, character_name: &str) -> Result<Vec<InventoryLine>, RecordError> {
        let Entity::Character(character) =
            self.find(EntityKind::Character, character_name).await?
        else {
            return Err(RecordError::NotFound {
                kind: EntityKind::Character,
                name: character_name.to_string(),
            });
        };
        Ok(self.inventory.list_inventory(character.id).await?)
    }

    async fn suggest_names(
        &self,
        kind: EntityKind,
        fragment: &str,
    ) -> Result<Vec<String>, RecordError> {
        Ok(self
            .store
            .search_by_name(kind, fragment, SEARCH_LIMIT)
            .await?)
    }
}
