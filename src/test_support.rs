//! Test doubles for the outbound ports

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::outbound::{
    ChannelError, ComponentEvent, EntityStorePort, FormHandle, FormRequest, FormSubmission,
    InteractionChannel, InventoryRepositoryPort, MessageHandle, OutboundMessage,
    RepositoryError,
};
use crate::domain::entities::{Entity, EntityKind, InventoryEntry, InventoryLine};
use crate::domain::value_objects::{CharacterId, ItemId};

/// Channel that replays queued user input and records everything sent
#[derive(Default)]
pub struct ScriptedChannel {
    pub submissions: VecDeque<FormSubmission>,
    pub events: VecDeque<ComponentEvent>,
    /// Wait forever instead of failing once the script runs out
    pub hang_when_empty: bool,
    pub forms: Vec<FormRequest>,
    pub sent: Vec<OutboundMessage>,
    pub updates: Vec<(MessageHandle, OutboundMessage)>,
    pub notices: Vec<String>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(mut self, fields: &[(&str, &str)]) -> Self {
        self.submissions.push_back(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    pub fn select(mut self, control: &str, value: &str) -> Self {
        self.events.push_back(ComponentEvent::select(control, value));
        self
    }

    pub fn click(mut self, control: &str) -> Self {
        self.events.push_back(ComponentEvent::button(control));
        self
    }

    pub fn hanging(mut self) -> Self {
        self.hang_when_empty = true;
        self
    }

    /// Last message state the user sees, whether sent or updated
    pub fn last_shown(&self) -> Option<&OutboundMessage> {
        self.updates
            .last()
            .map(|(_, m)| m)
            .or_else(|| self.sent.last())
    }

    async fn exhausted<T>(&self) -> Result<T, ChannelError> {
        if self.hang_when_empty {
            std::future::pending::<()>().await;
        }
        Err(ChannelError::Closed)
    }
}

#[async_trait]
impl InteractionChannel for ScriptedChannel {
    async fn send(&mut self, message: OutboundMessage) -> Result<MessageHandle, ChannelError> {
        self.sent.push(message);
        Ok(MessageHandle(format!("message-{}", self.sent.len())))
    }

    async fn update(
        &mut self,
        handle: &MessageHandle,
        message: OutboundMessage,
    ) -> Result<(), ChannelError> {
        self.updates.push((handle.clone(), message));
        Ok(())
    }

    async fn open_form(&mut self, form: FormRequest) -> Result<FormHandle, ChannelError> {
        self.forms.push(form);
        Ok(FormHandle(format!("form-{}", self.forms.len())))
    }

    async fn await_submission(
        &mut self,
        _form: &FormHandle,
    ) -> Result<FormSubmission, ChannelError> {
        match self.submissions.pop_front() {
            Some(submission) => Ok(submission),
            None => self.exhausted().await,
        }
    }

    async fn await_component_event(
        &mut self,
        _handle: &MessageHandle,
    ) -> Result<ComponentEvent, ChannelError> {
        match self.events.pop_front() {
            Some(event) => Ok(event),
            None => self.exhausted().await,
        }
    }

    async fn send_ephemeral_notice(&mut self, text: &str) -> Result<(), ChannelError> {
        self.notices.push(text.to_string());
        Ok(())
    }
}

/// Store backed by plain maps
#[derive(Default)]
pub struct InMemoryStore {
    entities: Mutex<HashMap<String, Entity>>,
    lines: Mutex<Vec<InventoryEntry>>,
    saves: AtomicUsize,
    pub fail_saves: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, entity: Entity) -> Self {
        self.entities
            .lock()
            .unwrap()
            .insert(entity.id_string(), entity);
        self
    }

    /// Every save fails with a database error
    pub fn failing(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn all(&self, kind: EntityKind) -> Vec<Entity> {
        self.entities
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect()
    }

    pub fn lines(&self) -> Vec<InventoryEntry> {
        self.lines.lock().unwrap().clone()
    }
}

#[async_trait]
impl EntityStorePort for InMemoryStore {
    async fn get(&self, kind: EntityKind, name: &str) -> Result<Option<Entity>, RepositoryError> {
        Ok(self
            .entities
            .lock()
            .unwrap()
            .values()
            .find(|e| e.kind() == kind && e.name() == name)
            .cloned())
    }

    async fn search_by_name(
        &self,
        kind: EntityKind,
        fragment: &str,
        limit: usize,
    ) -> Result<Vec<String>, RepositoryError> {
        let needle = fragment.to_lowercase();
        let mut names: Vec<String> = self
            .entities
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.kind() == kind && e.name().to_lowercase().contains(&needle))
            .map(|e| e.name().to_string())
            .collect();
        names.sort();
        names.truncate(limit);
        Ok(names)
    }

    async fn save(&self, entity: &Entity) -> Result<(), RepositoryError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves {
            return Err(RepositoryError::Database("disk full".to_string()));
        }
        let mut entities = self.entities.lock().unwrap();
        let id = entity.id_string();
        let taken = entities
            .values()
            .any(|e| e.kind() == entity.kind() && e.name() == entity.name() && e.id_string() != id);
        if taken {
            return Err(RepositoryError::Conflict {
                kind: entity.kind(),
                name: entity.name().to_string(),
            });
        }
        entities.insert(id, entity.clone());
        Ok(())
    }
}

#[async_trait]
impl InventoryRepositoryPort for InMemoryStore {
    async fn get_line(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
    ) -> Result<Option<InventoryEntry>, RepositoryError> {
        Ok(self
            .lines
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.character_id == character_id && l.item_id == item_id)
            .copied())
    }

    async fn upsert_line(&self, entry: &InventoryEntry) -> Result<(), RepositoryError> {
        let mut lines = self.lines.lock().unwrap();
        lines.retain(|l| !(l.character_id == entry.character_id && l.item_id == entry.item_id));
        lines.push(*entry);
        Ok(())
    }

    async fn delete_line(
        &self,
        character_id: CharacterId,
        item_id: ItemId,
    ) -> Result<(), RepositoryError> {
        self.lines
            .lock()
            .unwrap()
            .retain(|l| !(l.character_id == character_id && l.item_id == item_id));
        Ok(())
    }

    async fn list_inventory(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<InventoryLine>, RepositoryError> {
        let entities = self.entities.lock().unwrap();
        let mut lines: Vec<InventoryLine> = self
            .lines
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.character_id == character_id)
            .filter_map(|l| match entities.get(&l.item_id.to_string()) {
                Some(Entity::Item(item)) => Some(InventoryLine {
                    item_id: item.id,
                    item_name: item.name.clone(),
                    bulk: item.bulk,
                    quantity: l.quantity,
                }),
                _ => None,
            })
            .collect();
        lines.sort_by(|a, b| a.item_name.cmp(&b.item_name));
        Ok(lines)
    }
}
