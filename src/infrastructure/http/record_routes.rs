//! Read-only record API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::application::dto::{EntityResponseDto, InventoryLineResponseDto};
use crate::application::services::{RecordError, RecordService};
use crate::domain::entities::EntityKind;
use crate::infrastructure::state::AppState;

/// Get a character by name
pub async fn get_character(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<EntityResponseDto>, (StatusCode, String)> {
    get_record(state.records.as_ref(), EntityKind::Character, &name).await
}

/// List a character's inventory
pub async fn get_character_inventory(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<InventoryLineResponseDto>>, (StatusCode, String)> {
    let lines = state
        .records
        .inventory_of(&name)
        .await
        .map_err(error_response)?;

    Ok(Json(
        lines
            .into_iter()
            .map(InventoryLineResponseDto::from)
            .collect(),
    ))
}

/// Get an item by name
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<EntityResponseDto>, (StatusCode, String)> {
    get_record(state.records.as_ref(), EntityKind::Item, &name).await
}

/// Get a feat by name
pub async fn get_feat(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<EntityResponseDto>, (StatusCode, String)> {
    get_record(state.records.as_ref(), EntityKind::Feat, &name).await
}

async fn get_record(
    records: &dyn RecordService,
    kind: EntityKind,
    name: &str,
) -> Result<Json<EntityResponseDto>, (StatusCode, String)> {
    let entity = records.find(kind, name).await.map_err(error_response)?;
    Ok(Json(EntityResponseDto::from(entity)))
}

fn error_response(e: RecordError) -> (StatusCode, String) {
    match e {
        RecordError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::{InventoryRepositoryPort, RepositoryError};
    use crate::application::services::{RecordServiceImpl, WizardEngine};
    use crate::domain::entities::{Entity, Item};
    use crate::test_support::InMemoryStore;

    fn records(store: Arc<InMemoryStore>) -> RecordServiceImpl {
        let inventory: Arc<dyn InventoryRepositoryPort> = store.clone();
        RecordServiceImpl::new(store, inventory, WizardEngine::default())
    }

    #[tokio::test]
    async fn test_found_record_is_tagged_with_its_kind() {
        let store = Arc::new(InMemoryStore::new().with(Entity::Item(Item::new("Rope"))));
        let Json(dto) = get_record(&records(store), EntityKind::Item, "Rope")
            .await
            .unwrap();

        let json = serde_json::to_value(dto).unwrap();
        assert_eq!(json["kind"], "item");
        assert_eq!(json["name"], "Rope");
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let (status, message) = get_record(&records(store), EntityKind::Feat, "Power Attack")
            .await
            .unwrap_err();

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "No Feat named 'Power Attack'");
    }

    #[test]
    fn test_store_failures_are_server_errors() {
        let (status, _) =
            error_response(RecordError::Store(RepositoryError::Database("locked".into())));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
