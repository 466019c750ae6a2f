//! Shared application state

use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::application::ports::outbound::{EntityStorePort, InventoryRepositoryPort};
use crate::application::services::{
    CommandDispatcher, InventoryService, InventoryServiceImpl, RecordService, RecordServiceImpl,
    WizardEngine, WizardOptions,
};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::SqliteRepository;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub repository: Arc<SqliteRepository>,
    // Application services
    pub records: Arc<dyn RecordService>,
    pub dispatcher: CommandDispatcher,
    /// Cancelled on shutdown; every open wizard watches a child token
    pub shutdown: CancellationToken,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let repository = Arc::new(SqliteRepository::connect(&config.database_url).await?);
        let store: Arc<dyn EntityStorePort> = repository.clone();
        let inventory_repository: Arc<dyn InventoryRepositoryPort> = repository.clone();

        let shutdown = CancellationToken::new();
        let engine = WizardEngine::new(WizardOptions {
            timeout: config.wizard_timeout,
            cancel: Some(shutdown.child_token()),
        });

        // Initialize application services
        let records: Arc<dyn RecordService> = Arc::new(RecordServiceImpl::new(
            store.clone(),
            inventory_repository.clone(),
            engine,
        ));
        let inventory: Arc<dyn InventoryService> =
            Arc::new(InventoryServiceImpl::new(store, inventory_repository));
        let dispatcher = CommandDispatcher::new(records.clone(), inventory);

        Ok(Self {
            config,
            repository,
            records,
            dispatcher,
            shutdown,
        })
    }
}
