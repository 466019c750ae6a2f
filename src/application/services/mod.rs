//! Application services - Use case implementations
//!
//! Each service depends on the outbound ports only, so the Discord and HTTP
//! adapters and the tests can all drive the same code.

pub mod card_builder;
pub mod command_dispatcher;
pub mod dice_service;
pub mod inventory_service;
pub mod record_service;
pub mod wizard;

pub use command_dispatcher::CommandDispatcher;
pub use dice_service::DiceService;
pub use inventory_service::{InventoryError, InventoryService, InventoryServiceImpl};
pub use record_service::{RecordError, RecordService, RecordServiceImpl};
pub use wizard::{WizardEngine, WizardError, WizardOptions};
