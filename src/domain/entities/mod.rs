//! Domain entities - Records with identity that the bot stores

mod character;
mod entity;
mod feat;
mod inventory;
mod item;

pub use character::Character;
pub use entity::{
    Entity, EntityKind, ValidationError, DESCRIPTION_MAX_LENGTH, EFFECT_MAX_LENGTH,
    NAME_MAX_LENGTH, NAME_MIN_LENGTH,
};
pub use feat::Feat;
pub use inventory::{plan_transfer, InventoryEntry, InventoryLine, TransferError, TransferOutcome};
pub use item::Item;
