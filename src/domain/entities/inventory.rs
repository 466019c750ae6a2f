//! Inventory lines - How many of an item a character carries

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Bulk, CharacterId, ItemId};

/// One stored inventory row. Quantity is always positive while stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub character_id: CharacterId,
    pub item_id: ItemId,
    pub quantity: u32,
}

/// Inventory row joined with the item it refers to, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLine {
    pub item_id: ItemId,
    pub item_name: String,
    pub bulk: Bulk,
    pub quantity: u32,
}

impl InventoryLine {
    pub fn total_bulk_txt(&self) -> String {
        self.bulk.total_label(self.quantity)
    }
}

/// Result of a successful inventory transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// No line existed; one was created with this quantity
    Created { quantity: u32 },
    /// The existing line now holds this quantity
    Updated { quantity: u32 },
    /// The line dropped to zero or below and was deleted
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("Quantity can't be zero")]
    ZeroDelta,
    #[error("There is nothing to remove")]
    NothingToRemove,
    #[error("Can't carry more than {} of one item", u32::MAX)]
    QuantityTooLarge,
}

/// Apply a signed quantity change to an optional existing line.
///
/// Returns the outcome plus the quantity to store, `None` meaning the line
/// must be deleted.
pub fn plan_transfer(
    existing: Option<u32>,
    delta: i64,
) -> Result<(TransferOutcome, Option<u32>), TransferError> {
    if delta == 0 {
        return Err(TransferError::ZeroDelta);
    }
    match existing {
        None | Some(0) if delta < 0 => Err(TransferError::NothingToRemove),
        None => {
            let quantity =
                u32::try_from(delta).map_err(|_| TransferError::QuantityTooLarge)?;
            Ok((TransferOutcome::Created { quantity }, Some(quantity)))
        }
        Some(current) => {
            let next = i64::from(current).saturating_add(delta);
            if next <= 0 {
                Ok((TransferOutcome::Removed, None))
            } else {
                let quantity =
                    u32::try_from(next).map_err(|_| TransferError::QuantityTooLarge)?;
                Ok((TransferOutcome::Updated { quantity }, Some(quantity)))
            }
        }
    }
}
