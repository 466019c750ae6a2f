//! Domain layer - Core record types with no external dependencies
//!
//! This layer contains:
//! - Entities: Character, Item, Feat and inventory lines
//! - Value Objects: ids, ability scores, bulk, dice formulas

pub mod entities;
pub mod value_objects;
