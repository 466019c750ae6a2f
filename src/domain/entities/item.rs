//! Item entity - Equipment and loot that characters can carry

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Bulk, ItemId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub level: u32,
    pub effect: Option<String>,
    pub bulk: Bulk,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            description: String::new(),
            image_url: None,
            level: 0,
            effect: None,
            bulk: Bulk::Absent,
        }
    }

    pub fn with_bulk(mut self, bulk: Bulk) -> Self {
        self.bulk = bulk;
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Bulk label shown on cards, e.g. `L` for light items
    pub fn bulk_txt(&self) -> String {
        self.bulk.label()
    }
}
