//! Character entity - A player or GM character with ability scores

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{AbilityScores, CharacterId, OwnerId};

/// A character sheet as the bot keeps it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    /// User who created the character through the bot
    pub owner: Option<OwnerId>,
    /// Display name of the character's class, when one is assigned
    pub class_name: Option<String>,
    pub level: u32,
    pub abilities: AbilityScores,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            description: String::new(),
            image_url: None,
            owner: None,
            class_name: None,
            level: 1,
            abilities: AbilityScores::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_owner(mut self, owner: OwnerId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }
}
