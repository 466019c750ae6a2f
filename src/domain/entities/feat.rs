//! Feat entity

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::FeatId;

/// A feat, talent or class feature with a level requirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feat {
    pub id: FeatId,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub level: u32,
    pub effect: Option<String>,
}

impl Feat {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: FeatId::new(),
            name: name.into(),
            description: String::new(),
            image_url: None,
            level: 1,
            effect: None,
        }
    }
}
