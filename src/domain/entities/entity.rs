//! Entity - Closed set of record kinds the bot can create, edit and show
//!
//! Every flow that does not care which kind it is holding (the wizard, the
//! card builder, the store) works on [`Entity`] and matches on the variant.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::{Character, Feat, Item};

pub const NAME_MIN_LENGTH: usize = 2;
pub const NAME_MAX_LENGTH: usize = 256;
pub const DESCRIPTION_MAX_LENGTH: usize = 2000;
pub const EFFECT_MAX_LENGTH: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Character,
    Item,
    Feat,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Character, EntityKind::Item, EntityKind::Feat];

    /// Subcommand name
    pub fn key(self) -> &'static str {
        match self {
            EntityKind::Character => "character",
            EntityKind::Item => "item",
            EntityKind::Feat => "feat",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    pub fn level_range(self) -> RangeInclusive<u32> {
        match self {
            EntityKind::Character => 1..=20,
            EntityKind::Item => 0..=30,
            EntityKind::Feat => 1..=20,
        }
    }

    pub fn has_effect(self) -> bool {
        matches!(self, EntityKind::Item | EntityKind::Feat)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Character => write!(f, "Character"),
            EntityKind::Item => write!(f, "Item"),
            EntityKind::Feat => write!(f, "Feat"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name must be at least {NAME_MIN_LENGTH} characters long")]
    NameTooShort,
    #[error("Name can't be longer than {NAME_MAX_LENGTH} characters")]
    NameTooLong,
    #[error("Description can't be longer than {DESCRIPTION_MAX_LENGTH} characters")]
    DescriptionTooLong,
    #[error("Effect can't be longer than {EFFECT_MAX_LENGTH} characters")]
    EffectTooLong,
    #[error("{kind} level must be between {min} and {max}, got {level}")]
    LevelOutOfRange {
        kind: EntityKind,
        level: u32,
        min: u32,
        max: u32,
    },
}

/// A record mid-edit or as loaded from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    Character(Character),
    Item(Item),
    Feat(Feat),
}

macro_rules! each_kind {
    ($entity:expr, $inner:ident => $body:expr) => {
        match $entity {
            Entity::Character($inner) => $body,
            Entity::Item($inner) => $body,
            Entity::Feat($inner) => $body,
        }
    };
}

impl Entity {
    /// Blank record used by the create flow
    pub fn empty(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Character => Entity::Character(Character::new("")),
            EntityKind::Item => Entity::Item(Item::new("")),
            EntityKind::Feat => Entity::Feat(Feat::new("")),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Character(_) => EntityKind::Character,
            Entity::Item(_) => EntityKind::Item,
            Entity::Feat(_) => EntityKind::Feat,
        }
    }

    /// Stored id in its text form
    pub fn id_string(&self) -> String {
        each_kind!(self, e => e.id.to_string())
    }

    pub fn name(&self) -> &str {
        each_kind!(self, e => &e.name)
    }

    pub fn set_name(&mut self, name: String) {
        each_kind!(self, e => e.name = name)
    }

    pub fn description(&self) -> &str {
        each_kind!(self, e => &e.description)
    }

    pub fn set_description(&mut self, description: String) {
        each_kind!(self, e => e.description = description)
    }

    pub fn image_url(&self) -> Option<&str> {
        each_kind!(self, e => e.image_url.as_deref())
    }

    pub fn set_image_url(&mut self, url: Option<String>) {
        each_kind!(self, e => e.image_url = url)
    }

    pub fn level(&self) -> u32 {
        each_kind!(self, e => e.level)
    }

    pub fn set_level(&mut self, level: u32) {
        each_kind!(self, e => e.level = level)
    }

    /// `None` for kinds without an effect as well as for an empty effect
    pub fn effect(&self) -> Option<&str> {
        match self {
            Entity::Character(_) => None,
            Entity::Item(item) => item.effect.as_deref(),
            Entity::Feat(feat) => feat.effect.as_deref(),
        }
    }

    /// Returns false when the kind carries no effect
    pub fn set_effect(&mut self, effect: Option<String>) -> bool {
        match self {
            Entity::Character(_) => false,
            Entity::Item(item) => {
                item.effect = effect;
                true
            }
            Entity::Feat(feat) => {
                feat.effect = effect;
                true
            }
        }
    }

    /// Invariants checked right before the record is saved
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name_length = self.name().trim().chars().count();
        if name_length < NAME_MIN_LENGTH {
            return Err(ValidationError::NameTooShort);
        }
        if name_length > NAME_MAX_LENGTH {
            return Err(ValidationError::NameTooLong);
        }
        if self.description().chars().count() > DESCRIPTION_MAX_LENGTH {
            return Err(ValidationError::DescriptionTooLong);
        }
        if self
            .effect()
            .is_some_and(|effect| effect.chars().count() > EFFECT_MAX_LENGTH)
        {
            return Err(ValidationError::EffectTooLong);
        }

        let range = self.kind().level_range();
        if !range.contains(&self.level()) {
            return Err(ValidationError::LevelOutOfRange {
                kind: self.kind(),
                level: self.level(),
                min: *range.start(),
                max: *range.end(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_entities_start_at_kind_defaults() {
        assert_eq!(Entity::empty(EntityKind::Character).level(), 1);
        assert_eq!(Entity::empty(EntityKind::Item).level(), 0);
        assert_eq!(Entity::empty(EntityKind::Feat).kind(), EntityKind::Feat);
    }

    #[test]
    fn test_validate_name_length() {
        let mut entity = Entity::empty(EntityKind::Item);
        entity.set_name("X".to_string());
        assert_eq!(entity.validate(), Err(ValidationError::NameTooShort));

        entity.set_name("  Xy  ".to_string());
        assert!(entity.validate().is_ok());

        entity.set_name("x".repeat(NAME_MAX_LENGTH + 1));
        assert_eq!(entity.validate(), Err(ValidationError::NameTooLong));
    }

    #[test]
    fn test_validate_character_level_cap() {
        let mut entity = Entity::Character(Character::new("Valeros").with_level(20));
        assert!(entity.validate().is_ok());

        entity.set_level(21);
        assert!(matches!(
            entity.validate(),
            Err(ValidationError::LevelOutOfRange { level: 21, max: 20, .. })
        ));

        entity.set_level(0);
        assert!(entity.validate().is_err());
    }

    #[test]
    fn test_effect_only_on_items_and_feats() {
        let mut character = Entity::empty(EntityKind::Character);
        assert!(!character.set_effect(Some("Glows".to_string())));
        assert_eq!(character.effect(), None);

        let mut item = Entity::empty(EntityKind::Item);
        assert!(item.set_effect(Some("Glows".to_string())));
        assert_eq!(item.effect(), Some("Glows"));
    }

    #[test]
    fn test_kind_keys() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(EntityKind::from_key("spell"), None);
    }
}
