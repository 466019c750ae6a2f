//! Editable fields and their typed setters
//!
//! Every control a wizard shows names one [`FieldId`]. The id is resolved to
//! a plain function pointer when the step is defined, so applying user input
//! never goes through string-keyed attribute lookups.

use crate::domain::entities::{Entity, EntityKind};
use crate::domain::value_objects::{Ability, Bulk, BulkError};

/// Scores accepted from the ability select menus
pub const ABILITY_SCORE_RANGE: std::ops::RangeInclusive<u32> = 1..=30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Name,
    Description,
    Level,
    Effect,
    Bulk,
    Ability(Ability),
}

/// Applies one raw value to a record
pub type FieldSetter = fn(&mut Entity, &str) -> Result<(), FieldError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("'{value}' is not a whole number")]
    NotANumber { value: String },
    #[error("'{value}' is not a valid choice: {reason}")]
    InvalidChoice { value: String, reason: String },
    #[error("{kind} has no such field")]
    NotApplicable { kind: EntityKind },
}

impl FieldId {
    /// Id used for form fields and select controls
    pub fn control_id(self) -> &'static str {
        match self {
            FieldId::Name => "name",
            FieldId::Description => "description",
            FieldId::Level => "level",
            FieldId::Effect => "effect",
            FieldId::Bulk => "bulk",
            FieldId::Ability(ability) => ability.key(),
        }
    }

    pub fn from_control_id(id: &str) -> Option<Self> {
        match id {
            "name" => Some(FieldId::Name),
            "description" => Some(FieldId::Description),
            "level" => Some(FieldId::Level),
            "effect" => Some(FieldId::Effect),
            "bulk" => Some(FieldId::Bulk),
            other => Ability::from_key(other).map(FieldId::Ability),
        }
    }

    /// Fields whose text must parse as an integer
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldId::Level)
    }

    pub fn setter(self) -> FieldSetter {
        match self {
            FieldId::Name => set_name,
            FieldId::Description => set_description,
            FieldId::Level => set_level,
            FieldId::Effect => set_effect,
            FieldId::Bulk => set_bulk,
            FieldId::Ability(Ability::Strength) => set_strength,
            FieldId::Ability(Ability::Dexterity) => set_dexterity,
            FieldId::Ability(Ability::Constitution) => set_constitution,
            FieldId::Ability(Ability::Intelligence) => set_intelligence,
            FieldId::Ability(Ability::Wisdom) => set_wisdom,
            FieldId::Ability(Ability::Charisma) => set_charisma,
        }
    }

    /// Current value as text, used to prefill edit forms
    pub fn current_value(self, entity: &Entity) -> Option<String> {
        match (self, entity) {
            (FieldId::Name, _) => Some(entity.name().to_string()),
            (FieldId::Description, _) => Some(entity.description().to_string()),
            (FieldId::Level, _) => Some(entity.level().to_string()),
            (FieldId::Effect, _) => entity.effect().map(str::to_string),
            (FieldId::Bulk, Entity::Item(item)) => Some(item.bulk.label()),
            (FieldId::Ability(ability), Entity::Character(c)) => {
                Some(c.abilities.get(ability).to_string())
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.control_id())
    }
}

fn set_name(entity: &mut Entity, value: &str) -> Result<(), FieldError> {
    entity.set_name(value.to_string());
    Ok(())
}

fn set_description(entity: &mut Entity, value: &str) -> Result<(), FieldError> {
    entity.set_description(value.to_string());
    Ok(())
}

fn set_level(entity: &mut Entity, value: &str) -> Result<(), FieldError> {
    let level = value.trim().parse().map_err(|_| FieldError::NotANumber {
        value: value.to_string(),
    })?;
    entity.set_level(level);
    Ok(())
}

fn set_effect(entity: &mut Entity, value: &str) -> Result<(), FieldError> {
    let effect = (!value.trim().is_empty()).then(|| value.to_string());
    if entity.set_effect(effect) {
        Ok(())
    } else {
        Err(FieldError::NotApplicable {
            kind: entity.kind(),
        })
    }
}

fn set_bulk(entity: &mut Entity, value: &str) -> Result<(), FieldError> {
    let Entity::Item(item) = entity else {
        return Err(FieldError::NotApplicable {
            kind: entity.kind(),
        });
    };
    item.bulk = Bulk::parse(value).map_err(|e: BulkError| FieldError::InvalidChoice {
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

fn set_ability(entity: &mut Entity, ability: Ability, value: &str) -> Result<(), FieldError> {
    let Entity::Character(character) = entity else {
        return Err(FieldError::NotApplicable {
            kind: entity.kind(),
        });
    };
    let score: u32 = value.trim().parse().map_err(|_| FieldError::InvalidChoice {
        value: value.to_string(),
        reason: "not a score".to_string(),
    })?;
    if !ABILITY_SCORE_RANGE.contains(&score) {
        return Err(FieldError::InvalidChoice {
            value: value.to_string(),
            reason: format!(
                "scores run from {} to {}",
                ABILITY_SCORE_RANGE.start(),
                ABILITY_SCORE_RANGE.end()
            ),
        });
    }
    character.abilities.set(ability, score);
    Ok(())
}

macro_rules! ability_setter {
    ($name:ident, $ability:expr) => {
        fn $name(entity: &mut Entity, value: &str) -> Result<(), FieldError> {
            set_ability(entity, $ability, value)
        }
    };
}

ability_setter!(set_strength, Ability::Strength);
ability_setter!(set_dexterity, Ability::Dexterity);
ability_setter!(set_constitution, Ability::Constitution);
ability_setter!(set_intelligence, Ability::Intelligence);
ability_setter!(set_wisdom, Ability::Wisdom);
ability_setter!(set_charisma, Ability::Charisma);
