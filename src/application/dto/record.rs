use serde::Serialize;

use crate::domain::entities::{Character, Entity, Feat, InventoryLine, Item};
use crate::domain::value_objects::Ability;

#[derive(Debug, Serialize)]
pub struct AbilityScoreDto {
    pub ability: Ability,
    pub score: u32,
    pub modifier: i32,
}

#[derive(Debug, Serialize)]
pub struct CharacterResponseDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub owner_id: Option<String>,
    pub class_name: Option<String>,
    pub level: u32,
    pub abilities: Vec<AbilityScoreDto>,
}

impl From<Character> for CharacterResponseDto {
    fn from(c: Character) -> Self {
        let abilities = Ability::ALL
            .into_iter()
            .map(|ability| AbilityScoreDto {
                ability,
                score: c.abilities.get(ability),
                modifier: c.abilities.modifier(ability),
            })
            .collect();
        Self {
            id: c.id.to_string(),
            name: c.name,
            description: c.description,
            image_url: c.image_url,
            owner_id: c.owner.map(|o| o.to_string()),
            class_name: c.class_name,
            level: c.level,
            abilities,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ItemResponseDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub level: u32,
    pub effect: Option<String>,
    pub bulk: String,
}

impl From<Item> for ItemResponseDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id.to_string(),
            bulk: item.bulk_txt(),
            name: item.name,
            description: item.description,
            image_url: item.image_url,
            level: item.level,
            effect: item.effect,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeatResponseDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub level: u32,
    pub effect: Option<String>,
}

impl From<Feat> for FeatResponseDto {
    fn from(feat: Feat) -> Self {
        Self {
            id: feat.id.to_string(),
            name: feat.name,
            description: feat.description,
            image_url: feat.image_url,
            level: feat.level,
            effect: feat.effect,
        }
    }
}

/// Any record, tagged with its kind
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityResponseDto {
    Character(CharacterResponseDto),
    Item(ItemResponseDto),
    Feat(FeatResponseDto),
}

impl From<Entity> for EntityResponseDto {
    fn from(entity: Entity) -> Self {
        match entity {
            Entity::Character(c) => EntityResponseDto::Character(c.into()),
            Entity::Item(i) => EntityResponseDto::Item(i.into()),
            Entity::Feat(f) => EntityResponseDto::Feat(f.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InventoryLineResponseDto {
    pub item_id: String,
    pub item_name: String,
    pub quantity: u32,
    pub total_bulk: String,
}

impl From<InventoryLine> for InventoryLineResponseDto {
    fn from(line: InventoryLine) -> Self {
        Self {
            item_id: line.item_id.to_string(),
            total_bulk: line.total_bulk_txt(),
            item_name: line.item_name,
            quantity: line.quantity,
        }
    }
}
