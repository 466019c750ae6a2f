//! Card building functions - Turn a record into its displayable card
//!
//! Pure functions: the card always reflects the record as passed in and is
//! rebuilt from scratch after every change.

use crate::application::dto::Card;
use crate::domain::entities::{Entity, InventoryLine};
use crate::domain::value_objects::Ability;

pub const DESCRIPTION_FIELD: &str = "Description";
pub const ABILITIES_FIELD: &str = "Abilities";
pub const BULK_FIELD: &str = "Bulk";
pub const EFFECT_FIELD: &str = "Effect";
pub const INVENTORY_FIELD: &str = "Inventory";

/// Build the card for a record
pub fn render(entity: &Entity) -> Card {
    let mut card = Card::new(entity.name())
        .field(kind_label(entity), "")
        .field(DESCRIPTION_FIELD, entity.description())
        .image(entity.image_url());

    match entity {
        Entity::Character(character) => {
            let lines: Vec<String> = Ability::ALL
                .into_iter()
                .map(|ability| {
                    format!(
                        "{}: {} ({:+})",
                        ability,
                        character.abilities.get(ability),
                        character.abilities.modifier(ability)
                    )
                })
                .collect();
            card = card.field(ABILITIES_FIELD, lines.join("\n"));
        }
        Entity::Item(item) => {
            card = card
                .field(BULK_FIELD, item.bulk_txt())
                .field(EFFECT_FIELD, item.effect.clone().unwrap_or_default());
        }
        Entity::Feat(feat) => {
            card = card.field(EFFECT_FIELD, feat.effect.clone().unwrap_or_default());
        }
    }

    card
}

/// Character card followed by the items the character carries
pub fn render_with_inventory(entity: &Entity, lines: &[InventoryLine]) -> Card {
    let card = render(entity);
    if lines.is_empty() {
        return card.field(INVENTORY_FIELD, "Empty");
    }
    let rows: Vec<String> = lines
        .iter()
        .map(|line| {
            format!(
                "{} ×{} (bulk {})",
                line.item_name,
                line.quantity,
                line.total_bulk_txt()
            )
        })
        .collect();
    card.field(INVENTORY_FIELD, rows.join("\n"))
}

/// Heading of the first field: the class name when a character has one,
/// otherwise the kind and level
fn kind_label(entity: &Entity) -> String {
    match entity {
        Entity::Character(character) => match &character.class_name {
            Some(class_name) => class_name.clone(),
            None => format!("{} {}", entity.kind(), character.level),
        },
        Entity::Item(item) => format!("{} {}", entity.kind(), item.level),
        Entity::Feat(feat) => format!("{} {}", entity.kind(), feat.level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Character, Feat, Item};
    use crate::domain::value_objects::{Bulk, ItemId};

    fn fighter() -> Entity {
        let mut character = Character::new("Valeros")
            .with_description("A mercenary")
            .with_level(3);
        character.abilities.set(Ability::Strength, 18);
        character.abilities.set(Ability::Intelligence, 7);
        Entity::Character(character)
    }

    #[test]
    fn test_render_is_deterministic() {
        let entity = fighter();
        assert_eq!(render(&entity), render(&entity));
    }

    #[test]
    fn test_character_card() {
        let card = render(&fighter());
        assert_eq!(card.title, "Valeros");
        assert_eq!(card.fields[0].name, "Character 3");
        assert_eq!(card.field_value(DESCRIPTION_FIELD), Some("A mercenary"));

        let abilities = card.field_value(ABILITIES_FIELD).unwrap();
        assert!(abilities.contains("Strength: 18 (+4)"));
        assert!(abilities.contains("Intelligence: 7 (-2)"));
        assert!(abilities.contains("Wisdom: 10 (+0)"));
        assert_eq!(card.field_value(EFFECT_FIELD), None);
        assert_eq!(card.field_value(BULK_FIELD), None);
    }

    #[test]
    fn test_class_name_replaces_kind_label() {
        let entity = Entity::Character(Character::new("Kyra").with_class("Cleric"));
        assert_eq!(render(&entity).fields[0].name, "Cleric");
    }

    #[test]
    fn test_item_card() {
        let mut item = Item::new("Sword").with_level(3).with_bulk(Bulk::Light);
        item.effect = Some("+1 to hit".to_string());
        item.image_url = Some("https://cdn.example/sword.png".to_string());
        let card = render(&Entity::Item(item));

        assert_eq!(card.fields[0].name, "Item 3");
        assert_eq!(card.field_value(BULK_FIELD), Some("L"));
        assert_eq!(card.field_value(EFFECT_FIELD), Some("+1 to hit"));
        assert_eq!(card.image_url.as_deref(), Some("https://cdn.example/sword.png"));
    }

    #[test]
    fn test_feat_card_has_effect_but_no_bulk() {
        let card = render(&Entity::Feat(Feat::new("Power Attack")));
        assert_eq!(card.fields[0].name, "Feat 1");
        assert_eq!(card.field_value(EFFECT_FIELD), Some(""));
        assert_eq!(card.field_value(BULK_FIELD), None);
    }

    #[test]
    fn test_inventory_listing() {
        let lines = vec![InventoryLine {
            item_id: ItemId::new(),
            item_name: "Torch".to_string(),
            bulk: Bulk::Light,
            quantity: 5,
        }];
        let card = render_with_inventory(&fighter(), &lines);
        assert_eq!(card.field_value(INVENTORY_FIELD), Some("Torch ×5 (bulk 0 5L)"));

        let empty = render_with_inventory(&fighter(), &[]);
        assert_eq!(empty.field_value(INVENTORY_FIELD), Some("Empty"));
    }
}
