//! Conversions from channel messages to serenity builders

use serenity::all::{
    ButtonStyle as DiscordButtonStyle, CreateActionRow, CreateButton, CreateEmbed,
    CreateInputText, CreateInteractionResponseFollowup, CreateInteractionResponseMessage,
    CreateModal, CreateSelectMenu, CreateSelectMenuKind, CreateSelectMenuOption, EditMessage,
    InputTextStyle,
};

use crate::application::dto::Card;
use crate::application::ports::outbound::{
    ButtonStyle, ControlRow, FieldStyle, FormRequest, OutboundMessage,
};

/// Discord rejects empty embed field names and values
const BLANK: &str = "\u{200b}";

fn non_blank(text: &str) -> &str {
    if text.trim().is_empty() {
        BLANK
    } else {
        text
    }
}

pub fn card_embed(card: &Card) -> CreateEmbed {
    let mut embed = CreateEmbed::new().title(&card.title);
    for field in &card.fields {
        embed = embed.field(non_blank(&field.name), non_blank(&field.value), field.inline);
    }
    if let Some(url) = &card.image_url {
        embed = embed.image(url);
    }
    embed
}

pub fn action_rows(controls: &[ControlRow]) -> Vec<CreateActionRow> {
    controls
        .iter()
        .map(|row| match row {
            ControlRow::Select {
                id,
                placeholder,
                options,
            } => CreateActionRow::SelectMenu(
                CreateSelectMenu::new(
                    id,
                    CreateSelectMenuKind::String {
                        options: options
                            .iter()
                            .map(|o| CreateSelectMenuOption::new(&o.label, &o.value))
                            .collect(),
                    },
                )
                .placeholder(placeholder),
            ),
            ControlRow::Buttons(buttons) => CreateActionRow::Buttons(
                buttons
                    .iter()
                    .map(|b| {
                        CreateButton::new(&b.id)
                            .label(&b.label)
                            .style(button_style(b.style))
                    })
                    .collect(),
            ),
        })
        .collect()
}

fn button_style(style: ButtonStyle) -> DiscordButtonStyle {
    match style {
        ButtonStyle::Primary => DiscordButtonStyle::Primary,
        ButtonStyle::Secondary => DiscordButtonStyle::Secondary,
        ButtonStyle::Success => DiscordButtonStyle::Success,
        ButtonStyle::Danger => DiscordButtonStyle::Danger,
    }
}

/// Initial response or in-place update of a component's message
pub fn response_message(message: &OutboundMessage) -> CreateInteractionResponseMessage {
    let mut builder = CreateInteractionResponseMessage::new()
        .content(&message.content)
        .components(action_rows(&message.controls));
    builder = match &message.card {
        Some(card) => builder.embed(card_embed(card)),
        None => builder.embeds(Vec::new()),
    };
    builder
}

pub fn followup_message(message: &OutboundMessage) -> CreateInteractionResponseFollowup {
    let mut builder = CreateInteractionResponseFollowup::new()
        .content(non_blank(&message.content))
        .components(action_rows(&message.controls));
    if let Some(card) = &message.card {
        builder = builder.embed(card_embed(card));
    }
    builder
}

pub fn edit_message(message: &OutboundMessage) -> EditMessage {
    let builder = EditMessage::new()
        .content(&message.content)
        .components(action_rows(&message.controls));
    match &message.card {
        Some(card) => builder.embed(card_embed(card)),
        None => builder.embeds(Vec::new()),
    }
}

pub fn modal(custom_id: &str, form: &FormRequest) -> CreateModal {
    let rows = form
        .fields
        .iter()
        .map(|field| {
            let style = match field.style {
                FieldStyle::Text => InputTextStyle::Short,
                FieldStyle::Multiline => InputTextStyle::Paragraph,
            };
            let mut input = CreateInputText::new(style, &field.label, &field.id)
                .required(field.required);
            if let Some(max_length) = field.max_length {
                input = input.max_length(max_length);
            }
            if let Some(prefill) = field.prefill.as_deref().filter(|p| !p.is_empty()) {
                input = input.value(prefill);
            }
            CreateActionRow::InputText(input)
        })
        .collect();
    CreateModal::new(custom_id, &form.title).components(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::{ButtonSpec, ChoiceOption, FormFieldSpec};

    #[test]
    fn test_blank_field_values_are_replaced() {
        let card = Card::new("Valeros")
            .field("Character 1", "")
            .field("Description", "A mercenary");
        let json = serde_json::to_value(card_embed(&card)).unwrap();

        assert_eq!(json["title"], "Valeros");
        assert_eq!(json["fields"][0]["value"], BLANK);
        assert_eq!(json["fields"][1]["value"], "A mercenary");
    }

    #[test]
    fn test_image_is_attached() {
        let card = Card::new("Sword").image(Some("https://cdn.example/sword.png"));
        let json = serde_json::to_value(card_embed(&card)).unwrap();
        assert_eq!(json["image"]["url"], "https://cdn.example/sword.png");
    }

    #[test]
    fn test_controls_become_action_rows() {
        let controls = vec![
            ControlRow::Select {
                id: "bulk".to_string(),
                placeholder: "Bulk".to_string(),
                options: vec![ChoiceOption {
                    label: "L".to_string(),
                    value: "L".to_string(),
                }],
            },
            ControlRow::Buttons(vec![ButtonSpec {
                id: "next".to_string(),
                label: "Next".to_string(),
                style: ButtonStyle::Success,
            }]),
        ];
        let json = serde_json::to_value(action_rows(&controls)).unwrap();

        assert_eq!(json[0]["components"][0]["custom_id"], "bulk");
        assert_eq!(json[0]["components"][0]["options"][0]["value"], "L");
        assert_eq!(json[1]["components"][0]["custom_id"], "next");
        assert_eq!(json[1]["components"][0]["label"], "Next");
    }

    #[test]
    fn test_modal_prefills_fields() {
        let form = FormRequest {
            title: "Edit item".to_string(),
            fields: vec![FormFieldSpec {
                id: "name".to_string(),
                label: "Name".to_string(),
                style: FieldStyle::Text,
                max_length: Some(256),
                required: true,
                prefill: Some("Rope".to_string()),
            }],
        };
        let json = serde_json::to_value(modal("wizard-1", &form)).unwrap();

        assert_eq!(json["custom_id"], "wizard-1");
        assert_eq!(json["title"], "Edit item");
        let input = &json["components"][0]["components"][0];
        assert_eq!(input["custom_id"], "name");
        assert_eq!(input["value"], "Rope");
        assert_eq!(input["max_length"], 256);
    }
}
