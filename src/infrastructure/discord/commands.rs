//! Slash command definitions and option parsing

use serenity::all::{
    CommandDataOptionValue, CommandInteraction, CommandOptionType, CreateCommand,
    CreateCommandOption, ResolvedOption, ResolvedValue,
};

use crate::application::dto::command::{
    CREATE_COMMAND, EDIT_COMMAND, GIVE_COMMAND, ROLL_COMMAND, VIEW_COMMAND,
};
use crate::application::dto::{BotCommand, CommandArgs, CommandParseError, OptionValue};
use crate::domain::entities::EntityKind;

/// Largest number of items one `/give` may add or remove
pub const MAX_GIVE_QUANTITY: i64 = 10_000;

/// Every command the bot registers
pub fn definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new(ROLL_COMMAND)
            .description("Roll dice, e.g. 4d6kh3 or d20+5")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "formula", "Dice formula")
                    .required(true),
            ),
        with_kind_subcommands(
            CreateCommand::new(CREATE_COMMAND).description("Create a record"),
            |kind| {
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    kind.key(),
                    format!("Create a {}", kind.key()),
                )
                .add_sub_option(image_option())
            },
        ),
        with_kind_subcommands(
            CreateCommand::new(EDIT_COMMAND).description("Edit a record"),
            |kind| {
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    kind.key(),
                    format!("Edit a {}", kind.key()),
                )
                .add_sub_option(name_option("name", kind))
                .add_sub_option(image_option())
            },
        ),
        with_kind_subcommands(
            CreateCommand::new(VIEW_COMMAND).description("Show a record"),
            |kind| {
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    kind.key(),
                    format!("Show a {}", kind.key()),
                )
                .add_sub_option(name_option("name", kind))
            },
        ),
        CreateCommand::new(GIVE_COMMAND)
            .description("Give items to a character, or take them with a negative quantity")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    EntityKind::Item.key(),
                    "Give an item",
                )
                .add_sub_option(name_option("char_name", EntityKind::Character))
                .add_sub_option(name_option("item_name", EntityKind::Item))
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "quantity",
                        "How many, 1 by default",
                    )
                    .min_int_value(-MAX_GIVE_QUANTITY)
                    .max_int_value(MAX_GIVE_QUANTITY),
                ),
            ),
    ]
}

fn with_kind_subcommands(
    mut command: CreateCommand,
    subcommand: impl Fn(EntityKind) -> CreateCommandOption,
) -> CreateCommand {
    for kind in EntityKind::ALL {
        command = command.add_option(subcommand(kind));
    }
    command
}

fn name_option(name: &str, kind: EntityKind) -> CreateCommandOption {
    CreateCommandOption::new(
        CommandOptionType::String,
        name,
        format!("Name of the {}", kind.key()),
    )
    .required(true)
    .set_autocomplete(true)
}

fn image_option() -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::Attachment, "image", "Picture for the card")
}

/// Turn a slash command invocation into a [`BotCommand`]
pub fn parse(command: &CommandInteraction) -> Result<BotCommand, CommandParseError> {
    let (subcommand, args) = collect_options(command.data.options());
    BotCommand::parse(&command.data.name, subcommand.as_deref(), &args)
}

fn collect_options(options: Vec<ResolvedOption<'_>>) -> (Option<String>, CommandArgs) {
    let mut subcommand = None;
    let mut args = CommandArgs::new();
    for option in options {
        match option.value {
            ResolvedValue::SubCommand(sub_options) => {
                subcommand = Some(option.name.to_string());
                args = collect_options(sub_options).1;
            }
            ResolvedValue::String(value) => args.insert(option.name, OptionValue::String(value.to_string())),
            ResolvedValue::Integer(value) => args.insert(option.name, OptionValue::Integer(value)),
            ResolvedValue::Attachment(attachment) => args.insert(
                option.name,
                OptionValue::Attachment {
                    url: attachment.url.clone(),
                },
            ),
            _ => {}
        }
    }
    (subcommand, args)
}

/// The focused option of an autocomplete request: subcommand, option name and typed text
pub fn focused(command: &CommandInteraction) -> Option<(Option<String>, String, String)> {
    let subcommand = command
        .data
        .options
        .iter()
        .find(|o| matches!(o.value, CommandDataOptionValue::SubCommand(_)))
        .map(|o| o.name.clone());
    let focused = command.data.autocomplete()?;
    Some((subcommand, focused.name.to_string(), focused.value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_command_is_defined() {
        let json = serde_json::to_value(definitions()).unwrap();
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["roll", "create", "edit", "view", "give"]);
    }

    #[test]
    fn test_record_commands_have_a_subcommand_per_kind() {
        let json = serde_json::to_value(definitions()).unwrap();
        let edit = &json[2];
        let subcommands: Vec<&str> = edit["options"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["name"].as_str().unwrap())
            .collect();
        assert_eq!(subcommands, vec!["character", "item", "feat"]);
        assert_eq!(edit["options"][0]["options"][0]["autocomplete"], true);
    }

    #[test]
    fn test_give_options() {
        let json = serde_json::to_value(definitions()).unwrap();
        let give = &json[4]["options"][0];
        assert_eq!(give["name"], "item");
        let options: Vec<&str> = give["options"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["name"].as_str().unwrap())
            .collect();
        assert_eq!(options, vec!["char_name", "item_name", "quantity"]);
        assert_eq!(give["options"][2]["min_value"], -10_000);
        assert_eq!(give["options"][2]["max_value"], 10_000);
    }
}
