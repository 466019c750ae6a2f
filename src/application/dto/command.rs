//! Slash commands as the application understands them, independent of the
//! chat platform that delivered them.

use std::collections::HashMap;

use crate::domain::entities::EntityKind;

pub const ROLL_COMMAND: &str = "roll";
pub const CREATE_COMMAND: &str = "create";
pub const EDIT_COMMAND: &str = "edit";
pub const VIEW_COMMAND: &str = "view";
pub const GIVE_COMMAND: &str = "give";

/// Value of one command option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Attachment { url: String },
}

/// Options of a (sub)command keyed by option name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    values: HashMap<String, OptionValue>,
}

impl CommandArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: OptionValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: OptionValue) {
        self.values.insert(name.into(), value);
    }

    fn string(&self, name: &'static str) -> Result<Option<String>, CommandParseError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(OptionValue::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(CommandParseError::WrongType(name)),
        }
    }

    fn required_string(&self, name: &'static str) -> Result<String, CommandParseError> {
        self.string(name)?
            .ok_or(CommandParseError::MissingArgument(name))
    }

    fn integer(&self, name: &'static str) -> Result<Option<i64>, CommandParseError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(OptionValue::Integer(n)) => Ok(Some(*n)),
            Some(_) => Err(CommandParseError::WrongType(name)),
        }
    }

    fn attachment_url(&self, name: &'static str) -> Result<Option<String>, CommandParseError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(OptionValue::Attachment { url }) => Ok(Some(url.clone())),
            Some(_) => Err(CommandParseError::WrongType(name)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandParseError {
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),
    #[error("Choose what to {0}")]
    MissingSubcommand(String),
    #[error("Unknown subcommand '{0}'")]
    UnknownSubcommand(String),
    #[error("Missing argument '{0}'")]
    MissingArgument(&'static str),
    #[error("Argument '{0}' has the wrong type")]
    WrongType(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Roll {
        formula: String,
    },
    Create {
        kind: EntityKind,
        image_url: Option<String>,
    },
    Edit {
        kind: EntityKind,
        name: String,
        image_url: Option<String>,
    },
    View {
        kind: EntityKind,
        name: String,
    },
    Give {
        character: String,
        item: String,
        quantity: i64,
    },
}

impl BotCommand {
    pub fn parse(
        command: &str,
        subcommand: Option<&str>,
        args: &CommandArgs,
    ) -> Result<Self, CommandParseError> {
        if command == ROLL_COMMAND {
            return Ok(BotCommand::Roll {
                formula: args.required_string("formula")?,
            });
        }
        if !matches!(
            command,
            CREATE_COMMAND | EDIT_COMMAND | VIEW_COMMAND | GIVE_COMMAND
        ) {
            return Err(CommandParseError::UnknownCommand(command.to_string()));
        }

        let sub = subcommand.ok_or_else(|| CommandParseError::MissingSubcommand(command.to_string()))?;
        let kind = EntityKind::from_key(sub)
            .ok_or_else(|| CommandParseError::UnknownSubcommand(sub.to_string()))?;

        match command {
            CREATE_COMMAND => Ok(BotCommand::Create {
                kind,
                image_url: args.attachment_url("image")?,
            }),
            EDIT_COMMAND => Ok(BotCommand::Edit {
                kind,
                name: args.required_string("name")?,
                image_url: args.attachment_url("image")?,
            }),
            VIEW_COMMAND => Ok(BotCommand::View {
                kind,
                name: args.required_string("name")?,
            }),
            _ if kind != EntityKind::Item => {
                Err(CommandParseError::UnknownSubcommand(sub.to_string()))
            }
            _ => Ok(BotCommand::Give {
                character: args.required_string("char_name")?,
                item: args.required_string("item_name")?,
                quantity: args.integer("quantity")?.unwrap_or(1),
            }),
        }
    }

    /// Which record kind feeds the autocompletion of a focused option
    pub fn autocomplete_kind(
        command: &str,
        subcommand: Option<&str>,
        option: &str,
    ) -> Option<EntityKind> {
        match (command, option) {
            (GIVE_COMMAND, "char_name") => Some(EntityKind::Character),
            (GIVE_COMMAND, "item_name") => Some(EntityKind::Item),
            (EDIT_COMMAND | VIEW_COMMAND, "name") => subcommand.and_then(EntityKind::from_key),
            _ => None,
        }
    }
}
