//! Data Transfer Objects - For API boundaries
//!
//! DTOs live in the application layer so infrastructure (Discord/HTTP) can
//! render and parse them without reaching into the domain model.

pub mod card;
pub mod command;
pub mod record;

pub use card::{Card, CardField};
pub use command::{BotCommand, CommandArgs, CommandParseError, OptionValue};
pub use record::*;
