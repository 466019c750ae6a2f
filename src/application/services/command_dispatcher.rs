//! Command Dispatcher - Routes slash commands to the services
//!
//! Every failure a user can act on is turned into a private notice on the
//! same interaction. Anything else is logged and reported generically.

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, instrument, warn};

use crate::application::dto::BotCommand;
use crate::application::ports::outbound::{
    ChannelError, InteractionChannel, OutboundMessage, RepositoryError,
};
use crate::application::services::dice_service::DiceService;
use crate::application::services::inventory_service::{InventoryError, InventoryService};
use crate::application::services::record_service::{RecordError, RecordService};
use crate::application::services::wizard::WizardError;
use crate::domain::entities::{EntityKind, TransferOutcome};
use crate::domain::value_objects::OwnerId;

pub const LEVEL_NOT_A_NUMBER: &str = "Level must be a number!";
pub const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Debug, thiserror::Error)]
enum DispatchError {
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

#[derive(Clone)]
pub struct CommandDispatcher {
    records: Arc<dyn RecordService>,
    inventory: Arc<dyn InventoryService>,
    dice: DiceService,
}

impl CommandDispatcher {
    pub fn new(records: Arc<dyn RecordService>, inventory: Arc<dyn InventoryService>) -> Self {
        Self {
            records,
            inventory,
            dice: DiceService::new(),
        }
    }

    /// Run one command to completion on `channel`
    #[instrument(skip(self, channel, invoker), fields(invoker = %invoker))]
    pub async fn dispatch(
        &self,
        command: BotCommand,
        invoker: OwnerId,
        channel: &mut dyn InteractionChannel,
    ) -> anyhow::Result<()> {
        let Err(err) = self.run(command, invoker, channel).await else {
            return Ok(());
        };

        let notice = match user_notice(&err) {
            Some(notice) => {
                warn!(error = %err, "Command rejected");
                notice
            }
            None => {
                error!(error = %err, "Command failed");
                GENERIC_FAILURE.to_string()
            }
        };
        channel
            .send_ephemeral_notice(&notice)
            .await
            .context("Failed to deliver error notice")
    }

    /// Names offered while the user types the `option` argument
    pub async fn autocomplete(
        &self,
        command: &str,
        subcommand: Option<&str>,
        option: &str,
        fragment: &str,
    ) -> Vec<String> {
        let Some(kind) = BotCommand::autocomplete_kind(command, subcommand, option) else {
            return Vec::new();
        };
        match self.records.suggest_names(kind, fragment).await {
            Ok(names) => names,
            Err(e) => {
                error!(error = %e, "Autocompletion failed");
                Vec::new()
            }
        }
    }

    async fn run(
        &self,
        command: BotCommand,
        invoker: OwnerId,
        channel: &mut dyn InteractionChannel,
    ) -> Result<(), DispatchError> {
        match command {
            BotCommand::Roll { formula } => {
                let reply = match self.dice.roll(&formula) {
                    Ok(result) => DiceService::describe(&result),
                    Err(e) => e.to_string(),
                };
                channel.send(OutboundMessage::text(reply)).await?;
            }
            BotCommand::Create { kind, image_url } => {
                self.records.create(kind, image_url, invoker, channel).await?;
            }
            BotCommand::Edit {
                kind,
                name,
                image_url,
            } => {
                self.records.edit(kind, &name, image_url, channel).await?;
            }
            BotCommand::View { kind, name } => {
                self.records.view(kind, &name, channel).await?;
            }
            BotCommand::Give {
                character,
                item,
                quantity,
            } => {
                let outcome = self.inventory.give(&character, &item, quantity).await?;
                let reply = match outcome {
                    TransferOutcome::Created { quantity } | TransferOutcome::Updated { quantity } => {
                        format!("{} now carries {} ×{}", character, item, quantity)
                    }
                    TransferOutcome::Removed => format!("{} no longer carries {}", character, item),
                };
                channel.send(OutboundMessage::text(reply)).await?;
            }
        }
        Ok(())
    }
}

fn not_found(kind: EntityKind, name: &str) -> String {
    format!("No {} named '{}'", kind.key(), name)
}

fn conflict(kind: EntityKind, name: &str) -> String {
    let article = match kind {
        EntityKind::Item => "An",
        EntityKind::Character | EntityKind::Feat => "A",
    };
    format!("{} {} named '{}' already exists", article, kind.key(), name)
}

fn store_notice(err: &RepositoryError) -> Option<String> {
    match err {
        RepositoryError::Conflict { kind, name } => Some(conflict(*kind, name)),
        RepositoryError::Database(_) | RepositoryError::Corrupt(_) => None,
    }
}

/// Text shown to the user, `None` for failures they can't act on
fn user_notice(err: &DispatchError) -> Option<String> {
    match err {
        DispatchError::Record(RecordError::NotFound { kind, name })
        | DispatchError::Inventory(InventoryError::NotFound { kind, name }) => {
            Some(not_found(*kind, name))
        }
        DispatchError::Record(RecordError::Store(e))
        | DispatchError::Record(RecordError::Wizard(WizardError::Store(e)))
        | DispatchError::Inventory(InventoryError::Store(e)) => store_notice(e),
        DispatchError::Record(RecordError::Wizard(wizard)) => match wizard {
            WizardError::InvalidNumericField { .. } => Some(LEVEL_NOT_A_NUMBER.to_string()),
            WizardError::InvalidChoice { .. } | WizardError::Invalid(_) => Some(wizard.to_string()),
            WizardError::TimedOut => Some("The editor timed out, nothing was saved".to_string()),
            WizardError::Cancelled => Some("Cancelled, nothing was saved".to_string()),
            WizardError::Channel(_) | WizardError::Store(_) => None,
        },
        DispatchError::Inventory(InventoryError::Transfer(e)) => Some(e.to_string()),
        DispatchError::Record(RecordError::Channel(_)) | DispatchError::Channel(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::inventory_service::InventoryServiceImpl;
    use crate::application::services::record_service::RecordServiceImpl;
    use crate::application::services::wizard::WizardEngine;
    use crate::domain::entities::{Character, Entity, Item};
    use crate::test_support::{InMemoryStore, ScriptedChannel};

    fn dispatcher(store: Arc<InMemoryStore>) -> CommandDispatcher {
        CommandDispatcher::new(
            Arc::new(RecordServiceImpl::new(
                store.clone(),
                store.clone(),
                WizardEngine::default(),
            )),
            Arc::new(InventoryServiceImpl::new(store.clone(), store)),
        )
    }

    fn seeded() -> Arc<InMemoryStore> {
        Arc::new(
            InMemoryStore::new()
                .with(Entity::Character(Character::new("Valeros")))
                .with(Entity::Item(Item::new("Rope"))),
        )
    }

    #[tokio::test]
    async fn test_roll_replies_with_total() {
        let mut channel = ScriptedChannel::new();
        dispatcher(seeded())
            .dispatch(
                BotCommand::Roll {
                    formula: "1 + 2".to_string(),
                },
                OwnerId(1),
                &mut channel,
            )
            .await
            .unwrap();
        assert_eq!(channel.sent[0].content, "1+2: 3\n1 + 2");
    }

    #[tokio::test]
    async fn test_bad_formula_is_reported_as_message() {
        let mut channel = ScriptedChannel::new();
        dispatcher(seeded())
            .dispatch(
                BotCommand::Roll {
                    formula: "d1".to_string(),
                },
                OwnerId(1),
                &mut channel,
            )
            .await
            .unwrap();
        assert!(channel.sent[0].content.contains("sides"));
        assert!(channel.notices.is_empty());
    }

    #[tokio::test]
    async fn test_overflowing_formula_is_reported_as_message() {
        let mut channel = ScriptedChannel::new();
        dispatcher(seeded())
            .dispatch(
                BotCommand::Roll {
                    formula: "9223372036854775807+1".to_string(),
                },
                OwnerId(1),
                &mut channel,
            )
            .await
            .unwrap();
        assert!(channel.sent[0].content.contains("too large"));
    }

    #[tokio::test]
    async fn test_non_numeric_level_notice() {
        let store = seeded();
        let mut channel = ScriptedChannel::new().submit(&[
            ("name", "Sword"),
            ("description", "Sharp"),
            ("level", "three"),
        ]);
        dispatcher(store.clone())
            .dispatch(
                BotCommand::Create {
                    kind: EntityKind::Item,
                    image_url: None,
                },
                OwnerId(1),
                &mut channel,
            )
            .await
            .unwrap();
        assert_eq!(channel.notices, vec![LEVEL_NOT_A_NUMBER.to_string()]);
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_record_notice() {
        let mut channel = ScriptedChannel::new();
        dispatcher(seeded())
            .dispatch(
                BotCommand::View {
                    kind: EntityKind::Feat,
                    name: "Cleave".to_string(),
                },
                OwnerId(1),
                &mut channel,
            )
            .await
            .unwrap();
        assert_eq!(channel.notices, vec!["No feat named 'Cleave'".to_string()]);
    }

    #[tokio::test]
    async fn test_duplicate_name_notice() {
        let mut channel = ScriptedChannel::new()
            .submit(&[("name", "Rope"), ("description", ""), ("level", "0")])
            .select("bulk", "L");
        dispatcher(seeded())
            .dispatch(
                BotCommand::Create {
                    kind: EntityKind::Item,
                    image_url: None,
                },
                OwnerId(1),
                &mut channel,
            )
            .await
            .unwrap();
        assert_eq!(
            channel.notices,
            vec!["An item named 'Rope' already exists".to_string()]
        );
    }

    #[tokio::test]
    async fn test_give_replies_and_reports_transfer_errors() {
        let store = seeded();
        let give = |quantity| BotCommand::Give {
            character: "Valeros".to_string(),
            item: "Rope".to_string(),
            quantity,
        };

        let mut channel = ScriptedChannel::new();
        let dispatcher = dispatcher(store.clone());
        dispatcher
            .dispatch(give(2), OwnerId(1), &mut channel)
            .await
            .unwrap();
        dispatcher
            .dispatch(give(0), OwnerId(1), &mut channel)
            .await
            .unwrap();
        dispatcher
            .dispatch(give(-2), OwnerId(1), &mut channel)
            .await
            .unwrap();
        dispatcher
            .dispatch(give(-1), OwnerId(1), &mut channel)
            .await
            .unwrap();

        assert_eq!(channel.sent[0].content, "Valeros now carries Rope ×2");
        assert_eq!(channel.sent[1].content, "Valeros no longer carries Rope");
        assert_eq!(
            channel.notices,
            vec![
                "Quantity can't be zero".to_string(),
                "There is nothing to remove".to_string()
            ]
        );
        assert!(store.lines().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_give_is_rejected() {
        let store = seeded();
        let mut channel = ScriptedChannel::new();
        dispatcher(store.clone())
            .dispatch(
                BotCommand::Give {
                    character: "Valeros".to_string(),
                    item: "Rope".to_string(),
                    quantity: 5_000_000_000,
                },
                OwnerId(1),
                &mut channel,
            )
            .await
            .unwrap();

        assert!(channel.sent.is_empty());
        assert_eq!(
            channel.notices,
            vec!["Can't carry more than 4294967295 of one item".to_string()]
        );
        assert!(store.lines().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_generic() {
        let store = Arc::new(InMemoryStore::new().failing());
        let mut channel = ScriptedChannel::new().submit(&[
            ("name", "Power Attack"),
            ("description", ""),
            ("level", "1"),
        ]);
        dispatcher(store)
            .dispatch(
                BotCommand::Create {
                    kind: EntityKind::Feat,
                    image_url: None,
                },
                OwnerId(1),
                &mut channel,
            )
            .await
            .unwrap();
        assert_eq!(channel.notices, vec![GENERIC_FAILURE.to_string()]);
    }

    #[tokio::test]
    async fn test_autocomplete_searches_matching_kind() {
        let dispatcher = dispatcher(seeded());
        assert_eq!(
            dispatcher
                .autocomplete("give", Some("item"), "char_name", "val")
                .await,
            vec!["Valeros".to_string()]
        );
        assert_eq!(
            dispatcher
                .autocomplete("view", Some("item"), "name", "ro")
                .await,
            vec!["Rope".to_string()]
        );
        assert!(dispatcher
            .autocomplete("roll", None, "formula", "d")
            .await
            .is_empty());
    }
}
