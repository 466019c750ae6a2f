//! Discord gateway adapter
//!
//! Registers the slash commands, turns incoming interactions into
//! application commands and hands them to the dispatcher together with a
//! [`DiscordChannel`] bound to the invocation.

mod channel;
mod commands;
mod render;

pub use channel::DiscordChannel;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serenity::all::{
    Client, Command, CommandInteraction, Context, CreateAutocompleteResponse,
    CreateInteractionResponse, EventHandler, GatewayIntents, GuildId, Interaction, Ready,
};
use tracing::{debug, error, info, instrument, warn};

use crate::application::ports::outbound::InteractionChannel;
use crate::domain::value_objects::OwnerId;
use crate::infrastructure::state::AppState;

/// Discord allows at most 25 autocomplete choices
const MAX_CHOICES: usize = 25;

pub struct Handler {
    state: Arc<AppState>,
}

impl Handler {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    #[instrument(skip_all, fields(command = %command.data.name, user = %command.user.id))]
    async fn run_command(&self, ctx: Context, command: CommandInteraction) {
        let parsed = commands::parse(&command);
        let invoker = OwnerId(command.user.id.get());
        let mut channel = DiscordChannel::new(ctx, command);

        let result = match parsed {
            Ok(parsed) => {
                debug!(?parsed, "Dispatching command");
                self.state
                    .dispatcher
                    .dispatch(parsed, invoker, &mut channel)
                    .await
            }
            Err(e) => {
                warn!(error = %e, "Unparseable command");
                channel
                    .send_ephemeral_notice(&e.to_string())
                    .await
                    .map_err(Into::into)
            }
        };
        if let Err(e) = result {
            error!(error = %e, "Interaction ended with an error");
        }
    }

    async fn autocomplete(&self, ctx: Context, command: CommandInteraction) {
        let Some((subcommand, option, fragment)) = commands::focused(&command) else {
            return;
        };
        let names = self
            .state
            .dispatcher
            .autocomplete(&command.data.name, subcommand.as_deref(), &option, &fragment)
            .await;

        let response = names
            .iter()
            .take(MAX_CHOICES)
            .fold(CreateAutocompleteResponse::new(), |response, name| {
                response.add_string_choice(name, name)
            });
        if let Err(e) = command
            .create_response(&ctx.http, CreateInteractionResponse::Autocomplete(response))
            .await
        {
            warn!(error = %e, "Failed to answer autocomplete");
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Connected to Discord as {}", ready.user.name);

        let definitions = commands::definitions();
        let registered = match self.state.config.discord_guild_id {
            Some(guild_id) => GuildId::new(guild_id)
                .set_commands(&ctx.http, definitions)
                .await
                .map(|c| c.len()),
            None => Command::set_global_commands(&ctx.http, definitions)
                .await
                .map(|c| c.len()),
        };
        match registered {
            Ok(count) => info!("Registered {} slash commands", count),
            Err(e) => error!(error = %e, "Failed to register slash commands"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => self.run_command(ctx, command).await,
            Interaction::Autocomplete(command) => self.autocomplete(ctx, command).await,
            // modal submissions and component clicks are picked up by collectors
            _ => {}
        }
    }
}

/// Build the gateway client; start it with `client.start()`
pub async fn build_client(state: Arc<AppState>) -> Result<Client> {
    let token = state.config.discord_token.clone();
    let client = Client::builder(token, GatewayIntents::non_privileged())
        .event_handler(Handler::new(state))
        .await?;
    Ok(client)
}
