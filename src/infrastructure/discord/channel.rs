//! Discord implementation of the interaction channel
//!
//! Every Discord interaction must be answered exactly once. The channel
//! remembers the most recent unanswered interaction (the slash command, a
//! modal submission or a component click) and answers it with whatever the
//! application does next: a modal, a new message, an in-place update or a
//! notice. Anything after that goes out as a follow-up or a message edit.

use async_trait::async_trait;
use serenity::all::{
    ActionRowComponent, ChannelId, CommandInteraction, ComponentInteraction,
    ComponentInteractionCollector, ComponentInteractionDataKind, Context,
    CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, MessageId, ModalInteraction, ModalInteractionCollector,
    UserId,
};
use tracing::{debug, warn};

use super::render;
use crate::application::ports::outbound::{
    ChannelError, ComponentEvent, FormHandle, FormRequest, FormSubmission, InteractionChannel,
    MessageHandle, OutboundMessage,
};

/// The interaction still waiting for its initial response
enum Pending {
    Command,
    Modal(Box<ModalInteraction>),
    Component(Box<ComponentInteraction>),
    Answered,
}

pub struct DiscordChannel {
    ctx: Context,
    command: CommandInteraction,
    pending: Pending,
    forms_opened: u32,
}

impl DiscordChannel {
    pub fn new(ctx: Context, command: CommandInteraction) -> Self {
        Self {
            ctx,
            command,
            pending: Pending::Command,
            forms_opened: 0,
        }
    }

    fn user_id(&self) -> UserId {
        self.command.user.id
    }

    fn channel_id(&self) -> ChannelId {
        self.command.channel_id
    }

    /// Answer the pending interaction with a message, or follow up on the
    /// command when everything has been answered already
    async fn reply(
        &mut self,
        message: CreateInteractionResponseMessage,
        followup: CreateInteractionResponseFollowup,
    ) -> Result<Option<MessageId>, ChannelError> {
        let http = &self.ctx.http;
        let response = CreateInteractionResponse::Message(message);
        let sent = match std::mem::replace(&mut self.pending, Pending::Answered) {
            Pending::Command => {
                self.command
                    .create_response(http, response)
                    .await
                    .map_err(platform)?;
                self.command.get_response(http).await.map(|m| m.id)
            }
            Pending::Modal(modal) => {
                modal.create_response(http, response).await.map_err(platform)?;
                modal.get_response(http).await.map(|m| m.id)
            }
            Pending::Component(component) => {
                component
                    .create_response(http, response)
                    .await
                    .map_err(platform)?;
                component.get_response(http).await.map(|m| m.id)
            }
            Pending::Answered => {
                let message = self
                    .command
                    .create_followup(http, followup)
                    .await
                    .map_err(platform)?;
                return Ok(Some(message.id));
            }
        };
        match sent {
            Ok(id) => Ok(Some(id)),
            // ephemeral responses can't always be fetched back
            Err(e) => {
                debug!(error = %e, "Could not fetch the response message");
                Ok(None)
            }
        }
    }

    /// Acknowledge a click the application did not answer, so Discord does
    /// not report the interaction as failed
    async fn acknowledge_stale(&mut self) -> Result<(), ChannelError> {
        if let Pending::Component(component) =
            std::mem::replace(&mut self.pending, Pending::Answered)
        {
            component
                .create_response(&self.ctx.http, CreateInteractionResponse::Acknowledge)
                .await
                .map_err(platform)?;
        }
        Ok(())
    }
}

fn platform(e: serenity::Error) -> ChannelError {
    ChannelError::Platform(e.to_string())
}

fn parse_message_id(handle: &MessageHandle) -> Result<MessageId, ChannelError> {
    handle
        .0
        .parse::<u64>()
        .ok()
        .filter(|&id| id != 0)
        .map(MessageId::new)
        .ok_or(ChannelError::InvalidState("Addressing an unknown message"))
}

fn submission_values(modal: &ModalInteraction) -> FormSubmission {
    modal
        .data
        .components
        .iter()
        .flat_map(|row| row.components.iter())
        .filter_map(|component| match component {
            ActionRowComponent::InputText(input) => Some((
                input.custom_id.clone(),
                input.value.clone().unwrap_or_default(),
            )),
            _ => None,
        })
        .collect()
}

fn component_event(component: &ComponentInteraction) -> ComponentEvent {
    let value = match &component.data.kind {
        ComponentInteractionDataKind::StringSelect { values } => values.first().cloned(),
        _ => None,
    };
    ComponentEvent {
        control_id: component.data.custom_id.clone(),
        value,
    }
}

#[async_trait]
impl InteractionChannel for DiscordChannel {
    async fn send(&mut self, message: OutboundMessage) -> Result<MessageHandle, ChannelError> {
        let id = self
            .reply(
                render::response_message(&message),
                render::followup_message(&message),
            )
            .await?
            .ok_or(ChannelError::InvalidState("Tracking a message Discord did not return"))?;
        Ok(MessageHandle(id.get().to_string()))
    }

    async fn update(
        &mut self,
        handle: &MessageHandle,
        message: OutboundMessage,
    ) -> Result<(), ChannelError> {
        let message_id = parse_message_id(handle)?;

        let on_same_message = matches!(
            &self.pending,
            Pending::Component(component) if component.message.id == message_id
        );
        if on_same_message {
            if let Pending::Component(component) =
                std::mem::replace(&mut self.pending, Pending::Answered)
            {
                return component
                    .create_response(
                        &self.ctx.http,
                        CreateInteractionResponse::UpdateMessage(render::response_message(
                            &message,
                        )),
                    )
                    .await
                    .map_err(platform);
            }
        }

        self.acknowledge_stale().await?;
        self.channel_id()
            .edit_message(&self.ctx.http, message_id, render::edit_message(&message))
            .await
            .map_err(platform)?;
        Ok(())
    }

    async fn open_form(&mut self, form: FormRequest) -> Result<FormHandle, ChannelError> {
        self.forms_opened += 1;
        let custom_id = format!("form-{}-{}", self.command.id, self.forms_opened);
        let response = CreateInteractionResponse::Modal(render::modal(&custom_id, &form));
        let http = &self.ctx.http;

        match std::mem::replace(&mut self.pending, Pending::Answered) {
            Pending::Command => self
                .command
                .create_response(http, response)
                .await
                .map_err(platform)?,
            Pending::Component(component) => component
                .create_response(http, response)
                .await
                .map_err(platform)?,
            Pending::Modal(_) | Pending::Answered => {
                return Err(ChannelError::InvalidState("Opening a form"))
            }
        }
        Ok(FormHandle(custom_id))
    }

    async fn await_submission(
        &mut self,
        form: &FormHandle,
    ) -> Result<FormSubmission, ChannelError> {
        let custom_id = form.0.clone();
        let modal = ModalInteractionCollector::new(&self.ctx.shard)
            .author_id(self.user_id())
            .filter(move |modal| modal.data.custom_id == custom_id)
            .next()
            .await
            .ok_or(ChannelError::Closed)?;

        let values = submission_values(&modal);
        self.pending = Pending::Modal(Box::new(modal));
        Ok(values)
    }

    async fn await_component_event(
        &mut self,
        handle: &MessageHandle,
    ) -> Result<ComponentEvent, ChannelError> {
        self.acknowledge_stale().await?;
        let message_id = parse_message_id(handle)?;

        let component = ComponentInteractionCollector::new(&self.ctx.shard)
            .author_id(self.user_id())
            .message_id(message_id)
            .next()
            .await
            .ok_or(ChannelError::Closed)?;

        let event = component_event(&component);
        self.pending = Pending::Component(Box::new(component));
        Ok(event)
    }

    async fn send_ephemeral_notice(&mut self, text: &str) -> Result<(), ChannelError> {
        let sent = self
            .reply(
                CreateInteractionResponseMessage::new()
                    .content(text)
                    .ephemeral(true),
                CreateInteractionResponseFollowup::new()
                    .content(text)
                    .ephemeral(true),
            )
            .await;
        if let Err(e) = &sent {
            warn!(error = %e, "Failed to send notice");
        }
        sent.map(|_| ())
    }
}
