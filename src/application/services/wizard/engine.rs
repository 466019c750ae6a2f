//! Wizard engine - Drives one record through its form and select screens
//!
//! The dialogue is a single evolving message: the first select screen is sent
//! as a reply to the form, every later change edits that same message, and
//! the final card replaces it with all controls stripped. The record is only
//! handed to the store after the last screen completes.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::application::dto::Card;
use crate::application::ports::outbound::{
    ButtonSpec, ButtonStyle, ChannelError, ComponentEvent, ControlRow, EntityStorePort,
    FormSubmission, InteractionChannel, MessageHandle, OutboundMessage, RepositoryError,
};
use crate::application::services::card_builder;
use crate::domain::entities::{Entity, ValidationError};

use super::fields::{FieldError, FieldId};
use super::plans::{
    AdvanceRule, FormStep, SelectStep, WizardPlan, ADVANCE_CONTROL_ID, CANCEL_CONTROL_ID,
    CLOSE_CONTROL_ID,
};

/// How long the engine waits for the user
#[derive(Debug, Clone, Default)]
pub struct WizardOptions {
    /// `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Cancelling the token aborts any pending wait
    pub cancel: Option<CancellationToken>,
}

impl WizardOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("{field} must be a number, got '{value}'")]
    InvalidNumericField { field: FieldId, value: String },
    #[error("Invalid value for {field}: {source}")]
    InvalidChoice {
        field: FieldId,
        #[source]
        source: FieldError,
    },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Timed out waiting for the user")]
    TimedOut,
    #[error("The wizard was cancelled")]
    Cancelled,
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// A user action classified against the screen currently shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionEvent {
    TextSubmission(FormSubmission),
    ChoiceSelection { field: FieldId, value: String },
    AdvanceSignal,
    CancelSignal,
}

impl InteractionEvent {
    /// `None` when the event names a control the screen does not have
    pub fn classify(event: &ComponentEvent, screen: Option<&SelectStep>) -> Option<Self> {
        match event.control_id.as_str() {
            ADVANCE_CONTROL_ID => Some(InteractionEvent::AdvanceSignal),
            CANCEL_CONTROL_ID | CLOSE_CONTROL_ID => Some(InteractionEvent::CancelSignal),
            id => {
                let field = FieldId::from_control_id(id)?;
                screen?.control(field)?;
                Some(InteractionEvent::ChoiceSelection {
                    field,
                    value: event.value.clone().unwrap_or_default(),
                })
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WizardEngine {
    options: WizardOptions,
}

impl WizardEngine {
    pub fn new(options: WizardOptions) -> Self {
        Self { options }
    }

    /// Run the whole dialogue for `snapshot` and persist the result
    #[instrument(skip_all, fields(kind = %snapshot.kind(), screens = plan.screens.len()))]
    pub async fn run_wizard<C>(
        &self,
        mut snapshot: Entity,
        plan: &WizardPlan,
        channel: &mut C,
        store: &dyn EntityStorePort,
    ) -> Result<Entity, WizardError>
    where
        C: InteractionChannel + ?Sized,
    {
        let form = channel.open_form(plan.form.request(&snapshot)).await?;
        let submission = self.wait(channel.await_submission(&form)).await?;
        apply_submission(&plan.form, &mut snapshot, &submission)?;
        snapshot.validate()?;
        debug!(name = %snapshot.name(), "Form submitted");

        let mut message: Option<MessageHandle> = None;
        for screen in &plan.screens {
            let shown = screen_message(&snapshot, screen);
            let handle = match message.take() {
                Some(handle) => {
                    channel.update(&handle, shown).await?;
                    handle
                }
                None => channel.send(shown).await?,
            };
            if let Err(e) = self.run_screen(&mut snapshot, screen, channel, &handle).await {
                if matches!(e, WizardError::TimedOut | WizardError::Cancelled) {
                    let closed = OutboundMessage::card(card_builder::render(&snapshot));
                    if let Err(update_err) = channel.update(&handle, closed).await {
                        warn!(error = %update_err, "Could not close abandoned editor");
                    }
                }
                return Err(e);
            }
            message = Some(handle);
        }

        let done = OutboundMessage::card(card_builder::render(&snapshot));
        match &message {
            Some(handle) => channel.update(handle, done).await?,
            None => {
                channel.send(done).await?;
            }
        }

        snapshot.validate()?;
        store.save(&snapshot).await?;
        info!(
            kind = %snapshot.kind(),
            id = %snapshot.id_string(),
            "Saved {}",
            snapshot.name()
        );
        Ok(snapshot)
    }

    /// Show a read-only card with a close button until the user closes it.
    ///
    /// A timeout or cancellation strips the button the same way a click does.
    pub async fn present<C>(&self, card: Card, channel: &mut C) -> Result<(), WizardError>
    where
        C: InteractionChannel + ?Sized,
    {
        let close = ControlRow::Buttons(vec![ButtonSpec {
            id: CLOSE_CONTROL_ID.to_string(),
            label: "Close".to_string(),
            style: ButtonStyle::Secondary,
        }]);
        let handle = channel
            .send(OutboundMessage::card(card.clone()).with_controls(vec![close]))
            .await?;

        loop {
            match self.wait(channel.await_component_event(&handle)).await {
                Ok(event) => match InteractionEvent::classify(&event, None) {
                    Some(InteractionEvent::CancelSignal) => break,
                    _ => debug!(control = %event.control_id, "Ignoring event on read-only card"),
                },
                Err(WizardError::TimedOut | WizardError::Cancelled) => break,
                Err(e) => return Err(e),
            }
        }

        channel.update(&handle, OutboundMessage::card(card)).await?;
        Ok(())
    }

    async fn run_screen<C>(
        &self,
        snapshot: &mut Entity,
        screen: &SelectStep,
        channel: &mut C,
        handle: &MessageHandle,
    ) -> Result<(), WizardError>
    where
        C: InteractionChannel + ?Sized,
    {
        let mut answered: HashSet<FieldId> = HashSet::new();
        loop {
            let event = self.wait(channel.await_component_event(handle)).await?;
            match InteractionEvent::classify(&event, Some(screen)) {
                Some(InteractionEvent::AdvanceSignal) => return Ok(()),
                Some(InteractionEvent::CancelSignal) => return Err(WizardError::Cancelled),
                Some(InteractionEvent::ChoiceSelection { field, value }) => {
                    let Some(control) = screen.control(field) else {
                        continue;
                    };
                    (control.setter)(snapshot, &value)
                        .map_err(|source| WizardError::InvalidChoice { field, source })?;
                    answered.insert(field);

                    let complete = screen.advance == AdvanceRule::AllSelected
                        && screen.controls.iter().all(|c| answered.contains(&c.field));
                    if complete {
                        return Ok(());
                    }
                    channel
                        .update(handle, screen_message(snapshot, screen))
                        .await?;
                }
                Some(InteractionEvent::TextSubmission(_)) | None => {
                    warn!(control = %event.control_id, "Ignoring event for unknown control");
                }
            }
        }
    }

    /// Await a channel future under the configured timeout and cancel token
    async fn wait<T, F>(&self, future: F) -> Result<T, WizardError>
    where
        F: Future<Output = Result<T, ChannelError>>,
    {
        let answered = async {
            match self.options.timeout {
                Some(limit) => match tokio::time::timeout(limit, future).await {
                    Ok(result) => result.map_err(WizardError::from),
                    Err(_) => Err(WizardError::TimedOut),
                },
                None => future.await.map_err(WizardError::from),
            }
        };
        let cancelled = async {
            match &self.options.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            result = answered => result,
            _ = cancelled => Err(WizardError::Cancelled),
        }
    }
}

fn screen_message(snapshot: &Entity, screen: &SelectStep) -> OutboundMessage {
    OutboundMessage::card(card_builder::render(snapshot)).with_controls(screen.control_rows())
}

/// Copy submitted text into the record. Missing fields count as empty.
fn apply_submission(
    form: &FormStep,
    snapshot: &mut Entity,
    submission: &FormSubmission,
) -> Result<(), WizardError> {
    for field in &form.fields {
        let value = submission
            .get(field.field.control_id())
            .map(String::as_str)
            .unwrap_or_default();
        (field.setter)(snapshot, value).map_err(|source| match source {
            FieldError::NotANumber { value } if field.is_numeric() => {
                WizardError::InvalidNumericField {
                    field: field.field,
                    value,
                }
            }
            source => WizardError::InvalidChoice {
                field: field.field,
                source,
            },
        })?;
    }
    Ok(())
}
