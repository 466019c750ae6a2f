//! Interaction channel port - The chat surface a single command runs against
//!
//! One channel value is bound to one inbound interaction (a slash command
//! invocation) and follows it through modals and component clicks. The
//! wizard engine and the command dispatcher only talk to this trait; the
//! Discord adapter lives in the infrastructure layer.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::application::dto::Card;

/// Handle to a message the channel has sent
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageHandle(pub String);

/// Handle to a form (modal) the channel has opened
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormHandle(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSpec {
    pub id: String,
    pub label: String,
    pub style: ButtonStyle,
}

/// One row of interactive controls under a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRow {
    Select {
        id: String,
        placeholder: String,
        options: Vec<ChoiceOption>,
    },
    Buttons(Vec<ButtonSpec>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutboundMessage {
    pub content: String,
    pub card: Option<Card>,
    /// Empty means the message carries no interactive controls
    pub controls: Vec<ControlRow>,
}

impl OutboundMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn card(card: Card) -> Self {
        Self {
            card: Some(card),
            ..Self::default()
        }
    }

    pub fn with_controls(mut self, controls: Vec<ControlRow>) -> Self {
        self.controls = controls;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStyle {
    /// Single line
    Text,
    Multiline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFieldSpec {
    pub id: String,
    pub label: String,
    pub style: FieldStyle,
    pub max_length: Option<u16>,
    pub required: bool,
    pub prefill: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRequest {
    pub title: String,
    pub fields: Vec<FormFieldSpec>,
}

/// Values the user typed into a form, keyed by field id
pub type FormSubmission = HashMap<String, String>;

/// A click on a button or a choice in a select menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentEvent {
    pub control_id: String,
    /// Chosen value for selects, `None` for buttons
    pub value: Option<String>,
}

impl ComponentEvent {
    pub fn select(control_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            control_id: control_id.into(),
            value: Some(value.into()),
        }
    }

    pub fn button(control_id: impl Into<String>) -> Self {
        Self {
            control_id: control_id.into(),
            value: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("The interaction stream ended before the user answered")]
    Closed,
    #[error("{0} is not possible in the current interaction state")]
    InvalidState(&'static str),
    #[error("Chat platform error: {0}")]
    Platform(String),
}

/// Outbound and inbound actions for one user interaction
#[async_trait]
pub trait InteractionChannel: Send {
    /// Send a new message and return a handle to it
    async fn send(&mut self, message: OutboundMessage) -> Result<MessageHandle, ChannelError>;

    /// Replace the content of a message in place
    async fn update(
        &mut self,
        handle: &MessageHandle,
        message: OutboundMessage,
    ) -> Result<(), ChannelError>;

    async fn open_form(&mut self, form: FormRequest) -> Result<FormHandle, ChannelError>;

    /// Suspend until the user submits the form
    async fn await_submission(&mut self, form: &FormHandle)
        -> Result<FormSubmission, ChannelError>;

    /// Suspend until the user clicks or selects something on the message
    async fn await_component_event(
        &mut self,
        handle: &MessageHandle,
    ) -> Result<ComponentEvent, ChannelError>;

    /// Message visible only to the invoking user
    async fn send_ephemeral_notice(&mut self, text: &str) -> Result<(), ChannelError>;
}
