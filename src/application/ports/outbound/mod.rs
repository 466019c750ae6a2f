//! Outbound ports - Interfaces that the application requires from external systems

mod interaction_port;
mod repository_port;

pub use interaction_port::{
    ButtonSpec, ButtonStyle, ChannelError, ChoiceOption, ComponentEvent, ControlRow,
    FieldStyle, FormFieldSpec, FormHandle, FormRequest, FormSubmission, InteractionChannel,
    MessageHandle, OutboundMessage,
};
pub use repository_port::{
    EntityStorePort, InventoryRepositoryPort, RepositoryError, SEARCH_LIMIT,
};
