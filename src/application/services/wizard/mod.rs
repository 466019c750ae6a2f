//! Multi-step record editor
//!
//! A wizard opens with a form and continues through zero or more screens of
//! select menus attached to the record's card. [`WizardPlan`] describes the
//! steps for one record kind and [`WizardEngine`] runs them against an
//! [`InteractionChannel`](crate::application::ports::outbound::InteractionChannel).

mod engine;
mod fields;
mod plans;

pub use engine::{InteractionEvent, WizardEngine, WizardError, WizardOptions};
pub use fields::{FieldError, FieldId, FieldSetter, ABILITY_SCORE_RANGE};
pub use plans::{
    AdvanceRule, EditorMode, FormField, FormStep, SelectControl, SelectStep, WizardPlan,
    ADVANCE_CONTROL_ID, CANCEL_CONTROL_ID, CLOSE_CONTROL_ID,
};
