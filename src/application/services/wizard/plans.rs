//! Wizard plans - Which screens each record kind walks through

use crate::application::ports::outbound::{
    ButtonSpec, ButtonStyle, ChoiceOption, ControlRow, FieldStyle, FormFieldSpec, FormRequest,
};
use crate::domain::entities::{
    Entity, EntityKind, DESCRIPTION_MAX_LENGTH, EFFECT_MAX_LENGTH, NAME_MAX_LENGTH,
};
use crate::domain::value_objects::{Ability, Bulk};

use super::fields::{FieldId, FieldSetter};

/// Button that completes a screen
pub const ADVANCE_CONTROL_ID: &str = "next";
/// Button that abandons the flow
pub const CANCEL_CONTROL_ID: &str = "cancel";
/// Button that closes a read-only card
pub const CLOSE_CONTROL_ID: &str = "close";

/// Scores offered for each ability
const ABILITY_SCORE_CHOICES: [u32; 10] = [6, 8, 10, 12, 14, 16, 18, 20, 21, 22];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit,
}

/// When a select screen is complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceRule {
    /// As soon as every control has been answered once
    AllSelected,
    /// Only when the user presses the advance button
    OnSignal,
}

#[derive(Clone)]
pub struct FormField {
    pub field: FieldId,
    pub label: String,
    pub style: FieldStyle,
    pub max_length: Option<u16>,
    pub required: bool,
    pub(super) setter: FieldSetter,
}

impl FormField {
    pub fn new(field: FieldId, label: impl Into<String>, style: FieldStyle) -> Self {
        Self {
            field,
            label: label.into(),
            style,
            max_length: None,
            required: true,
            setter: field.setter(),
        }
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(u16::try_from(max_length).unwrap_or(u16::MAX));
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn is_numeric(&self) -> bool {
        self.field.is_numeric()
    }
}

impl std::fmt::Debug for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormField")
            .field("field", &self.field)
            .field("label", &self.label)
            .field("style", &self.style)
            .field("max_length", &self.max_length)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// The modal that opens every wizard
#[derive(Debug, Clone)]
pub struct FormStep {
    pub title: String,
    pub fields: Vec<FormField>,
    /// Fill the fields with the record's current values
    pub prefill: bool,
}

impl FormStep {
    pub fn request(&self, snapshot: &Entity) -> FormRequest {
        FormRequest {
            title: self.title.clone(),
            fields: self
                .fields
                .iter()
                .map(|f| FormFieldSpec {
                    id: f.field.control_id().to_string(),
                    label: f.label.clone(),
                    style: f.style,
                    max_length: f.max_length,
                    required: f.required,
                    prefill: if self.prefill {
                        f.field.current_value(snapshot)
                    } else {
                        None
                    },
                })
                .collect(),
        }
    }
}

#[derive(Clone)]
pub struct SelectControl {
    pub field: FieldId,
    pub placeholder: String,
    pub options: Vec<ChoiceOption>,
    pub(super) setter: FieldSetter,
}

impl SelectControl {
    pub fn new(field: FieldId, placeholder: impl Into<String>, options: Vec<ChoiceOption>) -> Self {
        Self {
            field,
            placeholder: placeholder.into(),
            options,
            setter: field.setter(),
        }
    }
}

impl std::fmt::Debug for SelectControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectControl")
            .field("field", &self.field)
            .field("placeholder", &self.placeholder)
            .field("options", &self.options.len())
            .finish_non_exhaustive()
    }
}

/// A screen of select menus attached to the record's card
#[derive(Debug, Clone)]
pub struct SelectStep {
    pub controls: Vec<SelectControl>,
    pub advance: AdvanceRule,
}

impl SelectStep {
    pub fn control(&self, field: FieldId) -> Option<&SelectControl> {
        self.controls.iter().find(|c| c.field == field)
    }

    pub fn control_rows(&self) -> Vec<ControlRow> {
        let mut rows: Vec<ControlRow> = self
            .controls
            .iter()
            .map(|c| ControlRow::Select {
                id: c.field.control_id().to_string(),
                placeholder: c.placeholder.clone(),
                options: c.options.clone(),
            })
            .collect();
        if self.advance == AdvanceRule::OnSignal {
            rows.push(ControlRow::Buttons(vec![ButtonSpec {
                id: ADVANCE_CONTROL_ID.to_string(),
                label: "Next".to_string(),
                style: ButtonStyle::Success,
            }]));
        }
        rows
    }
}

/// The full step sequence of one wizard: a form, then zero or more screens
#[derive(Debug, Clone)]
pub struct WizardPlan {
    pub form: FormStep,
    pub screens: Vec<SelectStep>,
}

impl WizardPlan {
    pub fn for_kind(kind: EntityKind, mode: EditorMode) -> Self {
        let verb = match mode {
            EditorMode::Create => "Create",
            EditorMode::Edit => "Edit",
        };

        let mut fields = vec![
            FormField::new(FieldId::Name, "Name", FieldStyle::Text).max_length(NAME_MAX_LENGTH),
            FormField::new(FieldId::Description, "Description", FieldStyle::Multiline)
                .max_length(DESCRIPTION_MAX_LENGTH),
            FormField::new(FieldId::Level, "Level", FieldStyle::Text).max_length(3),
        ];
        if kind.has_effect() {
            fields.push(
                FormField::new(FieldId::Effect, "Effect", FieldStyle::Text)
                    .max_length(EFFECT_MAX_LENGTH)
                    .optional(),
            );
        }

        let screens = match kind {
            EntityKind::Character => vec![
                ability_screen([Ability::Strength, Ability::Dexterity, Ability::Constitution]),
                ability_screen([Ability::Intelligence, Ability::Wisdom, Ability::Charisma]),
            ],
            EntityKind::Item => vec![SelectStep {
                controls: vec![SelectControl::new(
                    FieldId::Bulk,
                    "Bulk",
                    Bulk::choices()
                        .into_iter()
                        .map(|(label, value)| ChoiceOption { label, value })
                        .collect(),
                )],
                advance: AdvanceRule::AllSelected,
            }],
            EntityKind::Feat => Vec::new(),
        };

        Self {
            form: FormStep {
                title: format!("{} {}", verb, kind.key()),
                fields,
                prefill: mode == EditorMode::Edit,
            },
            screens,
        }
    }
}

fn ability_screen(abilities: [Ability; 3]) -> SelectStep {
    let options: Vec<ChoiceOption> = ABILITY_SCORE_CHOICES
        .iter()
        .map(|score| ChoiceOption {
            label: score.to_string(),
            value: score.to_string(),
        })
        .collect();
    SelectStep {
        controls: abilities
            .into_iter()
            .map(|ability| {
                SelectControl::new(FieldId::Ability(ability), ability.display_name(), options.clone())
            })
            .collect(),
        advance: AdvanceRule::OnSignal,
    }
}
