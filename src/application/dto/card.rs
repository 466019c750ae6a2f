use serde::Serialize;

/// A labeled block of a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Read-only visual representation of a record
///
/// Adapters turn this into whatever the chat platform renders (a Discord
/// embed for the bot, JSON for the HTTP views).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Card {
    pub title: String,
    pub fields: Vec<CardField>,
    pub image_url: Option<String>,
}

impl Card {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(CardField {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }

    pub fn image(mut self, url: Option<&str>) -> Self {
        self.image_url = url.map(str::to_string);
        self
    }

    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}
