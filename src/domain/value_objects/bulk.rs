//! Item bulk (weight class)

use serde::{Deserialize, Serialize};

/// Largest numeric bulk an item can carry
pub const MAX_BULK: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Bulk {
    /// Negligible
    #[default]
    Absent,
    Light,
    Units(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BulkError {
    #[error("'{0}' is not a bulk value")]
    NotANumber(String),
    #[error("bulk {0} is above the maximum of {MAX_BULK}")]
    TooHeavy(i64),
}

impl Bulk {
    /// Decode a selection value.
    ///
    /// A leading `-` means absent and a leading `L` (any case) means light.
    /// Anything else must be an integer: negative is absent, zero is light.
    pub fn parse(value: &str) -> Result<Self, BulkError> {
        let value = value.trim();
        if value.starts_with('-') {
            return Ok(Bulk::Absent);
        }
        if value.to_ascii_uppercase().starts_with('L') {
            return Ok(Bulk::Light);
        }
        let n: i64 = value
            .parse()
            .map_err(|_| BulkError::NotANumber(value.to_string()))?;
        Self::from_storage(n)
    }

    /// Stored as an integer column: -1 absent, 0 light, n units
    pub fn from_storage(n: i64) -> Result<Self, BulkError> {
        match n {
            i64::MIN..=-1 => Ok(Bulk::Absent),
            0 => Ok(Bulk::Light),
            n if n <= MAX_BULK as i64 => Ok(Bulk::Units(n as u8)),
            n => Err(BulkError::TooHeavy(n)),
        }
    }

    pub fn to_storage(self) -> i64 {
        match self {
            Bulk::Absent => -1,
            Bulk::Light => 0,
            Bulk::Units(n) => n as i64,
        }
    }

    pub fn label(self) -> String {
        match self {
            Bulk::Absent => "—".to_string(),
            Bulk::Light => "L".to_string(),
            Bulk::Units(n) => n.to_string(),
        }
    }

    /// Bulk of `quantity` copies, ten light items making one unit
    pub fn total_label(self, quantity: u32) -> String {
        match self {
            Bulk::Absent => "—".to_string(),
            Bulk::Light => format!("{} {}L", quantity / 10, quantity % 10),
            Bulk::Units(n) => (u64::from(quantity) * u64::from(n)).to_string(),
        }
    }

    /// Values offered by the bulk select menu, in display order
    pub fn choices() -> Vec<(String, String)> {
        let mut choices = vec![
            ("-".to_string(), "-".to_string()),
            ("L".to_string(), "L".to_string()),
        ];
        choices.extend((1..=MAX_BULK).map(|n| (n.to_string(), n.to_string())));
        choices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_markers() {
        assert_eq!(Bulk::parse("-").unwrap(), Bulk::Absent);
        assert_eq!(Bulk::parse("-3").unwrap(), Bulk::Absent);
        assert_eq!(Bulk::parse("L").unwrap(), Bulk::Light);
        assert_eq!(Bulk::parse("light").unwrap(), Bulk::Light);
        assert_eq!(Bulk::parse("0").unwrap(), Bulk::Light);
        assert_eq!(Bulk::parse("7").unwrap(), Bulk::Units(7));
    }

    #[test]
    fn test_parse_rejects_garbage_and_overweight() {
        assert!(matches!(Bulk::parse("heavy"), Err(BulkError::NotANumber(_))));
        assert_eq!(Bulk::parse("21"), Err(BulkError::TooHeavy(21)));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Bulk::Absent.label(), "—");
        assert_eq!(Bulk::Light.label(), "L");
        assert_eq!(Bulk::Units(1).label(), "1");
    }

    #[test]
    fn test_total_label() {
        assert_eq!(Bulk::Absent.total_label(4), "—");
        assert_eq!(Bulk::Light.total_label(13), "1 3L");
        assert_eq!(Bulk::Units(2).total_label(3), "6");
    }

    #[test]
    fn test_total_label_of_huge_stack() {
        assert_eq!(Bulk::Units(20).total_label(u32::MAX), "85899345900");
        assert_eq!(Bulk::Light.total_label(u32::MAX), "429496729 5L");
    }

    #[test]
    fn test_choices_cover_every_class() {
        let choices = Bulk::choices();
        assert_eq!(choices.len(), 22);
        for (_, value) in choices {
            assert!(Bulk::parse(&value).is_ok());
        }
    }
}
