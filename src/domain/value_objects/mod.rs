//! Value objects - Immutable objects defined by their attributes

mod ability;
mod bulk;
mod dice;
mod ids;

pub use ability::{ability_modifier, Ability, AbilityScores, DEFAULT_ABILITY_SCORE};
pub use bulk::{Bulk, BulkError, MAX_BULK};
pub use dice::{DiceError, DiceFormula, RollResult};
pub use ids::*;
