//! Dice Service - Roll dice formulas for the `/roll` command

use rand::Rng;
use tracing::debug;

use crate::domain::value_objects::{DiceError, DiceFormula, RollResult};

#[derive(Debug, Clone, Default)]
pub struct DiceService;

impl DiceService {
    pub fn new() -> Self {
        Self
    }

    /// Roll with the thread-local generator
    pub fn roll(&self, formula: &str) -> Result<RollResult, DiceError> {
        self.roll_with(formula, &mut rand::thread_rng())
    }

    pub fn roll_with<R: Rng + ?Sized>(
        &self,
        formula: &str,
        rng: &mut R,
    ) -> Result<RollResult, DiceError> {
        let parsed = DiceFormula::parse(formula)?;
        let result = parsed.roll(rng);
        debug!(formula = %result.formula, total = result.total, "Rolled dice");
        Ok(result)
    }

    /// Reply text: the total on the first line, the breakdown below it
    pub fn describe(result: &RollResult) -> String {
        format!("{}: {}\n{}", result.formula, result.total, result.breakdown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_constant_formula() {
        let result = DiceService::new().roll("2+3").unwrap();
        assert_eq!(result.total, 5);
        assert_eq!(DiceService::describe(&result), "2+3: 5\n2 + 3");
    }

    #[test]
    fn test_roll_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let service = DiceService::new();
        for _ in 0..50 {
            let result = service.roll_with("3d6", &mut rng).unwrap();
            assert!((3..=18).contains(&result.total));
        }
    }

    #[test]
    fn test_invalid_formula_is_reported() {
        assert!(matches!(
            DiceService::new().roll("1d1"),
            Err(DiceError::InvalidSides(1))
        ));
    }
}
