//! Dice formulas such as `4d6kh3`, `d20+3` or `2d8 - 1`

use rand::Rng;

pub const MAX_DICE: u32 = 100;
pub const MAX_SIDES: u32 = 1000;
pub const MAX_CONSTANT: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    #[error("The formula is empty")]
    Empty,
    #[error("'{0}' is missing a term between signs")]
    DanglingSign(String),
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
    #[error("Can't roll {0} dice, the limit is {MAX_DICE}")]
    TooManyDice(u32),
    #[error("A die needs between 2 and {MAX_SIDES} sides, got {0}")]
    InvalidSides(u32),
    #[error("Can't keep {keep} of {count} dice")]
    InvalidKeep { keep: u32, count: u32 },
    #[error("'{0}' is too large, constants go up to {MAX_CONSTANT}")]
    ConstantTooLarge(String),
    #[error("Unknown modifier '{0}', expected kh or kl")]
    UnknownModifier(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keep {
    Highest(u32),
    Lowest(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Term {
    Constant(i64),
    Dice {
        count: u32,
        sides: u32,
        keep: Option<Keep>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SignedTerm {
    negative: bool,
    source: String,
    term: Term,
}

/// A parsed formula, ready to be rolled any number of times
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceFormula {
    source: String,
    terms: Vec<SignedTerm>,
}

/// Outcome of one term of a roll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRoll {
    pub negative: bool,
    pub source: String,
    /// Every die rolled, in roll order. Empty for constants.
    pub rolls: Vec<u32>,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollResult {
    pub formula: String,
    pub total: i64,
    pub terms: Vec<TermRoll>,
}

impl DiceFormula {
    pub fn parse(input: &str) -> Result<Self, DiceError> {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(DiceError::Empty);
        }

        let mut terms = Vec::new();
        let mut rest = compact.as_str();
        let mut negative = false;
        if let Some(stripped) = rest.strip_prefix('-') {
            negative = true;
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('+') {
            rest = stripped;
        }

        loop {
            let end = rest.find(['+', '-']).unwrap_or(rest.len());
            let chunk = &rest[..end];
            if chunk.is_empty() {
                return Err(DiceError::DanglingSign(compact.clone()));
            }
            terms.push(SignedTerm {
                negative,
                source: chunk.to_string(),
                term: parse_term(chunk)?,
            });

            if end == rest.len() {
                break;
            }
            negative = rest[end..].starts_with('-');
            rest = &rest[end + 1..];
        }

        Ok(Self {
            source: compact,
            terms,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> RollResult {
        let terms: Vec<TermRoll> = self
            .terms
            .iter()
            .map(|signed| {
                let (rolls, value) = match signed.term {
                    Term::Constant(n) => (Vec::new(), n),
                    Term::Dice { count, sides, keep } => {
                        let rolls: Vec<u32> =
                            (0..count).map(|_| rng.gen_range(1..=sides)).collect();
                        let value = kept_sum(&rolls, keep);
                        (rolls, value)
                    }
                };
                TermRoll {
                    negative: signed.negative,
                    source: signed.source.clone(),
                    rolls,
                    value: if signed.negative { -value } else { value },
                }
            })
            .collect();

        RollResult {
            formula: self.source.clone(),
            total: terms.iter().map(|t| t.value).sum(),
            terms,
        }
    }
}

impl RollResult {
    /// Per-term breakdown, e.g. `4d6kh3 [3, 5, 2, 6] + 2`
    pub fn breakdown(&self) -> String {
        let mut out = String::new();
        for (i, term) in self.terms.iter().enumerate() {
            match (i, term.negative) {
                (0, true) => out.push('-'),
                (0, false) => {}
                (_, true) => out.push_str(" - "),
                (_, false) => out.push_str(" + "),
            }
            out.push_str(&term.source);
            if !term.rolls.is_empty() {
                let rolls: Vec<String> = term.rolls.iter().map(u32::to_string).collect();
                out.push_str(&format!(" [{}]", rolls.join(", ")));
            }
        }
        out
    }
}

fn kept_sum(rolls: &[u32], keep: Option<Keep>) -> i64 {
    let mut sorted = rolls.to_vec();
    sorted.sort_unstable();
    let kept: &[u32] = match keep {
        None => &sorted,
        Some(Keep::Lowest(k)) => &sorted[..k as usize],
        Some(Keep::Highest(k)) => &sorted[sorted.len() - k as usize..],
    };
    kept.iter().map(|&r| r as i64).sum()
}

fn parse_number(s: &str) -> Result<u32, DiceError> {
    s.parse()
        .map_err(|_| DiceError::InvalidNumber(s.to_string()))
}

fn parse_constant(chunk: &str) -> Result<Term, DiceError> {
    match chunk.parse::<u64>() {
        Ok(n) if n <= MAX_CONSTANT => Ok(Term::Constant(n as i64)),
        Ok(_) => Err(DiceError::ConstantTooLarge(chunk.to_string())),
        Err(_) if !chunk.is_empty() && chunk.bytes().all(|b| b.is_ascii_digit()) => {
            Err(DiceError::ConstantTooLarge(chunk.to_string()))
        }
        Err(_) => Err(DiceError::InvalidNumber(chunk.to_string())),
    }
}

fn parse_term(chunk: &str) -> Result<Term, DiceError> {
    let lower = chunk.to_ascii_lowercase();
    let Some((count, rest)) = lower.split_once('d') else {
        return parse_constant(chunk);
    };

    let count = if count.is_empty() { 1 } else { parse_number(count)? };
    let (sides, keep) = match rest.find('k') {
        Some(pos) => (&rest[..pos], Some(&rest[pos..])),
        None => (rest, None),
    };
    let sides = parse_number(sides)?;

    if count == 0 || count > MAX_DICE {
        return Err(DiceError::TooManyDice(count));
    }
    if !(2..=MAX_SIDES).contains(&sides) {
        return Err(DiceError::InvalidSides(sides));
    }

    let keep = match keep {
        None => None,
        Some(modifier) => {
            let keep = if let Some(n) = modifier.strip_prefix("kh") {
                Keep::Highest(parse_number(n)?)
            } else if let Some(n) = modifier.strip_prefix("kl") {
                Keep::Lowest(parse_number(n)?)
            } else {
                return Err(DiceError::UnknownModifier(modifier.to_string()));
            };
            let (Keep::Highest(k) | Keep::Lowest(k)) = keep;
            if k == 0 || k > count {
                return Err(DiceError::InvalidKeep { keep: k, count });
            }
            Some(keep)
        }
    };

    Ok(Term::Dice { count, sides, keep })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_common_formulas() {
        assert!(DiceFormula::parse("4d6").is_ok());
        assert!(DiceFormula::parse("d20+3").is_ok());
        assert!(DiceFormula::parse("2d8 - 1").is_ok());
        assert!(DiceFormula::parse("4d6kh3").is_ok());
        assert!(DiceFormula::parse("-1 + D20").is_ok());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(DiceFormula::parse("   "), Err(DiceError::Empty));
        assert!(matches!(
            DiceFormula::parse("1++2"),
            Err(DiceError::DanglingSign(_))
        ));
        assert!(matches!(
            DiceFormula::parse("d20+"),
            Err(DiceError::DanglingSign(_))
        ));
        assert_eq!(DiceFormula::parse("0d6"), Err(DiceError::TooManyDice(0)));
        assert_eq!(DiceFormula::parse("d1"), Err(DiceError::InvalidSides(1)));
        assert_eq!(
            DiceFormula::parse("2d6kh3"),
            Err(DiceError::InvalidKeep { keep: 3, count: 2 })
        );
        assert!(matches!(
            DiceFormula::parse("2d6x1"),
            Err(DiceError::InvalidNumber(_))
        ));
        assert!(matches!(
            DiceFormula::parse("2d6kx1"),
            Err(DiceError::UnknownModifier(_))
        ));
    }

    #[test]
    fn test_oversized_constants_are_rejected() {
        assert_eq!(
            DiceFormula::parse("9223372036854775807+1"),
            Err(DiceError::ConstantTooLarge("9223372036854775807".to_string()))
        );
        assert_eq!(
            DiceFormula::parse("d20+99999999999999999999"),
            Err(DiceError::ConstantTooLarge("99999999999999999999".to_string()))
        );
        assert!(DiceFormula::parse("d20+1000000").is_ok());
        assert!(matches!(
            DiceFormula::parse("d20+1000001"),
            Err(DiceError::ConstantTooLarge(_))
        ));
    }

    #[test]
    fn test_constant_only() {
        let formula = DiceFormula::parse("5 - 2").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(formula.roll(&mut rng).total, 3);
    }

    #[test]
    fn test_rolls_stay_in_range() {
        let formula = DiceFormula::parse("10d6+2").unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let result = formula.roll(&mut rng);
            assert!((12..=62).contains(&result.total));
            assert_eq!(result.terms[0].rolls.len(), 10);
        }
    }

    #[test]
    fn test_keep_highest_and_lowest() {
        let mut rng = StdRng::seed_from_u64(7);
        let high = DiceFormula::parse("3d20kh1").unwrap().roll(&mut rng);
        let max = *high.terms[0].rolls.iter().max().unwrap() as i64;
        assert_eq!(high.total, max);

        let low = DiceFormula::parse("3d20kl1").unwrap().roll(&mut rng);
        let min = *low.terms[0].rolls.iter().min().unwrap() as i64;
        assert_eq!(low.total, min);
    }

    #[test]
    fn test_breakdown_lists_rolls() {
        let mut rng = StdRng::seed_from_u64(3);
        let result = DiceFormula::parse("2d4-1").unwrap().roll(&mut rng);
        let breakdown = result.breakdown();
        assert!(breakdown.starts_with("2d4 ["));
        assert!(breakdown.ends_with(" - 1"));
    }
}
