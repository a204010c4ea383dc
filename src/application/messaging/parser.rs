//! Dice parser - Parses `[N]dM[+|-][K]` arguments and rolls them

use once_cell::sync::Lazy;
use rand::Rng;
use regex_lite::{Captures, Regex};

use crate::application::errors::CommandError;
use crate::domain::entities::{DiceExpression, Sign};

/// Default upper bound on the number of dice in one roll
pub const DEFAULT_MAX_COUNT: u64 = 1000;

static DICE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]+)?d([0-9]+)([+-])?([0-9]+)?").expect("dice pattern is valid")
});

/// Parses dice-notation arguments into `DiceExpression`s.
///
/// The pattern is searched for anywhere in the argument, so trailing text
/// such as `2d6 for damage` still rolls.
#[derive(Debug, Clone)]
pub struct DiceParser {
    max_count: u64,
}

impl DiceParser {
    pub fn new(max_count: u64) -> Self {
        Self { max_count }
    }

    pub fn parse(&self, argument: &str) -> Result<DiceExpression, CommandError> {
        let cannot_roll = || CommandError::CannotRoll(argument.to_string());

        let caps = DICE_PATTERN.captures(argument).ok_or_else(cannot_roll)?;

        let count = number(&caps, 1).map_err(|_| cannot_roll())?;
        let sides = number(&caps, 2)
            .map_err(|_| cannot_roll())?
            .ok_or_else(cannot_roll)?;
        let modifier = number(&caps, 4).map_err(|_| cannot_roll())?;
        let sign = caps.get(3).map(|m| match m.as_str() {
            "-" => Sign::Minus,
            _ => Sign::Plus,
        });

        if sides == 0 {
            return Err(cannot_roll());
        }
        if let Some(count) = count {
            if count == 0 || count > self.max_count {
                return Err(cannot_roll());
            }
        }

        Ok(DiceExpression {
            count,
            sides,
            sign,
            modifier,
        })
    }
}

impl Default for DiceParser {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COUNT)
    }
}

fn number(caps: &Captures<'_>, group: usize) -> Result<Option<u64>, std::num::ParseIntError> {
    caps.get(group).map(|m| m.as_str().parse::<u64>()).transpose()
}

/// Roll every die in `expr` and apply the modifier.
///
/// The sign token is captured but not applied: the modifier is always added.
pub fn roll<R: Rng + ?Sized>(expr: &DiceExpression, rng: &mut R) -> u64 {
    let dice = (0..expr.count_or_default())
        .fold(0u64, |total, _| total.saturating_add(rng.random_range(1..=expr.sides)));
    dice.saturating_add(expr.modifier_or_default())
}
