use std::fmt;
use std::str::FromStr;

use super::random::RandomSource;
use crate::error::{ErrorSeverity, RulesError};

/// A dice expression such as `2d10`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dice {
    pub count: u32,
    pub sides: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid dice notation {notation}")]
pub struct DiceError {
    pub notation: String,
}

impl RulesError for DiceError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "DICE_INVALID_NOTATION"
    }
}

impl Dice {
    pub const fn new(count: u32, sides: u32) -> Self {
        Self { count, sides }
    }

    /// Parses `NdM` where both parts are positive integers and the largest
    /// total, `N * M`, fits in a `u32`.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let invalid = || DiceError {
            notation: notation.to_owned(),
        };
        let (count, sides) = notation.split_once('d').ok_or_else(invalid)?;
        let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !digits(count) || !digits(sides) {
            return Err(invalid());
        }
        let count = count.parse::<u32>().map_err(|_| invalid())?;
        let sides = sides.parse::<u32>().map_err(|_| invalid())?;
        if count == 0 || sides == 0 || count.checked_mul(sides).is_none() {
            return Err(invalid());
        }
        Ok(Self { count, sides })
    }

    /// Sum of `count` independent rolls.
    pub fn roll(&self, rng: &mut (impl RandomSource + ?Sized)) -> u32 {
        (0..self.count).fold(0u32, |total, _| {
            total.saturating_add(rng.roll_die(self.sides))
        })
    }

    pub const fn min_roll(&self) -> u32 {
        self.count
    }

    pub const fn max_roll(&self) -> u32 {
        self.count.saturating_mul(self.sides)
    }

    /// Mirrors a roll across the dice's range (e.g. 1 ↔ 100 on `1d100`).
    pub fn flip(&self, roll: u32) -> u32 {
        self.max_roll().saturating_add(1).saturating_sub(roll)
    }
}

impl FromStr for Dice {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}
