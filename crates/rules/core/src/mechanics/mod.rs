//! Dice, randomness and move rolls.

mod dice;
mod random;
mod roll;

pub use dice::{Dice, DiceError};
pub use random::{RandomSource, SequenceSource};
pub use roll::{ActionRoll, MAX_SCORE, MomentumBurn, ProgressRoll, RollOutcome, valid_adds};
