//! Action and progress rolls.
//!
//! An action roll is one d6 plus a stat and adds, capped at 10, compared
//! against two d10 challenge dice. A progress roll uses the filled boxes of
//! a track as its score. Beating both dice is a strong hit, beating one is a
//! weak hit and anything else is a miss; ties go to the challenge die.

use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use crate::track::TICKS_PER_BOX;

/// Highest score any roll can produce.
pub const MAX_SCORE: i64 = 10;

const ACTION_DIE: u32 = 6;
const CHALLENGE_DIE: u32 = 10;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RollOutcome {
    Miss,
    WeakHit,
    StrongHit,
}

impl RollOutcome {
    /// Compares `score` against both challenge dice.
    pub fn against(score: i64, challenge1: u32, challenge2: u32) -> Self {
        let beats = [challenge1, challenge2]
            .into_iter()
            .filter(|&c| score > i64::from(c))
            .count();
        match beats {
            2 => Self::StrongHit,
            1 => Self::WeakHit,
            _ => Self::Miss,
        }
    }
}

/// A rolled action move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRoll {
    pub action: u32,
    pub stat: i64,
    pub adds: i64,
    pub challenge1: u32,
    pub challenge2: u32,
}

/// Outcome available by burning momentum instead of keeping the roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MomentumBurn {
    pub original: RollOutcome,
    pub burned: RollOutcome,
}

impl ActionRoll {
    pub fn roll(rng: &mut (impl RandomSource + ?Sized), stat: i64, adds: i64) -> Self {
        Self {
            action: rng.roll_die(ACTION_DIE),
            stat,
            adds,
            challenge1: rng.roll_die(CHALLENGE_DIE),
            challenge2: rng.roll_die(CHALLENGE_DIE),
        }
    }

    pub fn score(&self) -> i64 {
        Self::total(i64::from(self.action), self.stat, self.adds)
    }

    /// Score once negative momentum is taken into account: when `momentum`
    /// is negative and its magnitude equals the action die, the die counts
    /// as zero.
    pub fn score_with_momentum(&self, momentum: i64) -> i64 {
        let action = if momentum < 0 && momentum.unsigned_abs() == u64::from(self.action) {
            0
        } else {
            i64::from(self.action)
        };
        Self::total(action, self.stat, self.adds)
    }

    fn total(action: i64, stat: i64, adds: i64) -> i64 {
        action.saturating_add(stat).saturating_add(adds).min(MAX_SCORE)
    }

    pub fn outcome(&self) -> RollOutcome {
        RollOutcome::against(self.score(), self.challenge1, self.challenge2)
    }

    pub fn outcome_with_momentum(&self, momentum: i64) -> RollOutcome {
        RollOutcome::against(
            self.score_with_momentum(momentum),
            self.challenge1,
            self.challenge2,
        )
    }

    /// Both challenge dice show the same face.
    pub fn is_match(&self) -> bool {
        self.challenge1 == self.challenge2
    }

    /// Returns the improvement burning `momentum` would give, if any.
    ///
    /// Burning is only offered for positive momentum that beats the current
    /// outcome.
    pub fn momentum_burn(&self, momentum: i64) -> Option<MomentumBurn> {
        if momentum <= 0 {
            return None;
        }
        let original = self.outcome_with_momentum(momentum);
        let burned = RollOutcome::against(momentum, self.challenge1, self.challenge2);
        (burned > original).then_some(MomentumBurn { original, burned })
    }
}

/// A rolled progress move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRoll {
    pub progress_ticks: u32,
    pub challenge1: u32,
    pub challenge2: u32,
}

impl ProgressRoll {
    pub fn roll(rng: &mut (impl RandomSource + ?Sized), progress_ticks: u32) -> Self {
        Self {
            progress_ticks,
            challenge1: rng.roll_die(CHALLENGE_DIE),
            challenge2: rng.roll_die(CHALLENGE_DIE),
        }
    }

    /// Filled boxes, capped at 10.
    pub fn score(&self) -> i64 {
        i64::from(self.progress_ticks / TICKS_PER_BOX).min(MAX_SCORE)
    }

    pub fn outcome(&self) -> RollOutcome {
        RollOutcome::against(self.score(), self.challenge1, self.challenge2)
    }

    pub fn is_match(&self) -> bool {
        self.challenge1 == self.challenge2
    }
}

/// Adds worth offering for a stat: every `add >= 0` with `1 + stat + add <= 10`.
pub fn valid_adds(stat: i64) -> Vec<i64> {
    (0..)
        .take_while(|add| 1 + stat + add <= MAX_SCORE)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanics::SequenceSource;

    fn action(action: u32, stat: i64, adds: i64, c1: u32, c2: u32) -> ActionRoll {
        ActionRoll {
            action,
            stat,
            adds,
            challenge1: c1,
            challenge2: c2,
        }
    }

    #[test]
    fn outcomes() {
        assert_eq!(action(4, 2, 0, 3, 5).outcome(), RollOutcome::StrongHit);
        assert_eq!(action(4, 2, 0, 3, 6).outcome(), RollOutcome::WeakHit);
        assert_eq!(action(4, 2, 0, 6, 9).outcome(), RollOutcome::Miss);
        assert!(RollOutcome::StrongHit > RollOutcome::WeakHit);
        assert_eq!(RollOutcome::WeakHit.to_string(), "weak_hit");
    }

    #[test]
    fn extreme_adds_saturate() {
        let roll = action(6, 5, i64::MAX, 10, 10);
        assert_eq!(roll.score(), MAX_SCORE);
        assert_eq!(roll.score_with_momentum(-6), MAX_SCORE);

        let roll = action(1, i64::MIN, -1, 1, 1);
        assert_eq!(roll.score(), i64::MIN);
        assert_eq!(roll.outcome(), RollOutcome::Miss);
    }

    #[test]
    fn score_is_capped_at_ten() {
        let roll = action(6, 5, 3, 10, 10);
        assert_eq!(roll.score(), 10);
        assert_eq!(roll.outcome(), RollOutcome::Miss);
        assert!(roll.is_match());
    }

    #[test]
    fn negative_momentum_cancels_a_matching_action_die() {
        let roll = action(3, 2, 0, 4, 1);
        assert_eq!(roll.score_with_momentum(-3), 2);
        assert_eq!(roll.outcome_with_momentum(-3), RollOutcome::WeakHit);
        assert_eq!(roll.score_with_momentum(-2), 5);
        assert_eq!(roll.score_with_momentum(3), 5);
    }

    #[test]
    fn momentum_burn_only_when_it_helps() {
        let roll = action(1, 1, 0, 5, 7);
        assert_eq!(
            roll.momentum_burn(8),
            Some(MomentumBurn {
                original: RollOutcome::Miss,
                burned: RollOutcome::StrongHit,
            })
        );
        assert_eq!(
            roll.momentum_burn(6).map(|burn| burn.burned),
            Some(RollOutcome::WeakHit)
        );
        assert_eq!(roll.momentum_burn(5), None);
        assert_eq!(roll.momentum_burn(0), None);
        assert_eq!(action(6, 3, 0, 2, 2).momentum_burn(10), None);
    }

    #[test]
    fn progress_roll_scores_filled_boxes() {
        let roll = ProgressRoll {
            progress_ticks: 27,
            challenge1: 5,
            challenge2: 7,
        };
        assert_eq!(roll.score(), 6);
        assert_eq!(roll.outcome(), RollOutcome::WeakHit);

        let mut rng = SequenceSource::new([2, 2]);
        let rolled = ProgressRoll::roll(&mut rng, 44);
        assert_eq!(rolled.score(), 10);
        assert!(rolled.is_match());
        assert_eq!(rolled.outcome(), RollOutcome::StrongHit);
    }

    #[test]
    fn rolls_use_a_d6_and_two_d10s() {
        let mut rng = SequenceSource::new([9, 10, 1]);
        let roll = ActionRoll::roll(&mut rng, 2, 1);
        assert_eq!(roll.action, 6);
        assert_eq!((roll.challenge1, roll.challenge2), (10, 1));
        assert_eq!(roll.score(), 9);
    }

    #[test]
    fn adds_keep_the_minimum_roll_in_range() {
        assert_eq!(valid_adds(3), vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(valid_adds(9), vec![0]);
        assert!(valid_adds(10).is_empty());
    }
}
