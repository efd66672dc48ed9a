//! Momentum arithmetic gated by marked impacts.
//!
//! Each marked impact lowers the momentum ceiling by two, down to zero. The
//! reset value is that same ceiling, recomputed at the time of the reset.

use super::Character;
use super::lens::CharacterLens;
use crate::lens::Lens;

pub const MOMENTUM_MIN: i64 = -6;
pub const MOMENTUM_MAX: i64 = 10;

/// Pure momentum transitions over a [`CharacterLens`].
///
/// Every operation clamps into range before writing, so none of them fail.
#[derive(Clone, Copy, Debug)]
pub struct MomentumOps<'a> {
    lens: &'a CharacterLens,
}

impl<'a> MomentumOps<'a> {
    pub fn new(lens: &'a CharacterLens) -> Self {
        Self { lens }
    }

    pub fn marked_impacts(&self, character: &Character) -> usize {
        self.lens.impacts.marked_count(character)
    }

    /// `max(0, 10 - 2 * marked impacts)`.
    pub fn ceiling(&self, character: &Character) -> i64 {
        let marked = i64::try_from(self.marked_impacts(character)).unwrap_or(i64::MAX);
        MOMENTUM_MAX.saturating_sub(marked.saturating_mul(2)).max(0)
    }

    pub fn get(&self, character: &Character) -> i64 {
        self.lens.momentum.get(character)
    }

    /// Adds `n` momentum, stopping at the ceiling.
    pub fn take(self, n: i64) -> impl Fn(&Character) -> Character + 'a {
        move |character| {
            let target = self.get(character).saturating_add(n).min(self.ceiling(character));
            self.lens.momentum.set_clamped(character, target)
        }
    }

    /// Removes `n` momentum, stopping at the floor of -6.
    pub fn suffer(self, n: i64) -> impl Fn(&Character) -> Character + 'a {
        move |character| {
            let target = self.get(character).saturating_sub(n).max(MOMENTUM_MIN);
            self.lens.momentum.set_clamped(character, target)
        }
    }

    /// Sets momentum to the current ceiling, whether that raises or lowers it.
    pub fn reset(&self, character: &Character) -> Character {
        self.lens
            .momentum
            .set_clamped(character, self.ceiling(character))
    }

    /// Burning momentum spends it all, which leaves it at the reset value.
    pub fn burn(&self, character: &Character) -> Character {
        self.reset(character)
    }
}

impl CharacterLens {
    pub fn momentum_ops(&self) -> MomentumOps<'_> {
        MomentumOps::new(self)
    }
}
