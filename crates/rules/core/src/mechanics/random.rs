//! Pluggable randomness for dice and oracle rolls.
//!
//! The core never picks a generator itself. The runtime plugs in a
//! thread-local RNG; tests script exact dice with [`SequenceSource`].

use std::collections::VecDeque;

/// Uniform integer source consumed by the roll logic.
pub trait RandomSource {
    /// Returns a value in `[min, max]` inclusive. Returns `min` if `min >= max`.
    fn random_int(&mut self, min: u32, max: u32) -> u32;

    /// Rolls one die with `sides` faces (1..=sides).
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.random_int(1, sides)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn random_int(&mut self, min: u32, max: u32) -> u32 {
        (**self).random_int(min, max)
    }
}

/// Replays a fixed list of values.
///
/// Each value is clamped into the requested range; once the list is exhausted
/// every roll returns the range minimum.
#[derive(Clone, Debug, Default)]
pub struct SequenceSource {
    values: VecDeque<u32>,
}

impl SequenceSource {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Values not consumed yet.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for SequenceSource {
    fn random_int(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.values
            .pop_front()
            .map_or(min, |value| value.clamp(min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_replays_then_bottoms_out() {
        let mut source = SequenceSource::new([3, 12, 0]);
        assert_eq!(source.roll_die(6), 3);
        assert_eq!(source.roll_die(10), 10);
        assert_eq!(source.roll_die(10), 1);
        assert_eq!(source.remaining(), 0);
        assert_eq!(source.roll_die(6), 1);
    }
}
