//! Random sources backed by `rand`.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use rules_core::RandomSource;

/// A [`RandomSource`] drawing from any `rand` generator.
#[derive(Clone, Debug)]
pub struct RngSource<R> {
    rng: R,
}

/// Non-deterministic source for play.
pub type ThreadRandom = RngSource<ThreadRng>;

impl RngSource<ThreadRng> {
    pub fn thread() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RngSource<ThreadRng> {
    fn default() -> Self {
        Self::thread()
    }
}

impl RngSource<StdRng> {
    /// Reproducible source, e.g. for replaying a session.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn random_int(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}
