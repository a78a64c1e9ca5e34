//! Deterministic simulation-level RNG wrapper.
//!
//! The stepping core itself is fully deterministic and draws no random
//! numbers.  Randomness is only used while *setting up* a scenario (e.g.
//! scattering start positions inside a polygon), and there it must be
//! reproducible: the same seed always yields the same layout.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seeded RNG for scenario construction.
///
/// Used only in single-threaded setup code.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
