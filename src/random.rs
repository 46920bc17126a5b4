use anyhow::Result;
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use rand_distr::Uniform;

/// Source of uniform random draws.
///
/// Every stochastic decision of the simulation goes through this trait,
/// so a deterministic implementation can be substituted in tests.
pub trait RandomSource {
    /// Draw a float uniformly from `[0, 1)`.
    fn uniform01(&mut self) -> f64;

    /// Draw an integer uniformly from `[min, max]` (inclusive, `min <= max`).
    fn uniform_int(&mut self, min: i64, max: i64) -> i64;
}

/// Production random source backed by a ChaCha12 generator.
pub struct ChaChaSource {
    rng: ChaCha12Rng,
}

impl ChaChaSource {
    /// Create a reproducible source from a seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }

    /// Create a source seeded from the operating system.
    pub fn from_os() -> Result<Self> {
        let rng = ChaCha12Rng::try_from_os_rng()?;
        Ok(Self { rng })
    }
}

impl RandomSource for ChaChaSource {
    fn uniform01(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn uniform_int(&mut self, min: i64, max: i64) -> i64 {
        debug_assert!(min <= max, "empty integer range [{min}, {max}]");
        match Uniform::new_inclusive(min, max) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => min,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chacha_draws_stay_in_range() {
        let mut rng = ChaChaSource::from_seed(7);
        for _ in 0..1000 {
            let val = rng.uniform01();
            assert!((0.0..1.0).contains(&val));
            let val = rng.uniform_int(-2, 2);
            assert!((-2..=2).contains(&val));
        }
        assert_eq!(rng.uniform_int(3, 3), 3);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "empty integer range")]
    fn chacha_rejects_empty_range() {
        let mut rng = ChaChaSource::from_seed(7);
        rng.uniform_int(2, 1);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut rng_a = ChaChaSource::from_seed(42);
        let mut rng_b = ChaChaSource::from_seed(42);
        for _ in 0..100 {
            assert_eq!(rng_a.uniform_int(0, 1000), rng_b.uniform_int(0, 1000));
            assert_eq!(rng_a.uniform01(), rng_b.uniform01());
        }
    }
}
