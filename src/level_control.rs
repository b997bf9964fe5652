use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::error::ConfigError;

/// Decides how many tiers a freshly inserted node participates in.
pub trait LevelControl {
    /// Largest level `random_level` may ever return.
    fn max_level(&self) -> usize;

    /// Returns a level in `[1, max_level()]`.
    fn random_level(&mut self) -> usize;
}

/// Geometric level generator: level `k` comes out with probability
/// `p^(k-1) * (1-p)`, truncated at the configured maximum.
#[derive(Debug, Clone)]
pub struct GeometricGenerator<R> {
    probability_: f64,
    max_level_: usize,
    rng_: R,
}

impl<R: Rng> GeometricGenerator<R> {
    pub fn new(config: Config, rng: R) -> Result<GeometricGenerator<R>, ConfigError> {
        config.validate()?;

        Ok(GeometricGenerator {
            probability_: config.probability,
            max_level_: config.max_level,
            rng_: rng,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability_
    }
}

impl GeometricGenerator<StdRng> {
    pub fn from_entropy(config: Config) -> Result<GeometricGenerator<StdRng>, ConfigError> {
        GeometricGenerator::new(config, StdRng::from_entropy())
    }

    /// Deterministic generator, mostly useful for reproducible tests.
    pub fn seeded(config: Config, seed: u64) -> Result<GeometricGenerator<StdRng>, ConfigError> {
        GeometricGenerator::new(config, StdRng::seed_from_u64(seed))
    }
}

impl Default for GeometricGenerator<StdRng> {
    /// Default `Config`, seeded from the operating system.
    fn default() -> Self {
        let config = Config::default();

        GeometricGenerator {
            probability_: config.probability,
            max_level_: config.max_level,
            rng_: StdRng::from_entropy(),
        }
    }
}

impl<R: Rng> LevelControl for GeometricGenerator<R> {
    #[inline(always)]
    fn max_level(&self) -> usize {
        self.max_level_
    }

    fn random_level(&mut self) -> usize {
        // Counts successes before the first failure, starting from one tier.
        let mut level = 1;

        while level < self.max_level_ && self.rng_.gen::<f64>() < self.probability_ {
            level += 1;
        }

        level
    }
}
