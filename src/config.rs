use crate::error::ConfigError;

/// Default tier cap. At the default probability this keeps the expected
/// number of nodes above the top tier well below one for billions of entries.
pub const MAX_LEVEL: usize = 18;

/// Default chance that a node is promoted to the next tier.
pub const PROBABILITY: f64 = 0.25;

/// Hard ceiling accepted for `Config::max_level`.
pub const MAX_LEVEL_LIMIT: usize = 64;

/// Construction-time knobs for the index.
///
/// `max_level` bounds memory per node and must exceed
/// `log_{1/probability}(n)` for the largest expected `n`. `probability`
/// trades search speed (more tiers) against per-insert memory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub max_level: usize,
    pub probability: f64,
}

impl Config {
    pub fn new(max_level: usize, probability: f64) -> Config {
        Config {
            max_level,
            probability,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_level == 0 {
            return Err(ConfigError::ZeroMaxLevel);
        }

        if self.max_level > MAX_LEVEL_LIMIT {
            return Err(ConfigError::MaxLevelTooLarge {
                max_level: self.max_level,
                limit: MAX_LEVEL_LIMIT,
            });
        }

        // NaN fails both comparisons, so it is rejected here as well.
        if !(self.probability > 0.0 && self.probability < 1.0) {
            return Err(ConfigError::InvalidProbability(self.probability));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(MAX_LEVEL, PROBABILITY)
    }
}
