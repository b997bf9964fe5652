use thiserror::Error;

/// Reasons a `Config` cannot be used to build an index.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("max_level must be at least 1")]
    ZeroMaxLevel,

    #[error("max_level {max_level} exceeds the supported limit of {limit}")]
    MaxLevelTooLarge { max_level: usize, limit: usize },

    #[error("probability must lie strictly between 0 and 1, got {0}")]
    InvalidProbability(f64),
}
