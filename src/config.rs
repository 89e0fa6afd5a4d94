// model = "claude-opus-4-5"
// created = "2026-10-16"
// modified = "2026-10-16"
// driver = "Isaac Clayton"

//! Construction-time knobs for a [`SplayList`](crate::SplayList).

use crate::error::Error;
use crate::error::Result;

/// Default number of levels. Node arrays hold `max_level + 1` slots.
pub const DEFAULT_MAX_LEVEL: usize = 32;

/// Probability that a successful lookup or removal triggers a reshape.
pub const DEFAULT_UPDATE_PROBABILITY: f64 = 0.5;

/// Thresholds shift `access_counter` by up to `max_level - 1` bits.
const MAX_SUPPORTED_LEVEL: usize = 63;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Highest level a non-sentinel node can be promoted to, exclusive.
    pub max_level: usize,
    /// Chance of reshaping after a successful `contains` or removal.
    pub update_probability: f64,
    /// Seed for the reshape coin. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Config {
    pub fn new() -> Config {
        return Config {
            max_level: DEFAULT_MAX_LEVEL,
            update_probability: DEFAULT_UPDATE_PROBABILITY,
            seed: None,
        };
    }

    pub fn max_level(mut self, max_level: usize) -> Config {
        self.max_level = max_level;
        return self;
    }

    pub fn update_probability(mut self, p: f64) -> Config {
        self.update_probability = p;
        return self;
    }

    pub fn seed(mut self, seed: u64) -> Config {
        self.seed = Some(seed);
        return self;
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_level < 2 || self.max_level > MAX_SUPPORTED_LEVEL {
            return Err(Error::InvalidConfig(format!(
                "max_level {} outside 2..={}",
                self.max_level, MAX_SUPPORTED_LEVEL
            )));
        }
        if !(0.0..=1.0).contains(&self.update_probability) {
            return Err(Error::InvalidConfig(format!(
                "update_probability {} outside [0, 1]",
                self.update_probability
            )));
        }
        return Ok(());
    }
}

impl Default for Config {
    fn default() -> Self {
        return Self::new();
    }
}
