use crate::networks::Topology;
use crate::ConfigError;

use serde::{Deserialize, Serialize};

/// Configuration data for population generation
/// and evolution.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Number of networks in the population.
    /// At least 3 are needed to draw distinct
    /// parents and a replacement slot.
    pub size: usize,
    /// Layer sizes shared by every network.
    pub topology: Topology,
    /// Maximum number of replacement iterations of a run.
    pub max_iterations: usize,
    /// A run stops as soon as the best fitness
    /// is strictly below this value.
    pub epsilon: f64,
}

impl PopulationConfig {
    /// Checks every value of the configuration.
    ///
    /// # Errors
    /// Returns an error if the population is smaller
    /// than 3, or `epsilon` is NaN.
    ///
    /// # Examples
    /// ```
    /// use evonet::populations::PopulationConfig;
    ///
    /// let cfg = PopulationConfig {
    ///     size: 2,
    ///     ..PopulationConfig::default()
    /// };
    /// assert!(cfg.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size < 3 {
            return Err(ConfigError::PopulationTooSmall(self.size));
        }
        if self.epsilon.is_nan() {
            return Err(ConfigError::InvalidEpsilon);
        }
        Ok(())
    }
}

impl Default for PopulationConfig {
    /// 100 networks of topology `2-8-3`, one million
    /// iterations and an epsilon of `1e-6`.
    fn default() -> PopulationConfig {
        PopulationConfig {
            size: 100,
            topology: Topology::default(),
            max_iterations: 1_000_000,
            epsilon: 1e-6,
        }
    }
}
