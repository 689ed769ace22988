use crate::genomics::{Crossover, Mutation};
use crate::ConfigError;

use serde::{Deserialize, Serialize};

/// Configuration of the genetic operators used to
/// produce children.
///
/// Ratios are relative weights: a variant is chosen with
/// probability equal to its ratio divided by the ratio sum.
/// Per-variant arrays are indexed in the order of
/// [`Crossover::ALL`] and [`Mutation::ALL`].
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]; this is checked by
/// [`validate`](GeneticConfig::validate).
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    /// Relative selection weights of the uniform-gene,
    /// uniform-node and blend crossovers.
    pub crossover_ratio: [f64; 3],
    /// Relative selection weights of the per-scalar
    /// and per-unit mutations.
    pub mutation_ratio: [f64; 2],
    /// Resampling chance of a scalar (per-scalar mutation)
    /// or of a unit (per-unit mutation).
    pub mutation_probability: [f64; 2],
    /// Multiplier on the resampling magnitude of
    /// each mutation variant.
    pub mutation_factor: [f64; 2],
}

impl GeneticConfig {
    /// Checks every value of the configuration.
    ///
    /// # Errors
    /// Returns an error for ratios that are negative, not finite
    /// or all zero, probabilities outside `[0, 1]` and factors
    /// that are negative or not finite.
    ///
    /// # Examples
    /// ```
    /// use evonet::genomics::GeneticConfig;
    ///
    /// assert!(GeneticConfig::default().validate().is_ok());
    ///
    /// let cfg = GeneticConfig {
    ///     crossover_ratio: [0.0, 0.0, 0.0],
    ///     ..GeneticConfig::default()
    /// };
    /// assert!(cfg.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_ratio("crossover", &self.crossover_ratio)?;
        check_ratio("mutation", &self.mutation_ratio)?;
        if let Some(&p) = self
            .mutation_probability
            .iter()
            .find(|p| !(0.0..=1.0).contains(*p))
        {
            return Err(ConfigError::InvalidProbability(p));
        }
        if let Some(&x) = self
            .mutation_factor
            .iter()
            .find(|x| !(x.is_finite() && **x >= 0.0))
        {
            return Err(ConfigError::InvalidFactor(x));
        }
        Ok(())
    }

    /// Resampling chance of the given mutation variant.
    pub fn probability_of(&self, mutation: Mutation) -> f64 {
        self.mutation_probability[mutation as usize]
    }

    /// Magnitude factor of the given mutation variant.
    pub fn factor_of(&self, mutation: Mutation) -> f64 {
        self.mutation_factor[mutation as usize]
    }

    /// Selection weight of the given crossover variant.
    pub fn ratio_of(&self, crossover: Crossover) -> f64 {
        self.crossover_ratio[crossover as usize]
    }
}

impl Default for GeneticConfig {
    /// Uniform variant ratios, a 1% resampling chance
    /// and unit magnitude for both mutations.
    fn default() -> GeneticConfig {
        GeneticConfig {
            crossover_ratio: [1.0; 3],
            mutation_ratio: [1.0; 2],
            mutation_probability: [0.01; 2],
            mutation_factor: [1.0; 2],
        }
    }
}

fn check_ratio(name: &'static str, ratio: &[f64]) -> Result<(), ConfigError> {
    let valid = ratio.iter().all(|r| r.is_finite() && *r >= 0.0)
        && ratio.iter().any(|r| *r > 0.0);
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidRatio(name))
    }
}
