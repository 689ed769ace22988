use evonet::genomics::GeneticConfig;
use evonet::populations::PopulationConfig;

use serde::{Deserialize, Serialize};

use std::error::Error;
use std::fs;
use std::path::PathBuf;

/// Everything a batch of training runs needs.
/// Missing fields in a config file fall back
/// to the values of [`ExperimentConfig::default`],
/// whose population and genetic settings are the
/// library defaults, so a partially given
/// `population` or `genetics` table is completed
/// the same way.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Tab-separated file with one sample per line.
    pub dataset: PathBuf,
    /// Number of trailing label columns in the dataset.
    pub class_count: usize,
    /// Independent runs, each on its own population.
    pub trials: usize,
    /// Seed of the first trial; trial `i` uses `seed + i`.
    /// Unseeded trials draw from the operating system.
    pub seed: Option<u64>,
    /// Generations between progress lines. Zero disables them.
    pub log_interval: usize,
    pub population: PopulationConfig,
    pub genetics: GeneticConfig,
}

impl ExperimentConfig {
    /// Reads a RON config file.
    pub fn load(path: &str) -> Result<ExperimentConfig, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        let config: ExperimentConfig = ron::from_str(&text)?;
        config.population.validate()?;
        config.genetics.validate()?;
        Ok(config)
    }
}

impl Default for ExperimentConfig {
    fn default() -> ExperimentConfig {
        ExperimentConfig {
            dataset: [env!("CARGO_MANIFEST_DIR"), "data", "sample.tsv"]
                .iter()
                .collect(),
            class_count: 3,
            trials: 4,
            seed: None,
            log_interval: 10_000,
            population: PopulationConfig::default(),
            genetics: GeneticConfig::default(),
        }
    }
}
