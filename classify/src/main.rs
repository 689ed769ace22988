mod config;

use config::ExperimentConfig;

use evonet::networks::Network;
use evonet::populations::logging::{EvolutionLogger, ReportingLevel, Stats};
use evonet::populations::{Outcome, Population};
use evonet::samples::{Dataset, Report};

use std::env;
use std::error::Error;

use rayon::prelude::*;

/// The result of a single training run.
struct Trial {
    index: usize,
    outcome: Outcome,
    report: Report,
    champion: Network,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = match env::args().nth(1) {
        Some(path) => ExperimentConfig::load(&path)?,
        None => ExperimentConfig::default(),
    };

    let dataset = Dataset::load(&config.dataset, config.class_count)?;
    dataset.check_topology(&config.population.topology)?;
    println!(
        "{} samples from {}, topology {}, {} trials",
        dataset.len(),
        config.dataset.display(),
        config.population.topology,
        config.trials
    );

    let trials = (0..config.trials)
        .into_par_iter()
        .map(|index| train(&config, &dataset, index))
        .collect::<Result<Vec<_>, _>>()?;

    for trial in &trials {
        println!(
            "trial {}: fitness {:.6} after {} generations{}, {}",
            trial.index,
            trial.outcome.fitness,
            trial.outcome.generations,
            if trial.outcome.converged { " (converged)" } else { "" },
            trial.report
        );
    }

    println!(
        "Best fitness {:?}\nAccuracy {:?}",
        Stats::from(trials.iter().map(|t| t.outcome.fitness)),
        Stats::from(trials.iter().map(|t| t.report.accuracy())),
    );
    if let Some(best) = trials
        .iter()
        .min_by(|a, b| a.outcome.fitness.total_cmp(&b.outcome.fitness))
    {
        println!("Champion of trial {}:\n{}", best.index, best.champion);
    }
    Ok(())
}

/// Evolves one population against the dataset,
/// printing its progress every `log_interval` generations.
fn train(
    config: &ExperimentConfig,
    dataset: &Dataset,
    index: usize,
) -> Result<Trial, evonet::ConfigError> {
    let mut population = match config.seed {
        Some(seed) => Population::with_seed(
            config.population.clone(),
            config.genetics.clone(),
            seed.wrapping_add(index as u64),
        )?,
        None => Population::new(config.population.clone(), config.genetics.clone())?,
    };

    let mut logger = EvolutionLogger::new(ReportingLevel::NoNetworks);
    let outcome = population.run_with(
        &mut |n: &mut Network| dataset.mean_squared_error(n),
        |p| {
            if config.log_interval > 0 && p.generation() % config.log_interval == 0 {
                logger.log(p, &|n| n.fitness().map(|f| [f]), ["fitness"]);
                if let Some(log) = logger.latest() {
                    eprintln!("trial {}: {}", index, log);
                }
            }
        },
    );

    let mut champion = population.champion().clone();
    let report = dataset.report(&mut champion);
    Ok(Trial {
        index,
        outcome,
        report,
        champion,
    })
}
