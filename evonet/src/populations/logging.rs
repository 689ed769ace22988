use super::Population;

use crate::networks::Network;

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ReportingLevel {
    /// Clones the entire population.
    AllNetworks,
    /// Clones only the population champion.
    PopulationChampion,
    /// Clones no networks.
    NoNetworks,
}

/// A snapshot of a population.
#[derive(Clone, Debug)]
pub struct Log {
    pub generation_number: usize,
    pub generation_sample: GenerationMemberRecord,
    pub champion_fitness: Option<f64>,
    pub network_stats: Vec<(String, Stats)>,
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log {{\n\
            \tgeneration_number: {:?}\n\
            \tchampion_fitness: {:?}\n\
            {}}}",
            &self.generation_number,
            &self.champion_fitness,
            self.network_stats
                .iter()
                .map(|(name, stats)| format!("\t{}: {:?}\n", name, stats))
                .collect::<Vec<_>>()
                .join("")
        )
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, PartialEq, Debug)]
pub struct Stats {
    pub maximum: f64,
    pub minimum: f64,
    pub mean: f64,
    pub median: f64,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if the sequence is empty.
    ///
    /// # Examples
    /// ```
    /// use evonet::populations::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied()).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// assert!(Stats::from(std::iter::empty()).is_none());
    /// ```
    pub fn from(data: impl Iterator<Item = f64>) -> Option<Stats> {
        let mut data: Vec<f64> = data.collect();
        if data.is_empty() {
            return None;
        }
        let mid = data.len() / 2;
        let (mut max, mut min, mut sum) = (f64::MIN, f64::MAX, 0.0);
        for d in &data {
            max = d.max(max);
            min = d.min(min);
            sum += d;
        }
        let mean = sum / data.len() as f64;
        data.sort_unstable_by(f64::total_cmp);
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Some(Stats {
            maximum: max,
            minimum: min,
            mean,
            median,
        })
    }
}

/// A reporting-level dependant store
/// of networks from a population.
#[derive(Clone, Debug)]
pub enum GenerationMemberRecord {
    /// Every network, in population order.
    Networks(Vec<Network>),
    /// Only the population champion.
    PopulationChampion(Network),
    /// Empty.
    None,
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger {
    reporting_level: ReportingLevel,
    logs: Vec<Log>,
}

impl EvolutionLogger {
    /// Returns a logger with the appropiate reporting level.
    ///
    /// # Examples
    /// ```
    /// use evonet::populations::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// let logger = EvolutionLogger::new(ReportingLevel::NoNetworks);
    /// assert_eq!(logger.iter().count(), 0);
    /// ```
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Store a snapshot of a population.
    ///
    /// The `network_stat_extractor` provides a way of
    /// obtaining arbitrary statistics on the population,
    /// where each statistic is named by `stat_names`.
    /// Unevaluated networks are left out of the statistics.
    ///
    /// # Examples
    /// ```
    /// use evonet::genomics::GeneticConfig;
    /// use evonet::networks::Network;
    /// use evonet::populations::{Population, PopulationConfig};
    /// use evonet::populations::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// let mut logger = EvolutionLogger::new(ReportingLevel::NoNetworks);
    /// let mut population = Population::with_seed(
    ///     PopulationConfig {
    ///         size: 10,
    ///         max_iterations: 50,
    ///         epsilon: 0.0,
    ///         ..PopulationConfig::default()
    ///     },
    ///     GeneticConfig::default(),
    ///     0,
    /// )
    /// .unwrap();
    ///
    /// population.run_with(
    ///     &mut |n: &mut Network| n.forward(&[0.5, 0.5])[2],
    ///     |p| {
    ///         if p.generation() % 10 == 0 {
    ///             logger.log(p, &|n| n.fitness().map(|f| [f]), ["fitness"]);
    ///         }
    ///     },
    /// );
    /// assert_eq!(logger.iter().count(), 5);
    /// ```
    pub fn log<R, NSE, const N: usize>(
        &mut self,
        population: &Population<R>,
        network_stat_extractor: &NSE,
        stat_names: [&str; N],
    ) where
        NSE: Fn(&Network) -> Option<[f64; N]>,
    {
        let stats: Vec<[f64; N]> = population
            .networks()
            .filter_map(network_stat_extractor)
            .collect();
        let network_stats = stat_names
            .iter()
            .cloned()
            .map(String::from)
            .zip(unzip_n_vecs(stats.into_iter()))
            .filter_map(|(name, data)| Stats::from(data.into_iter()).map(|s| (name, s)))
            .collect();
        self.logs.push(Log {
            generation_number: population.generation(),
            generation_sample: match self.reporting_level {
                ReportingLevel::AllNetworks => {
                    GenerationMemberRecord::Networks(population.networks().cloned().collect())
                }
                ReportingLevel::PopulationChampion => {
                    GenerationMemberRecord::PopulationChampion(population.champion().clone())
                }
                ReportingLevel::NoNetworks => GenerationMemberRecord::None,
            },
            champion_fitness: population.champion().fitness(),
            network_stats,
        })
    }

    /// Iterate over all logged snapshots.
    ///
    /// # Examples
    /// ```
    /// use evonet::populations::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// let logger = EvolutionLogger::new(ReportingLevel::AllNetworks);
    /// // Log some stuff... then
    /// for log in logger.iter() {
    ///     println!("{}", log);
    /// }
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = &Log> {
        self.logs.iter()
    }

    /// Returns the most recent snapshot, if any.
    pub fn latest(&self) -> Option<&Log> {
        self.logs.last()
    }
}

fn unzip_n_vecs<T: Clone, const N: usize>(iter: impl Iterator<Item = [T; N]>) -> Vec<Vec<T>> {
    let mut vecs = vec![Vec::default(); N];
    for items in iter {
        for (vec, item) in vecs.iter_mut().zip(items) {
            vec.push(item);
        }
    }
    vecs
}
