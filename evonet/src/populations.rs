//! A Population is a fixed-size collection of networks,
//! evolved in steady state: every iteration replaces a
//! single network with the child of two others, using an
//! evaluator as the source of selective pressure.
mod config;
pub mod logging;

pub use config::PopulationConfig;

use crate::genomics::{Crossover, GeneticConfig, Mutation};
use crate::networks::Network;
use crate::{ConfigError, Evaluator};

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A population of networks sharing one topology.
///
/// The population owns its random generator; runs
/// are reproducible when it is explicitly seeded.
pub struct Population<R = StdRng> {
    networks: Vec<Network>,
    generation: usize,
    population_config: PopulationConfig,
    genetic_config: GeneticConfig,
    crossover_choice: WeightedIndex<f64>,
    mutation_choice: WeightedIndex<f64>,
    rng: R,
}

/// The record of a single replacement iteration.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Replacement {
    /// Population indices of the two parents, fittest first.
    pub parents: [usize; 2],
    /// Population index overwritten by the child.
    pub replaced: usize,
    /// The crossover variant that produced the child.
    pub crossover: Crossover,
    /// The mutation variant applied to the child.
    pub mutation: Mutation,
    /// The child's fitness.
    pub fitness: f64,
}

/// The result of a run.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Outcome {
    /// Number of replacement iterations performed.
    pub generations: usize,
    /// Whether the best fitness ended strictly below epsilon.
    pub converged: bool,
    /// Fitness of the best network.
    pub fitness: f64,
}

impl Population<StdRng> {
    /// Creates a new population of random networks, with a
    /// generator seeded from the operating system.
    ///
    /// # Errors
    /// Returns an error if either configuration is invalid.
    ///
    /// # Examples
    /// ```
    /// use evonet::genomics::GeneticConfig;
    /// use evonet::populations::{Population, PopulationConfig};
    ///
    /// let population = Population::new(
    ///     PopulationConfig {
    ///         size: 20,
    ///         ..PopulationConfig::default()
    ///     },
    ///     GeneticConfig::default(),
    /// )
    /// .unwrap();
    /// assert_eq!(population.len(), 20);
    ///
    /// let too_small = Population::new(
    ///     PopulationConfig {
    ///         size: 2,
    ///         ..PopulationConfig::default()
    ///     },
    ///     GeneticConfig::default(),
    /// );
    /// assert!(too_small.is_err());
    /// ```
    pub fn new(
        population_config: PopulationConfig,
        genetic_config: GeneticConfig,
    ) -> Result<Population<StdRng>, ConfigError> {
        Population::with_rng(population_config, genetic_config, StdRng::from_entropy())
    }

    /// Creates a new population whose generator is
    /// seeded with `seed`.
    pub fn with_seed(
        population_config: PopulationConfig,
        genetic_config: GeneticConfig,
        seed: u64,
    ) -> Result<Population<StdRng>, ConfigError> {
        Population::with_rng(
            population_config,
            genetic_config,
            StdRng::seed_from_u64(seed),
        )
    }
}

impl<R: Rng> Population<R> {
    /// Creates a new population of random networks,
    /// drawing all randomness from `rng`.
    ///
    /// # Errors
    /// Returns an error if either configuration is invalid.
    pub fn with_rng(
        population_config: PopulationConfig,
        genetic_config: GeneticConfig,
        mut rng: R,
    ) -> Result<Population<R>, ConfigError> {
        population_config.validate()?;
        genetic_config.validate()?;
        let crossover_choice = WeightedIndex::new(genetic_config.crossover_ratio)
            .map_err(|_| ConfigError::InvalidRatio("crossover"))?;
        let mutation_choice = WeightedIndex::new(genetic_config.mutation_ratio)
            .map_err(|_| ConfigError::InvalidRatio("mutation"))?;

        let networks = (0..population_config.size)
            .map(|_| Network::random(&population_config.topology, &mut rng))
            .collect();

        Ok(Population {
            networks,
            generation: 0,
            population_config,
            genetic_config,
            crossover_choice,
            mutation_choice,
            rng,
        })
    }

    /// Evaluates the fitness of each network in the
    /// population using the passed evaluator.
    ///
    /// # Panics
    /// Panics if the evaluator returns a negative or NaN value.
    pub fn evaluate_fitness<E: Evaluator + ?Sized>(&mut self, evaluator: &mut E) {
        for network in &mut self.networks {
            network.evaluate(evaluator);
        }
    }

    /// Sorts the networks by increasing fitness. The sort
    /// is stable; unevaluated networks are placed last.
    pub fn sort_by_fitness(&mut self) {
        self.networks
            .sort_by(|a, b| sort_key(a).total_cmp(&sort_key(b)));
    }

    /// Runs the full evolution loop: evaluates every network,
    /// then replaces networks until either the best fitness is
    /// strictly below the configured epsilon or the iteration
    /// budget is spent, and finally re-evaluates the whole
    /// population. Afterwards the population is sorted, with
    /// the best network first.
    ///
    /// # Examples
    /// ```
    /// use evonet::genomics::GeneticConfig;
    /// use evonet::networks::Network;
    /// use evonet::populations::{Population, PopulationConfig};
    ///
    /// let mut population = Population::with_seed(
    ///     PopulationConfig {
    ///         size: 10,
    ///         max_iterations: 200,
    ///         epsilon: 0.0,
    ///         ..PopulationConfig::default()
    ///     },
    ///     GeneticConfig::default(),
    ///     7,
    /// )
    /// .unwrap();
    ///
    /// // Prefer networks whose first output at the origin is small.
    /// let outcome = population.run(&mut |n: &mut Network| n.forward(&[0.0, 0.0])[0]);
    ///
    /// assert_eq!(outcome.generations, 200);
    /// assert!(!outcome.converged);
    /// assert_eq!(Some(outcome.fitness), population.champion().fitness());
    /// ```
    pub fn run<E: Evaluator + ?Sized>(&mut self, evaluator: &mut E) -> Outcome {
        self.run_with(evaluator, |_| {})
    }

    /// Same as [`run`](Population::run), calling `observer` with
    /// the freshly sorted population at the start of every
    /// iteration, before the convergence check.
    pub fn run_with<E, F>(&mut self, evaluator: &mut E, mut observer: F) -> Outcome
    where
        E: Evaluator + ?Sized,
        F: FnMut(&Population<R>),
    {
        let start = self.generation;
        let epsilon = self.population_config.epsilon;

        self.evaluate_fitness(evaluator);
        for _ in 0..self.population_config.max_iterations {
            self.sort_by_fitness();
            observer(&*self);
            if sort_key(&self.networks[0]) < epsilon {
                break;
            }
            self.replace_worst_of_three(evaluator);
        }

        self.evaluate_fitness(evaluator);
        self.sort_by_fitness();
        let fitness = sort_key(&self.networks[0]);
        Outcome {
            generations: self.generation - start,
            converged: fitness < epsilon,
            fitness,
        }
    }

    /// Performs a single iteration: sorts the population,
    /// then replaces the worst of three random networks
    /// with a child of the other two.
    ///
    /// The population should have been evaluated with
    /// [`evaluate_fitness`](Population::evaluate_fitness) first.
    ///
    /// # Examples
    /// ```
    /// use evonet::genomics::GeneticConfig;
    /// use evonet::networks::Network;
    /// use evonet::populations::{Population, PopulationConfig};
    ///
    /// let mut population = Population::with_seed(
    ///     PopulationConfig {
    ///         size: 5,
    ///         ..PopulationConfig::default()
    ///     },
    ///     GeneticConfig::default(),
    ///     3,
    /// )
    /// .unwrap();
    /// let mut evaluator = |n: &mut Network| n.forward(&[1.0, 1.0])[0];
    /// population.evaluate_fitness(&mut evaluator);
    ///
    /// let replacement = population.step(&mut evaluator);
    /// assert!(replacement.parents[0] < replacement.parents[1]);
    /// assert!(replacement.parents[1] < replacement.replaced);
    /// assert_eq!(population.generation(), 1);
    /// ```
    pub fn step<E: Evaluator + ?Sized>(&mut self, evaluator: &mut E) -> Replacement {
        self.sort_by_fitness();
        self.replace_worst_of_three(evaluator)
    }

    /// Draws three distinct networks of the sorted population,
    /// mates the two fittest and overwrites the third with
    /// the evaluated child.
    fn replace_worst_of_three<E: Evaluator + ?Sized>(&mut self, evaluator: &mut E) -> Replacement {
        let mut picks = self.draw_distinct_indices();
        picks.sort_unstable();
        let [first, second, worst] = picks;

        let crossover = Crossover::ALL[self.crossover_choice.sample(&mut self.rng)];
        let mut child = crossover.apply(&self.networks[first], &self.networks[second], &mut self.rng);
        let mutation = Mutation::ALL[self.mutation_choice.sample(&mut self.rng)];
        mutation.apply(&mut child, &self.genetic_config, &mut self.rng);
        let fitness = child.evaluate(evaluator);

        self.networks[worst] = child;
        self.generation += 1;

        Replacement {
            parents: [first, second],
            replaced: worst,
            crossover,
            mutation,
            fitness,
        }
    }

    /// Draws three distinct population indices
    /// uniformly, redrawing on duplicates.
    fn draw_distinct_indices(&mut self) -> [usize; 3] {
        let mut picks = [0; 3];
        let mut drawn = 0;
        while drawn < picks.len() {
            let index = self.rng.gen_range(0..self.networks.len());
            if !picks[..drawn].contains(&index) {
                picks[drawn] = index;
                drawn += 1;
            }
        }
        picks
    }
}

impl<R> Population<R> {
    /// Returns the best network, i.e. the one with
    /// the lowest fitness. Unevaluated networks
    /// are never preferred over evaluated ones.
    pub fn champion(&self) -> &Network {
        self.networks[1..].iter().fold(&self.networks[0], |best, n| {
            if sort_key(n) < sort_key(best) {
                n
            } else {
                best
            }
        })
    }

    /// Returns an iterator over all current networks,
    /// in population order.
    pub fn networks(&self) -> impl Iterator<Item = &Network> {
        self.networks.iter()
    }

    /// Number of networks in the population.
    pub fn len(&self) -> usize {
        self.networks.len()
    }

    /// Always `false` for a constructed population.
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// Returns the number of replacements performed so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the population configuration.
    pub fn population_config(&self) -> &PopulationConfig {
        &self.population_config
    }

    /// Returns the genetic operator configuration.
    pub fn genetic_config(&self) -> &GeneticConfig {
        &self.genetic_config
    }
}

fn sort_key(network: &Network) -> f64 {
    network.fitness().unwrap_or(f64::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networks::Topology;

    fn xor_like(network: &mut Network) -> f64 {
        let samples = [
            ([0.0, 0.0], 0.0),
            ([0.0, 1.0], 1.0),
            ([1.0, 0.0], 1.0),
            ([1.0, 1.0], 0.0),
        ];
        samples
            .iter()
            .map(|(x, y)| (network.forward(x)[0] - y).powi(2))
            .sum::<f64>()
            / samples.len() as f64
    }

    fn xor_population(size: usize, max_iterations: usize, seed: u64) -> Population {
        Population::with_seed(
            PopulationConfig {
                size,
                topology: Topology::new(vec![2, 4, 1]).unwrap(),
                max_iterations,
                epsilon: 0.0,
            },
            GeneticConfig::default(),
            seed,
        )
        .unwrap()
    }

    fn is_sorted(population: &Population) -> bool {
        let fitnesses: Vec<f64> = population.networks().map(sort_key).collect();
        fitnesses.windows(2).all(|w| w[0] <= w[1])
    }

    #[test]
    fn rejects_invalid_configs() {
        let result = Population::with_seed(
            PopulationConfig {
                size: 1,
                ..PopulationConfig::default()
            },
            GeneticConfig::default(),
            0,
        );
        assert_eq!(result.err(), Some(ConfigError::PopulationTooSmall(1)));

        let result = Population::with_seed(
            PopulationConfig::default(),
            GeneticConfig {
                mutation_ratio: [0.0, 0.0],
                ..GeneticConfig::default()
            },
            0,
        );
        assert_eq!(result.err(), Some(ConfigError::InvalidRatio("mutation")));
    }

    #[test]
    fn draws_are_distinct() {
        let mut population = xor_population(3, 0, 1);
        for _ in 0..200 {
            let mut picks = population.draw_distinct_indices();
            picks.sort_unstable();
            assert_eq!(picks, [0, 1, 2]);
        }
        let mut population = xor_population(10, 0, 2);
        for _ in 0..200 {
            let [a, b, c] = population.draw_distinct_indices();
            assert!(a != b && b != c && a != c);
            assert!(a < 10 && b < 10 && c < 10);
        }
    }

    #[test]
    fn steps_keep_size_and_replace_a_weaker_slot() {
        let mut population = xor_population(12, 0, 3);
        population.evaluate_fitness(&mut xor_like);
        for i in 0..300 {
            let replacement = population.step(&mut xor_like);
            assert_eq!(population.len(), 12);
            assert_eq!(population.generation(), i + 1);
            let [first, second] = replacement.parents;
            assert!(first < second && second < replacement.replaced);
            assert!(replacement.replaced >= 2);
            assert_eq!(
                population.networks.get(replacement.replaced).and_then(|n| n.fitness()),
                Some(replacement.fitness)
            );
        }
        population.sort_by_fitness();
        assert!(is_sorted(&population));
    }

    #[test]
    fn single_variant_ratios_are_respected() {
        let mut population = Population::with_seed(
            PopulationConfig {
                size: 6,
                topology: Topology::new(vec![2, 3, 1]).unwrap(),
                ..PopulationConfig::default()
            },
            GeneticConfig {
                crossover_ratio: [0.0, 1.0, 0.0],
                mutation_ratio: [0.0, 1.0],
                ..GeneticConfig::default()
            },
            4,
        )
        .unwrap();
        population.evaluate_fitness(&mut xor_like);
        for _ in 0..50 {
            let replacement = population.step(&mut xor_like);
            assert_eq!(replacement.crossover, Crossover::UniformNode);
            assert_eq!(replacement.mutation, Mutation::PerUnit);
        }
    }

    #[test]
    fn infinite_epsilon_stops_immediately() {
        let mut population = Population::with_seed(
            PopulationConfig {
                size: 8,
                topology: Topology::new(vec![2, 4, 1]).unwrap(),
                max_iterations: 1000,
                epsilon: f64::INFINITY,
            },
            GeneticConfig::default(),
            5,
        )
        .unwrap();
        let mut observed = 0;
        let outcome = population.run_with(&mut xor_like, |_| observed += 1);
        assert_eq!(outcome.generations, 0);
        assert!(outcome.converged);
        assert_eq!(observed, 1);
        assert_eq!(population.generation(), 0);
        assert!(is_sorted(&population));
        assert_eq!(population.champion().fitness(), Some(outcome.fitness));
    }

    #[test]
    fn run_is_reproducible_with_a_seed() {
        let first = xor_population(10, 300, 77).run(&mut xor_like);
        let second = xor_population(10, 300, 77).run(&mut xor_like);
        assert_eq!(first, second);
    }

    #[test]
    fn best_fitness_never_worsens() {
        let mut population = xor_population(20, 5000, 6);
        let mut trace = vec![];
        let outcome = population.run_with(&mut xor_like, |p| {
            assert!(is_sorted(p));
            assert_eq!(p.len(), 20);
            if p.generation() % 100 == 0 {
                trace.push(sort_key(p.champion()));
            }
        });
        assert_eq!(outcome.generations, 5000);
        assert_eq!(trace.len(), 50);
        assert!(trace.windows(2).all(|w| w[1] <= w[0]), "{:?}", trace);
        assert!(outcome.fitness <= trace[0]);
        assert_eq!(population.champion().fitness(), Some(outcome.fitness));
    }

    #[test]
    fn champion_prefers_evaluated_networks() {
        let mut population = xor_population(4, 0, 8);
        assert_eq!(population.champion().fitness(), None);
        population.networks[2].evaluate(&mut |_: &mut Network| 3.0);
        assert_eq!(population.champion().fitness(), Some(3.0));
        population.sort_by_fitness();
        assert_eq!(population.networks[0].fitness(), Some(3.0));
    }
}
