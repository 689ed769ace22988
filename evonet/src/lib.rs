//! Training of small feed-forward classifiers by a
//! steady-state genetic algorithm instead of gradient descent.
//!
//! A [`Population`] of randomly initialized [`Network`]s is refined
//! one child at a time: three networks are drawn, the two fittest
//! are recombined and the child, once mutated and evaluated,
//! replaces the third. Fitness is an error measure supplied by an
//! [`Evaluator`], typically a labeled [`Dataset`].
//!
//! [`Population`]: crate::populations::Population
//! [`Network`]: crate::networks::Network
//! [`Dataset`]: crate::samples::Dataset
//!
//! # Example usage: Evolution of an XOR classifier
//! ```
//! use evonet::genomics::GeneticConfig;
//! use evonet::networks::Topology;
//! use evonet::populations::{Population, PopulationConfig};
//! use evonet::samples::Dataset;
//!
//! let mut dataset = Dataset::from_reader(
//!     "0\t0\t0\n0\t1\t1\n1\t0\t1\n1\t1\t0\n".as_bytes(),
//!     1,
//! )
//! .unwrap();
//!
//! let population_config = PopulationConfig {
//!     size: 20,
//!     topology: Topology::new(vec![2, 4, 1]).unwrap(),
//!     max_iterations: 2000,
//!     epsilon: 1e-3,
//! };
//! dataset.check_topology(&population_config.topology).unwrap();
//!
//! let mut population =
//!     Population::with_seed(population_config, GeneticConfig::default(), 42).unwrap();
//! let outcome = population.run(&mut dataset);
//!
//! let mut champion = population.champion().clone();
//! let report = dataset.report(&mut champion);
//! println!("fitness {} after {} generations, {}", outcome.fitness, outcome.generations, report);
//! assert!(report.correct <= dataset.len());
//! ```

mod errors;
mod evaluator;
pub mod genomics;
pub mod networks;
pub mod populations;
pub mod samples;

pub use errors::ConfigError;
pub use evaluator::Evaluator;
