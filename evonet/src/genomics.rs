//! Genetic operators over network parameters.
//!
//! Children are produced by a crossover of two parents,
//! which always allocates a fresh network, followed by an
//! in-place mutation of the child. Neither operator changes
//! the topology.
mod config;
mod crossover;
mod mutation;

pub use config::GeneticConfig;

use crate::networks::Network;

use rand::Rng;

/// The available crossover variants.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Crossover {
    /// Every scalar comes from either parent with equal chance.
    UniformGene,
    /// Every unit comes whole from either parent with equal chance.
    UniformNode,
    /// Every scalar is interpolated between the parents,
    /// uniformly for weights and normally for bias entries.
    Blend,
}

impl Crossover {
    /// All variants, in [`GeneticConfig::crossover_ratio`] order.
    pub const ALL: [Crossover; 3] = [Crossover::UniformGene, Crossover::UniformNode, Crossover::Blend];

    /// Returns a new child of `parent1` and `parent2`.
    /// The parents are left untouched, and the child
    /// owns freshly allocated parameters.
    ///
    /// # Panics
    /// Panics if the parents' topologies differ.
    ///
    /// # Examples
    /// ```
    /// use evonet::genomics::Crossover;
    /// use evonet::networks::{Network, Topology};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(0);
    /// let topology = Topology::new(vec![2, 3, 1]).unwrap();
    /// let a = Network::random(&topology, &mut rng);
    /// let b = Network::random(&topology, &mut rng);
    ///
    /// let child = Crossover::Blend.apply(&a, &b, &mut rng);
    /// assert_eq!(child.topology(), &topology);
    /// assert_eq!(child.fitness(), None);
    /// ```
    pub fn apply<R: Rng + ?Sized>(self, parent1: &Network, parent2: &Network, rng: &mut R) -> Network {
        match self {
            Crossover::UniformGene => crossover::uniform_gene(parent1, parent2, rng),
            Crossover::UniformNode => crossover::uniform_node(parent1, parent2, rng),
            Crossover::Blend => crossover::blend(parent1, parent2, rng),
        }
    }
}

/// The available mutation variants.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Mutation {
    /// Every scalar is resampled independently.
    PerScalar,
    /// Every unit is resampled as a whole.
    PerUnit,
}

impl Mutation {
    /// All variants, in [`GeneticConfig::mutation_ratio`] order.
    pub const ALL: [Mutation; 2] = [Mutation::PerScalar, Mutation::PerUnit];

    /// Mutates `network` in place, using this variant's
    /// probability and factor from `config`. Returns the
    /// number of resampled scalars; if any, the network's
    /// cached fitness becomes stale.
    ///
    /// # Examples
    /// ```
    /// use evonet::genomics::{GeneticConfig, Mutation};
    /// use evonet::networks::{Network, Topology};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(0);
    /// let topology = Topology::new(vec![2, 3, 1]).unwrap();
    /// let mut network = Network::random(&topology, &mut rng);
    /// network.evaluate(&mut |_: &mut Network| 1.0);
    ///
    /// let config = GeneticConfig {
    ///     mutation_probability: [1.0, 1.0],
    ///     ..GeneticConfig::default()
    /// };
    /// let resampled = Mutation::PerScalar.apply(&mut network, &config, &mut rng);
    ///
    /// assert_eq!(resampled, network.scalar_count());
    /// assert_eq!(network.fitness(), None);
    /// ```
    pub fn apply<R: Rng + ?Sized>(self, network: &mut Network, config: &GeneticConfig, rng: &mut R) -> usize {
        let probability = config.probability_of(self);
        let factor = config.factor_of(self);
        let resampled = match self {
            Mutation::PerScalar => mutation::per_scalar(network, probability, factor, rng),
            Mutation::PerUnit => mutation::per_unit(network, probability, factor, rng),
        };
        if resampled > 0 {
            network.invalidate_fitness();
        }
        resampled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networks::Topology;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn crossover_leaves_parents_untouched() {
        let mut rng = StdRng::seed_from_u64(31);
        let topology = Topology::new(vec![3, 5, 2]).unwrap();
        let a = Network::random(&topology, &mut rng);
        let b = Network::random(&topology, &mut rng);
        let (a_before, b_before) = (a.layers().to_vec(), b.layers().to_vec());
        for crossover in Crossover::ALL {
            for _ in 0..20 {
                let child = crossover.apply(&a, &b, &mut rng);
                assert_eq!(child.topology(), &topology);
                assert_eq!(child.scalar_count(), a.scalar_count());
            }
        }
        assert_eq!(a.layers(), a_before.as_slice());
        assert_eq!(b.layers(), b_before.as_slice());
    }

    #[test]
    #[should_panic(expected = "different topologies")]
    fn crossover_rejects_mismatched_parents() {
        let mut rng = StdRng::seed_from_u64(0);
        let a = Network::random(&Topology::new(vec![2, 1]).unwrap(), &mut rng);
        let b = Network::random(&Topology::new(vec![2, 2]).unwrap(), &mut rng);
        Crossover::UniformGene.apply(&a, &b, &mut rng);
    }

    #[test]
    fn mutation_uses_its_own_probability() {
        let mut rng = StdRng::seed_from_u64(12);
        let topology = Topology::new(vec![2, 4, 2]).unwrap();
        let config = GeneticConfig {
            mutation_probability: [0.0, 1.0],
            ..GeneticConfig::default()
        };
        let mut network = Network::random(&topology, &mut rng);
        network.evaluate(&mut |_: &mut Network| 0.5);
        assert_eq!(Mutation::PerScalar.apply(&mut network, &config, &mut rng), 0);
        assert_eq!(network.fitness(), Some(0.5));
        assert_eq!(
            Mutation::PerUnit.apply(&mut network, &config, &mut rng),
            network.scalar_count()
        );
        assert_eq!(network.fitness(), None);
    }
}
