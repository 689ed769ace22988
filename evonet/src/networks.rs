//! A Network is a fixed-topology feed-forward classifier.
//!
//! Its first layer transition is radial: each unit measures a
//! scaled L1 distance between the input and its weight vector.
//! Every later transition is affine with a sigmoid activation,
//! so the outputs of a network with hidden layers lie in `[0, 1]`.
mod layer;
mod topology;

pub use layer::{Layer, LayerKind, Unit, BIAS_SCALE, MIN_SCALE, SCALE_SCALE, WEIGHT_SCALE};
pub(crate) use layer::sample_weight;
pub use topology::Topology;

use crate::{ConfigError, Evaluator};

use rand::Rng;

use std::fmt;

/// Output values at or above this are
/// predicted as members of the class.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// A feed-forward network with owned parameters, a
/// reusable activation buffer per layer and a cached fitness.
///
/// Cloning a network deep-copies its parameters; no two
/// networks ever share a tensor.
#[derive(Clone, Debug)]
pub struct Network {
    topology: Topology,
    layers: Box<[Layer]>,
    activations: Box<[Box<[f64]>]>,
    fitness: Option<f64>,
}

impl Network {
    /// Returns a network with Gaussian-sampled parameters.
    ///
    /// Weights are drawn with standard deviation [`WEIGHT_SCALE`],
    /// first-layer scales with [`SCALE_SCALE`] (stored as positive
    /// magnitudes) and additive biases with [`BIAS_SCALE`].
    ///
    /// # Examples
    /// ```
    /// use evonet::networks::{Network, Topology};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let topology = Topology::new(vec![2, 4, 1]).unwrap();
    /// let network = Network::random(&topology, &mut StdRng::seed_from_u64(0));
    ///
    /// assert_eq!(network.layers().len(), 2);
    /// assert_eq!(network.fitness(), None);
    /// ```
    pub fn random<R: Rng + ?Sized>(topology: &Topology, rng: &mut R) -> Network {
        let layers = topology
            .transitions()
            .enumerate()
            .map(|(i, (inputs, outputs))| {
                Layer::random(LayerKind::of_transition(i), inputs, outputs, rng)
            })
            .collect();
        Network::from_layers(topology.clone(), layers)
    }

    /// Returns a network with explicitly given parameters.
    ///
    /// `weights[i][j][k]` is the weight from input `k` to unit `j`
    /// of transition `i`. `biases[i][j]` holds one scale per input
    /// for transition 0, and a single additive bias otherwise.
    ///
    /// # Errors
    /// Returns an error if any tensor's shape disagrees with
    /// the topology, or if a first-layer scale is not a
    /// positive finite number.
    ///
    /// # Examples
    /// ```
    /// use evonet::networks::{Network, Topology};
    ///
    /// let topology = Topology::new(vec![1, 1]).unwrap();
    /// let mut network = Network::from_parameters(
    ///     topology.clone(),
    ///     vec![vec![vec![0.0]]],
    ///     vec![vec![vec![1.0]]],
    /// )
    /// .unwrap();
    /// // |2 - 0| / 1 = 2, so the activation is 1 / (1 + 2).
    /// assert_eq!(network.forward(&[2.0]), &[1.0 / 3.0]);
    ///
    /// let zero_scale = Network::from_parameters(
    ///     topology,
    ///     vec![vec![vec![0.0]]],
    ///     vec![vec![vec![0.0]]],
    /// );
    /// assert!(zero_scale.is_err());
    /// ```
    pub fn from_parameters(
        topology: Topology,
        weights: Vec<Vec<Vec<f64>>>,
        biases: Vec<Vec<Vec<f64>>>,
    ) -> Result<Network, ConfigError> {
        let transition_count = topology.transition_count();
        for found in [weights.len(), biases.len()] {
            if found != transition_count {
                return Err(ConfigError::TransitionCountMismatch {
                    expected: transition_count,
                    found,
                });
            }
        }

        let mut layers = Vec::with_capacity(transition_count);
        for (i, ((inputs, outputs), (layer_weights, layer_biases))) in topology
            .transitions()
            .zip(weights.into_iter().zip(biases))
            .enumerate()
        {
            let kind = LayerKind::of_transition(i);
            check_length(i, outputs, layer_weights.len())?;
            check_length(i, outputs, layer_biases.len())?;

            let mut units = Vec::with_capacity(outputs);
            for (j, (unit_weights, unit_biases)) in
                layer_weights.into_iter().zip(layer_biases).enumerate()
            {
                check_length(i, inputs, unit_weights.len())?;
                check_length(i, kind.bias_count(inputs), unit_biases.len())?;
                if kind == LayerKind::Radial {
                    if let Some(k) = unit_biases
                        .iter()
                        .position(|s| !(s.is_finite() && *s > 0.0))
                    {
                        return Err(ConfigError::NonPositiveScale(j, k));
                    }
                }
                units.push(Unit {
                    weights: unit_weights.into(),
                    biases: unit_biases.into(),
                });
            }
            layers.push(Layer {
                kind,
                units: units.into(),
            });
        }

        Ok(Network::from_layers(topology, layers))
    }

    /// Assembles a network from already validated layers,
    /// allocating fresh activation buffers.
    pub(crate) fn from_layers(topology: Topology, layers: Vec<Layer>) -> Network {
        let activations = topology
            .sizes()
            .iter()
            .map(|&n| vec![0.0; n].into_boxed_slice())
            .collect();
        Network {
            topology,
            layers: layers.into(),
            activations,
            fitness: None,
        }
    }

    /// Computes the network's outputs for `input`.
    ///
    /// The result borrows the network's output buffer,
    /// which is overwritten by the next call.
    ///
    /// # Panics
    /// Panics if `input` does not have exactly as many
    /// values as the topology's input layer.
    ///
    /// # Examples
    /// ```
    /// use evonet::networks::{Network, Topology};
    ///
    /// fn sigmoid(x: f64) -> f64 {
    ///     1.0 / (1.0 + (-x).exp())
    /// }
    ///
    /// let topology = Topology::new(vec![1, 1, 1]).unwrap();
    /// let mut network = Network::from_parameters(
    ///     topology,
    ///     vec![vec![vec![1.0]], vec![vec![2.0]]],
    ///     vec![vec![vec![0.5]], vec![vec![-1.0]]],
    /// )
    /// .unwrap();
    ///
    /// let hidden = 1.0 / (1.0 + (3.0_f64 - 1.0).abs() / 0.5);
    /// assert_eq!(network.forward(&[3.0]), &[sigmoid(2.0 * hidden - 1.0)]);
    /// ```
    pub fn forward(&mut self, input: &[f64]) -> &[f64] {
        assert_eq!(
            input.len(),
            self.topology.input_count(),
            "input dimension does not match topology {}",
            self.topology
        );
        self.activations[0].copy_from_slice(input);

        for (i, layer) in self.layers.iter().enumerate() {
            let (computed, pending) = self.activations.split_at_mut(i + 1);
            let previous = &computed[i];
            let current = &mut pending[0];
            match layer.kind {
                LayerKind::Radial => {
                    for (activation, unit) in current.iter_mut().zip(layer.units.iter()) {
                        let distance: f64 = previous
                            .iter()
                            .zip(unit.weights.iter())
                            .zip(unit.biases.iter())
                            .map(|((x, w), s)| (x - w).abs() / s)
                            .sum();
                        *activation = 1.0 / (1.0 + distance);
                    }
                }
                LayerKind::Affine => {
                    for (activation, unit) in current.iter_mut().zip(layer.units.iter()) {
                        let sum: f64 = previous
                            .iter()
                            .zip(unit.weights.iter())
                            .map(|(x, w)| x * w)
                            .sum();
                        *activation = sigmoid(sum + unit.biases[0]);
                    }
                }
            }
        }

        &self.activations[self.layers.len()]
    }

    /// Returns the network's discrete prediction for `input`:
    /// each output is mapped to 1 if it is at least
    /// [`DECISION_THRESHOLD`], and to 0 otherwise.
    pub fn predict(&mut self, input: &[f64]) -> Vec<f64> {
        self.forward(input)
            .iter()
            .map(|&y| if y >= DECISION_THRESHOLD { 1.0 } else { 0.0 })
            .collect()
    }

    /// Evaluates the network with `evaluator`, caching
    /// and returning the resulting fitness.
    ///
    /// # Panics
    /// Panics if the evaluator returns a negative or NaN value.
    ///
    /// # Examples
    /// ```
    /// use evonet::networks::{Network, Topology};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let topology = Topology::new(vec![1, 2, 1]).unwrap();
    /// let mut network = Network::random(&topology, &mut StdRng::seed_from_u64(1));
    ///
    /// // Squared distance of the output at 0 from 1.
    /// let fitness = network.evaluate(&mut |n: &mut Network| (n.forward(&[0.0])[0] - 1.0).powi(2));
    /// assert_eq!(network.fitness(), Some(fitness));
    /// ```
    pub fn evaluate<E: Evaluator + ?Sized>(&mut self, evaluator: &mut E) -> f64 {
        let fitness = evaluator.evaluate(self);
        assert!(
            fitness >= 0.0,
            "evaluator returned an invalid fitness ({})",
            fitness
        );
        self.fitness = Some(fitness);
        fitness
    }

    /// Returns the cached fitness, or `None` if the network
    /// has not been evaluated since it was last changed.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Marks the cached fitness as stale.
    pub(crate) fn invalidate_fitness(&mut self) {
        self.fitness = None;
    }

    /// Returns the network's topology.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Returns the network's layer transitions, in order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// Total number of weights and bias entries.
    pub fn scalar_count(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|l| l.units.iter())
            .map(Unit::scalar_count)
            .sum()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fitness {
            Some(fitness) => write!(f, "Network({}, fitness: {})", self.topology, fitness),
            None => write!(f, "Network({}, unevaluated)", self.topology),
        }
    }
}

fn check_length(transition: usize, expected: usize, found: usize) -> Result<(), ConfigError> {
    if expected == found {
        Ok(())
    } else {
        Err(ConfigError::ShapeMismatch {
            transition,
            expected,
            found,
        })
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
