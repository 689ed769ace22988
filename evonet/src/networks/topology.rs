use crate::ConfigError;

use serde::{Deserialize, Serialize};

use std::convert::TryFrom;
use std::fmt;

/// The ordered layer sizes of a network, from
/// the input layer to the output layer.
///
/// A topology always has at least two layers,
/// none of them empty.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Topology(Box<[usize]>);

impl Topology {
    /// Returns a topology with the given layer sizes.
    ///
    /// # Errors
    /// Returns an error if fewer than two sizes are
    /// given, or any of them is zero.
    ///
    /// # Examples
    /// ```
    /// use evonet::networks::Topology;
    ///
    /// let topology = Topology::new(vec![2, 8, 3]).unwrap();
    /// assert_eq!(topology.input_count(), 2);
    /// assert_eq!(topology.output_count(), 3);
    /// assert_eq!(topology.transition_count(), 2);
    ///
    /// assert!(Topology::new(vec![4]).is_err());
    /// assert!(Topology::new(vec![4, 0, 1]).is_err());
    /// ```
    pub fn new(sizes: Vec<usize>) -> Result<Topology, ConfigError> {
        if sizes.len() < 2 {
            return Err(ConfigError::TooFewLayers(sizes.len()));
        }
        if let Some(i) = sizes.iter().position(|&n| n == 0) {
            return Err(ConfigError::EmptyLayer(i));
        }
        Ok(Topology(sizes.into_boxed_slice()))
    }

    /// Number of units in the input layer.
    pub fn input_count(&self) -> usize {
        self.0[0]
    }

    /// Number of units in the output layer.
    pub fn output_count(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    /// All layer sizes, input layer first.
    pub fn sizes(&self) -> &[usize] {
        &self.0
    }

    /// Number of layer-to-layer transitions,
    /// i.e. of weight matrices in a network.
    pub fn transition_count(&self) -> usize {
        self.0.len() - 1
    }

    /// Iterates over `(input_count, output_count)`
    /// pairs of every transition, in order.
    pub fn transitions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }
}

impl Default for Topology {
    fn default() -> Topology {
        Topology(vec![2, 8, 3].into_boxed_slice())
    }
}

impl TryFrom<Vec<usize>> for Topology {
    type Error = ConfigError;

    fn try_from(sizes: Vec<usize>) -> Result<Topology, ConfigError> {
        Topology::new(sizes)
    }
}

impl From<Topology> for Vec<usize> {
    fn from(topology: Topology) -> Vec<usize> {
        topology.0.into_vec()
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sizes: Vec<String> = self.0.iter().map(usize::to_string).collect();
        write!(f, "{}", sizes.join("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_single_layer() {
        assert_eq!(Topology::new(vec![3]), Err(ConfigError::TooFewLayers(1)));
        assert_eq!(Topology::new(vec![]), Err(ConfigError::TooFewLayers(0)));
    }

    #[test]
    fn rejects_empty_layer() {
        assert_eq!(Topology::new(vec![2, 4, 0]), Err(ConfigError::EmptyLayer(2)));
    }

    #[test]
    fn transitions() {
        let topology = Topology::new(vec![2, 4, 3, 1]).unwrap();
        assert_eq!(
            topology.transitions().collect::<Vec<_>>(),
            vec![(2, 4), (4, 3), (3, 1)]
        );
        assert_eq!(topology.to_string(), "2-4-3-1");
    }

    #[test]
    fn deserialization_is_validated() {
        let topology: Topology = serde_json::from_str("[2, 4, 1]").unwrap();
        assert_eq!(topology.sizes(), &[2, 4, 1]);
        assert!(serde_json::from_str::<Topology>("[2]").is_err());
        assert!(serde_json::from_str::<Topology>("[2, 0, 1]").is_err());
        assert_eq!(serde_json::to_string(&topology).unwrap(), "[2,4,1]");
    }
}
