use std::error::Error;
use std::fmt;

/// An error type indicating that a topology,
/// network parameters or an engine configuration
/// were rejected at construction time.
#[derive(Clone, PartialEq, Debug)]
pub enum ConfigError {
    /// The topology has fewer than two layers.
    TooFewLayers(usize),
    /// The layer at the given position has no units.
    EmptyLayer(usize),
    /// The population cannot supply three distinct
    /// individuals per iteration.
    PopulationTooSmall(usize),
    /// The number of parameter tensors does not match
    /// the topology's transition count.
    TransitionCountMismatch { expected: usize, found: usize },
    /// A parameter tensor does not match the topology.
    /// Contains the transition index, the expected
    /// and the found length.
    ShapeMismatch {
        transition: usize,
        expected: usize,
        found: usize,
    },
    /// A first-layer scale value is zero, negative or not finite.
    /// Contains the transition-0 unit and input indices.
    NonPositiveScale(usize, usize),
    /// A variant ratio is negative, not finite, or all zero.
    InvalidRatio(&'static str),
    /// A probability lies outside `[0, 1]`.
    InvalidProbability(f64),
    /// A mutation magnitude factor is negative or not finite.
    InvalidFactor(f64),
    /// The convergence threshold is NaN.
    InvalidEpsilon,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewLayers(n) => {
                write!(f, "topology needs at least 2 layers, {} given", n)
            }
            Self::EmptyLayer(i) => write!(f, "topology layer {} has no units", i),
            Self::PopulationTooSmall(n) => write!(
                f,
                "population size {} is too small, at least 3 individuals are required",
                n
            ),
            Self::TransitionCountMismatch { expected, found } => write!(
                f,
                "expected parameters for {} transitions, found {}",
                expected, found
            ),
            Self::ShapeMismatch {
                transition,
                expected,
                found,
            } => write!(
                f,
                "parameter shape mismatch in transition {}: expected length {}, found {}",
                transition, expected, found
            ),
            Self::NonPositiveScale(unit, input) => write!(
                f,
                "first-layer scale of unit {} for input {} must be positive and finite",
                unit, input
            ),
            Self::InvalidRatio(name) => write!(
                f,
                "{} ratio must be non-negative, finite and not all zero",
                name
            ),
            Self::InvalidProbability(p) => {
                write!(f, "probability {} is outside the range [0, 1]", p)
            }
            Self::InvalidFactor(x) => {
                write!(f, "mutation factor {} must be non-negative and finite", x)
            }
            Self::InvalidEpsilon => write!(f, "convergence epsilon must not be NaN"),
        }
    }
}

impl Error for ConfigError {}
