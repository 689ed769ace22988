use crate::networks::Network;

/// A source of fitness for networks.
///
/// Fitness is an error measure: lower is better,
/// and it must never be negative.
///
/// Closures of the form `FnMut(&mut Network) -> f64`
/// are evaluators. A [`Dataset`] evaluates networks by
/// their mean squared prediction error.
///
/// [`Dataset`]: crate::samples::Dataset
pub trait Evaluator {
    /// Returns the error of `network`, which
    /// is exclusively borrowed so its forward pass
    /// can reuse the network's activation buffers.
    fn evaluate(&mut self, network: &mut Network) -> f64;
}

impl<F> Evaluator for F
where
    F: FnMut(&mut Network) -> f64,
{
    fn evaluate(&mut self, network: &mut Network) -> f64 {
        self(network)
    }
}
