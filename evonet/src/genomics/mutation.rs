use crate::networks::{sample_weight, Network};

use rand::Rng;

/// Resamples each weight and bias entry independently
/// with chance `probability`. Returns the number of
/// resampled scalars.
pub(super) fn per_scalar<R: Rng + ?Sized>(
    network: &mut Network,
    probability: f64,
    factor: f64,
    rng: &mut R,
) -> usize {
    let mut resampled = 0;
    for layer in network.layers_mut() {
        let kind = layer.kind;
        for unit in layer.units.iter_mut() {
            for w in unit.weights.iter_mut() {
                if rng.gen_bool(probability) {
                    *w = sample_weight(factor, rng);
                    resampled += 1;
                }
            }
            for b in unit.biases.iter_mut() {
                if rng.gen_bool(probability) {
                    *b = kind.sample_bias(factor, rng);
                    resampled += 1;
                }
            }
        }
    }
    resampled
}

/// Resamples whole units, weights and bias entries
/// together, each with chance `probability`. Returns the
/// number of resampled scalars.
pub(super) fn per_unit<R: Rng + ?Sized>(
    network: &mut Network,
    probability: f64,
    factor: f64,
    rng: &mut R,
) -> usize {
    let mut resampled = 0;
    for layer in network.layers_mut() {
        let kind = layer.kind;
        for unit in layer.units.iter_mut() {
            if rng.gen_bool(probability) {
                unit.resample(kind, factor, rng);
                resampled += unit.scalar_count();
            }
        }
    }
    resampled
}
