use crate::networks::{Layer, LayerKind, Network, Unit};

use rand::Rng;
use rand_distr::StandardNormal;

/// Copies each weight and bias entry from either parent
/// with equal chance.
pub(super) fn uniform_gene<R: Rng + ?Sized>(a: &Network, b: &Network, rng: &mut R) -> Network {
    combine(a, b, |_, ua, ub| Unit {
        weights: pick_each(&ua.weights, &ub.weights, rng),
        biases: pick_each(&ua.biases, &ub.biases, rng),
    })
}

/// Copies each unit, weights and biases together,
/// from either parent with equal chance.
pub(super) fn uniform_node<R: Rng + ?Sized>(a: &Network, b: &Network, rng: &mut R) -> Network {
    combine(a, b, |_, ua, ub| {
        if rng.gen_bool(0.5) {
            ua.clone()
        } else {
            ub.clone()
        }
    })
}

/// Interpolates `(1 - t) a + t b` between the parents.
/// For weights `t ~ U[0, 1)`, for bias entries `t ~ N(0, 1)`,
/// so biases may land outside the segment between the parents.
pub(super) fn blend<R: Rng + ?Sized>(a: &Network, b: &Network, rng: &mut R) -> Network {
    combine(a, b, |kind, ua, ub| Unit {
        weights: ua
            .weights
            .iter()
            .zip(ub.weights.iter())
            .map(|(wa, wb)| {
                let t: f64 = rng.gen();
                (1.0 - t) * wa + t * wb
            })
            .collect(),
        biases: ua
            .biases
            .iter()
            .zip(ub.biases.iter())
            .map(|(ba, bb)| {
                let t: f64 = rng.sample(StandardNormal);
                kind.settle_bias((1.0 - t) * ba + t * bb)
            })
            .collect(),
    })
}

/// Builds a child by combining the parents unit by unit.
fn combine<F>(a: &Network, b: &Network, mut unit_of: F) -> Network
where
    F: FnMut(LayerKind, &Unit, &Unit) -> Unit,
{
    assert_eq!(
        a.topology(),
        b.topology(),
        "crossover between networks of different topologies"
    );
    let layers = a
        .layers()
        .iter()
        .zip(b.layers())
        .map(|(la, lb)| Layer {
            kind: la.kind(),
            units: la
                .units()
                .iter()
                .zip(lb.units())
                .map(|(ua, ub)| unit_of(la.kind(), ua, ub))
                .collect(),
        })
        .collect();
    Network::from_layers(a.topology().clone(), layers)
}

fn pick_each<R: Rng + ?Sized>(a: &[f64], b: &[f64], rng: &mut R) -> Box<[f64]> {
    a.iter()
        .zip(b)
        .map(|(x, y)| if rng.gen_bool(0.5) { *x } else { *y })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networks::{Topology, MIN_SCALE};
    use rand::{rngs::StdRng, SeedableRng};

    fn parents(rng: &mut StdRng) -> (Network, Network) {
        let topology = Topology::new(vec![3, 4, 2]).unwrap();
        (
            Network::random(&topology, rng),
            Network::random(&topology, rng),
        )
    }

    fn scalars(network: &Network) -> Vec<f64> {
        network
            .layers()
            .iter()
            .flat_map(|l| l.units())
            .flat_map(|u| u.weights().iter().chain(u.biases()))
            .copied()
            .collect()
    }

    #[test]
    fn uniform_gene_takes_every_scalar_from_a_parent() {
        let mut rng = StdRng::seed_from_u64(5);
        let (a, b) = parents(&mut rng);
        let child = uniform_gene(&a, &b, &mut rng);
        let (sa, sb, sc) = (scalars(&a), scalars(&b), scalars(&child));
        assert!(sc
            .iter()
            .zip(sa.iter().zip(&sb))
            .all(|(c, (x, y))| c == x || c == y));
        // Both parents contribute with overwhelming likelihood.
        assert!(sc.iter().zip(&sa).any(|(c, x)| c == x));
        assert!(sc.iter().zip(&sb).any(|(c, y)| c == y));
    }

    #[test]
    fn uniform_node_keeps_units_whole() {
        let mut rng = StdRng::seed_from_u64(6);
        let (a, b) = parents(&mut rng);
        let child = uniform_node(&a, &b, &mut rng);
        for (i, layer) in child.layers().iter().enumerate() {
            for (j, unit) in layer.units().iter().enumerate() {
                assert!(
                    unit == &a.layers()[i].units()[j] || unit == &b.layers()[i].units()[j]
                );
            }
        }
    }

    #[test]
    fn blend_weights_stay_between_parents() {
        let mut rng = StdRng::seed_from_u64(8);
        let (a, b) = parents(&mut rng);
        let child = blend(&a, &b, &mut rng);
        for ((lc, la), lb) in child.layers().iter().zip(a.layers()).zip(b.layers()) {
            for ((uc, ua), ub) in lc.units().iter().zip(la.units()).zip(lb.units()) {
                for ((c, x), y) in uc.weights().iter().zip(ua.weights()).zip(ub.weights()) {
                    let (lo, hi) = (x.min(*y), x.max(*y));
                    assert!(*c >= lo - 1e-9 && *c <= hi + 1e-9);
                }
            }
        }
        assert!(child.layers()[0]
            .units()
            .iter()
            .flat_map(|u| u.biases())
            .all(|s| *s >= MIN_SCALE));
    }

    #[test]
    fn blend_biases_leave_the_segment() {
        // With t ~ N(0, 1), about two thirds of the interpolated
        // additive biases should fall outside [min, max].
        let mut rng = StdRng::seed_from_u64(9);
        let topology = Topology::new(vec![1, 1, 1]).unwrap();
        let mut outside = 0;
        for _ in 0..500 {
            let a = Network::random(&topology, &mut rng);
            let b = Network::random(&topology, &mut rng);
            let child = blend(&a, &b, &mut rng);
            let (x, y) = (
                a.layers()[1].units()[0].biases()[0],
                b.layers()[1].units()[0].biases()[0],
            );
            let c = child.layers()[1].units()[0].biases()[0];
            if c < x.min(y) || c > x.max(y) {
                outside += 1;
            }
        }
        assert!(outside > 50, "{}", outside);
    }
}
