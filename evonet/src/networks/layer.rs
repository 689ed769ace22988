use rand::Rng;
use rand_distr::StandardNormal;

/// Standard deviation of freshly sampled weights.
pub const WEIGHT_SCALE: f64 = 100.0;
/// Standard deviation of freshly sampled additive biases.
pub const BIAS_SCALE: f64 = 10.0;
/// Standard deviation of freshly sampled first-layer scales.
pub const SCALE_SCALE: f64 = 10.0;
/// Smallest magnitude a first-layer scale may take.
/// Sampled or blended scales are stored as `|s|`,
/// floored to this value.
pub const MIN_SCALE: f64 = 1e-6;

/// The activation rule of a layer transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LayerKind {
    /// Distance-based rule of the first transition:
    /// `1 / (1 + Σ |x_k - w_k| / s_k)`. Each unit carries
    /// one scale `s_k` per input.
    Radial,
    /// Affine rule of every later transition:
    /// `sigmoid(Σ x_k w_k + b)`. Each unit carries
    /// a single additive bias.
    Affine,
}

impl LayerKind {
    /// Returns the kind of the transition at `index`.
    pub fn of_transition(index: usize) -> LayerKind {
        if index == 0 {
            LayerKind::Radial
        } else {
            LayerKind::Affine
        }
    }

    /// Number of bias entries per unit, for
    /// a transition with `input_count` inputs.
    pub fn bias_count(self, input_count: usize) -> usize {
        match self {
            LayerKind::Radial => input_count,
            LayerKind::Affine => 1,
        }
    }

    /// Standard deviation used when sampling this
    /// kind's bias entries.
    pub fn bias_scale(self) -> f64 {
        match self {
            LayerKind::Radial => SCALE_SCALE,
            LayerKind::Affine => BIAS_SCALE,
        }
    }

    /// Maps a candidate bias value to the value actually stored.
    /// Radial scales are kept strictly positive; affine biases
    /// are stored unchanged.
    pub(crate) fn settle_bias(self, value: f64) -> f64 {
        match self {
            LayerKind::Radial => value.abs().max(MIN_SCALE),
            LayerKind::Affine => value,
        }
    }

    /// Samples a bias entry as `N(0, 1) × bias_scale × factor`.
    pub(crate) fn sample_bias<R: Rng + ?Sized>(self, factor: f64, rng: &mut R) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        self.settle_bias(z * self.bias_scale() * factor)
    }
}

/// Samples a weight as `N(0, 1) × WEIGHT_SCALE × factor`.
pub(crate) fn sample_weight<R: Rng + ?Sized>(factor: f64, rng: &mut R) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    z * WEIGHT_SCALE * factor
}

/// The parameters of a single output unit:
/// one weight per input, and its bias entries.
#[derive(Clone, PartialEq, Debug)]
pub struct Unit {
    pub(crate) weights: Box<[f64]>,
    pub(crate) biases: Box<[f64]>,
}

impl Unit {
    pub(crate) fn random<R: Rng + ?Sized>(
        kind: LayerKind,
        input_count: usize,
        rng: &mut R,
    ) -> Unit {
        let mut unit = Unit {
            weights: vec![0.0; input_count].into(),
            biases: vec![0.0; kind.bias_count(input_count)].into(),
        };
        unit.resample(kind, 1.0, rng);
        unit
    }

    /// Resamples every weight and bias entry of the unit.
    pub(crate) fn resample<R: Rng + ?Sized>(&mut self, kind: LayerKind, factor: f64, rng: &mut R) {
        for w in self.weights.iter_mut() {
            *w = sample_weight(factor, rng);
        }
        for b in self.biases.iter_mut() {
            *b = kind.sample_bias(factor, rng);
        }
    }

    /// The unit's weights, one per input.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// The unit's bias entries: per-input scales for
    /// a radial unit, a single bias for an affine one.
    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    /// Total number of scalars held by the unit.
    pub fn scalar_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }
}

/// The parameters of one layer transition.
#[derive(Clone, PartialEq, Debug)]
pub struct Layer {
    pub(crate) kind: LayerKind,
    pub(crate) units: Box<[Unit]>,
}

impl Layer {
    pub(crate) fn random<R: Rng + ?Sized>(
        kind: LayerKind,
        input_count: usize,
        output_count: usize,
        rng: &mut R,
    ) -> Layer {
        Layer {
            kind,
            units: (0..output_count)
                .map(|_| Unit::random(kind, input_count, rng))
                .collect(),
        }
    }

    /// The layer's activation rule.
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// The layer's output units, in order.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Number of inputs feeding each unit.
    pub fn input_count(&self) -> usize {
        self.units.first().map_or(0, |u| u.weights.len())
    }
}
