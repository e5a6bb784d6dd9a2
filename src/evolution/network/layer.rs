//! A single fully connected layer transition.

use ndarray::{Array1, Array2};
use rand::Rng;

/// Uniform range for freshly initialized biases.
pub const BIAS_RANGE: f32 = 0.5;
/// Uniform range for freshly initialized weights.
pub const WEIGHT_RANGE: f32 = 1.0;

/// Weights and biases feeding one layer from the layer before it.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Layer {
    /// Creates a layer with weights in [-1, 1] and biases in [-0.5, 0.5].
    pub fn new_random<R: Rng>(input_size: usize, output_size: usize, rng: &mut R) -> Self {
        Self {
            weights: Array2::from_shape_fn((output_size, input_size), |_| {
                rng.random_range(-WEIGHT_RANGE..=WEIGHT_RANGE)
            }),
            biases: Array1::from_shape_fn(output_size, |_| {
                rng.random_range(-BIAS_RANGE..=BIAS_RANGE)
            }),
        }
    }

    /// Number of neurons this layer reads from.
    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Number of neurons this layer writes to.
    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Writes `tanh(W · inputs + b)` into `output`.
    #[inline]
    pub fn forward_into(&self, inputs: &Array1<f32>, output: &mut Array1<f32>) {
        output.assign(&self.weights.dot(inputs));
        *output += &self.biases;
        output.mapv_inplace(f32::tanh);
    }

    /// Adds noise from [-magnitude, magnitude] to each gene with probability `chance`.
    ///
    /// Every gene is visited exactly once.
    pub fn mutate<R: Rng>(&mut self, chance: f32, magnitude: f32, rng: &mut R) {
        let mut perturb = |gene: &mut f32| {
            if rng.random::<f32>() < chance {
                *gene += rng.random_range(-magnitude..=magnitude);
            }
        };
        self.biases.iter_mut().for_each(&mut perturb);
        self.weights.iter_mut().for_each(&mut perturb);
    }

    /// Builds a child layer taking every gene from one parent on a fair coin flip.
    ///
    /// Callers guarantee both parents have the same shape.
    pub fn crossover_uniform<R: Rng>(parent1: &Layer, parent2: &Layer, rng: &mut R) -> Self {
        Self {
            weights: Array2::from_shape_fn(parent1.weights.dim(), |idx| {
                if rng.random_bool(0.5) {
                    parent1.weights[idx]
                } else {
                    parent2.weights[idx]
                }
            }),
            biases: Array1::from_shape_fn(parent1.biases.len(), |idx| {
                if rng.random_bool(0.5) {
                    parent1.biases[idx]
                } else {
                    parent2.biases[idx]
                }
            }),
        }
    }
}
