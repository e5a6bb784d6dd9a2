//! Feedforward neural network evolved by the engine.
//!
//! A network is a plain owned value: a topology, one [`Layer`] per layer
//! transition, and a scratch buffer of activations that every forward pass
//! overwrites. It has no knowledge of the simulation that drives it.

use ndarray::{Array1, ArrayView1};
use rand::Rng;

pub mod layer;

pub use layer::Layer;

use super::error::NetworkError;

/// Number of outputs consumed by [`NeuralNetwork::controls`].
pub const CONTROL_OUTPUTS: usize = 2;

/// Driving commands derived from the two output neurons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    /// Throttle in (0, 1), the sigmoid of the first output.
    pub speed: f32,
    /// Steering in (-1, 1), the raw tanh of the second output.
    pub turning: f32,
}

/// A layered feedforward network with tanh activations and a fitness score.
#[derive(Debug, Clone)]
pub struct NeuralNetwork {
    layer_sizes: Vec<usize>,
    layers: Vec<Layer>,
    activations: Vec<Array1<f32>>,
    /// Score assigned by the last evaluation.
    pub fitness: f32,
}

impl NeuralNetwork {
    /// Creates a randomly initialized network for the given topology.
    ///
    /// Weights are drawn from [-1, 1] and biases from [-0.5, 0.5]. The input
    /// layer carries no biases.
    pub fn new_random<R: Rng>(layer_sizes: &[usize], rng: &mut R) -> Result<Self, NetworkError> {
        validate_topology(layer_sizes)?;

        let layers = layer_sizes
            .windows(2)
            .map(|pair| Layer::new_random(pair[0], pair[1], rng))
            .collect();

        Ok(Self::assemble(layer_sizes.to_vec(), layers))
    }

    /// Creates a network from explicit layers.
    ///
    /// Each layer's input width must equal the previous layer's output width
    /// and every bias vector must match its weight rows.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self, NetworkError> {
        let Some(first) = layers.first() else {
            return Err(NetworkError::TooFewLayers { count: 0 });
        };

        let mut layer_sizes = Vec::with_capacity(layers.len() + 1);
        layer_sizes.push(first.input_size());
        for (index, layer) in layers.iter().enumerate() {
            let shape_ok = layer.input_size() == layer_sizes[index]
                && layer.biases.len() == layer.output_size();
            if !shape_ok {
                return Err(NetworkError::LayerShape {
                    index,
                    weights: layer.weights.dim(),
                    biases: layer.biases.len(),
                });
            }
            layer_sizes.push(layer.output_size());
        }
        validate_topology(&layer_sizes)?;

        Ok(Self::assemble(layer_sizes, layers))
    }

    fn assemble(layer_sizes: Vec<usize>, layers: Vec<Layer>) -> Self {
        let activations = layer_sizes.iter().map(|&n| Array1::zeros(n)).collect();
        Self {
            layer_sizes,
            layers,
            activations,
            fitness: 0.0,
        }
    }

    /// Neuron counts from input to output.
    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    /// Layer transitions from input to output.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Activations left behind by the most recent forward pass.
    pub fn activations(&self) -> &[Array1<f32>] {
        &self.activations
    }

    /// Runs a forward pass and returns the output layer's activations.
    ///
    /// Inputs are copied into the input layer unmodified; every later layer
    /// applies `tanh(W · prev + b)`.
    pub fn feed_forward(&mut self, inputs: &[f32]) -> Result<&Array1<f32>, NetworkError> {
        let expected = self.layer_sizes[0];
        if inputs.len() != expected {
            return Err(NetworkError::InputLength {
                expected,
                actual: inputs.len(),
            });
        }

        self.activations[0].assign(&ArrayView1::from(inputs));
        for (i, layer) in self.layers.iter().enumerate() {
            let (prev, next) = self.activations.split_at_mut(i + 1);
            layer.forward_into(&prev[i], &mut next[0]);
        }

        Ok(&self.activations[self.activations.len() - 1])
    }

    /// Derives driving controls from a single forward pass.
    pub fn controls(&mut self, inputs: &[f32]) -> Result<Controls, NetworkError> {
        let actual = self.layer_sizes[self.layer_sizes.len() - 1];
        if actual < CONTROL_OUTPUTS {
            return Err(NetworkError::TooFewOutputs {
                needed: CONTROL_OUTPUTS,
                actual,
            });
        }

        let output = self.feed_forward(inputs)?;
        Ok(Controls {
            speed: sigmoid(output[0]),
            turning: output[1],
        })
    }

    /// Perturbs each weight and bias independently with probability `chance`.
    ///
    /// A perturbed gene receives one draw from [-magnitude, magnitude].
    pub fn mutate<R: Rng>(
        &mut self,
        chance: f32,
        magnitude: f32,
        rng: &mut R,
    ) -> Result<(), NetworkError> {
        let valid = (0.0..=1.0).contains(&chance) && magnitude.is_finite() && magnitude >= 0.0;
        if !valid {
            return Err(NetworkError::InvalidMutation { chance, magnitude });
        }

        for layer in &mut self.layers {
            layer.mutate(chance, magnitude, rng);
        }
        Ok(())
    }

    /// Creates a child whose every gene is copied from one of the two parents.
    pub fn crossover_uniform<R: Rng>(
        parent1: &NeuralNetwork,
        parent2: &NeuralNetwork,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        if parent1.layer_sizes != parent2.layer_sizes {
            return Err(NetworkError::ParentMismatch {
                left: parent1.layer_sizes.clone(),
                right: parent2.layer_sizes.clone(),
            });
        }

        let layers = parent1
            .layers
            .iter()
            .zip(&parent2.layers)
            .map(|(layer1, layer2)| Layer::crossover_uniform(layer1, layer2, rng))
            .collect();

        Ok(Self::assemble(parent1.layer_sizes.clone(), layers))
    }

    /// Total number of weights and biases.
    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| layer.weights.len() + layer.biases.len())
            .sum()
    }

    /// Flattens all genes, weights then biases for each layer in order.
    pub fn genes(&self) -> Vec<f32> {
        let mut flat = Vec::with_capacity(self.parameter_count());
        for layer in &self.layers {
            flat.extend(layer.weights.iter().copied());
            flat.extend(layer.biases.iter().copied());
        }
        flat
    }
}

/// Logistic squashing into (0, 1).
#[inline]
pub fn sigmoid(value: f32) -> f32 {
    1.0 / (1.0 + (-value).exp())
}

fn validate_topology(layer_sizes: &[usize]) -> Result<(), NetworkError> {
    if layer_sizes.len() < 2 {
        return Err(NetworkError::TooFewLayers {
            count: layer_sizes.len(),
        });
    }
    if let Some(index) = layer_sizes.iter().position(|&n| n == 0) {
        return Err(NetworkError::EmptyLayer { index });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn network(seed: u64) -> NeuralNetwork {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        NeuralNetwork::new_random(&[3, 3, 2], &mut rng).unwrap()
    }

    #[test]
    fn output_width_matches_last_layer() {
        let mut net = network(3);
        let output = net.feed_forward(&[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(output.len(), 2);
        assert!(output.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn same_seed_gives_identical_outputs() {
        let mut a = network(11);
        let mut b = network(11);
        let out_a = a.feed_forward(&[0.2, -0.7, 0.9]).unwrap().clone();
        let out_b = b.feed_forward(&[0.2, -0.7, 0.9]).unwrap().clone();
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn input_layer_is_copied_unmodified() {
        let mut net = network(5);
        net.feed_forward(&[4.0, -3.0, 0.5]).unwrap();
        assert_eq!(net.activations()[0].to_vec(), vec![4.0, -3.0, 0.5]);
    }

    #[test]
    fn wrong_input_length_fails() {
        let mut net = network(5);
        assert_eq!(
            net.feed_forward(&[1.0, 2.0]).unwrap_err(),
            NetworkError::InputLength {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn malformed_topologies_are_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            NeuralNetwork::new_random(&[3], &mut rng).unwrap_err(),
            NetworkError::TooFewLayers { count: 1 }
        );
        assert_eq!(
            NeuralNetwork::new_random(&[3, 0, 2], &mut rng).unwrap_err(),
            NetworkError::EmptyLayer { index: 1 }
        );
    }

    #[test]
    fn from_layers_checks_adjacent_shapes() {
        let good = Layer {
            weights: Array2::zeros((3, 2)),
            biases: Array1::zeros(3),
        };
        let bad = Layer {
            weights: Array2::zeros((1, 4)),
            biases: Array1::zeros(1),
        };
        let err = NeuralNetwork::from_layers(vec![good.clone(), bad]).unwrap_err();
        assert!(matches!(err, NetworkError::LayerShape { index: 1, .. }));

        let net = NeuralNetwork::from_layers(vec![good]).unwrap();
        assert_eq!(net.layer_sizes(), &[2, 3]);
    }

    #[test]
    fn controls_squash_first_output_only() {
        let layer = Layer {
            weights: Array2::zeros((2, 3)),
            biases: Array1::from_vec(vec![0.0, 0.5]),
        };
        let mut net = NeuralNetwork::from_layers(vec![layer]).unwrap();

        let controls = net.controls(&[1.0, 1.0, 1.0]).unwrap();

        assert!((controls.speed - 0.5).abs() < 1e-6);
        assert!((controls.turning - 0.5f32.tanh()).abs() < 1e-6);
    }

    #[test]
    fn controls_need_two_outputs() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut net = NeuralNetwork::new_random(&[3, 1], &mut rng).unwrap();
        assert!(matches!(
            net.controls(&[0.0, 0.0, 0.0]),
            Err(NetworkError::TooFewOutputs { .. })
        ));
    }

    #[test]
    fn zero_chance_mutation_is_a_no_op() {
        let mut net = network(9);
        let before = net.genes();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        net.mutate(0.0, 5.0, &mut rng).unwrap();
        assert_eq!(net.genes(), before);
    }

    #[test]
    fn invalid_mutation_arguments_are_rejected() {
        let mut net = network(9);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(net.mutate(1.5, 0.1, &mut rng).is_err());
        assert!(net.mutate(0.5, -0.1, &mut rng).is_err());
    }

    #[test]
    fn crossover_rejects_mismatched_parents() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let a = NeuralNetwork::new_random(&[3, 3, 2], &mut rng).unwrap();
        let b = NeuralNetwork::new_random(&[3, 4, 2], &mut rng).unwrap();
        assert!(matches!(
            NeuralNetwork::crossover_uniform(&a, &b, &mut rng),
            Err(NetworkError::ParentMismatch { .. })
        ));
    }
}
