//! Error types for the genetic algorithm core.

use thiserror::Error;

/// Errors raised while building or running a [`NeuralNetwork`](super::network::NeuralNetwork).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    /// A topology needs at least an input and an output layer.
    #[error("topology needs at least 2 layers, got {count}")]
    TooFewLayers {
        /// Number of layers supplied.
        count: usize,
    },
    /// Every layer must hold at least one neuron.
    #[error("layer {index} has no neurons")]
    EmptyLayer {
        /// Position of the empty layer.
        index: usize,
    },
    /// A weight matrix or bias vector does not match the adjacent layer sizes.
    #[error("layer transition {index} has weights {weights:?} and {biases} biases")]
    LayerShape {
        /// Position of the offending transition.
        index: usize,
        /// Shape of the weight matrix as (rows, cols).
        weights: (usize, usize),
        /// Length of the bias vector.
        biases: usize,
    },
    /// The forward pass was given the wrong number of inputs.
    #[error("expected {expected} inputs, got {actual}")]
    InputLength {
        /// Width of the input layer.
        expected: usize,
        /// Length of the supplied input slice.
        actual: usize,
    },
    /// Control derivation needs a speed and a turning output.
    #[error("control derivation needs {needed} outputs, network has {actual}")]
    TooFewOutputs {
        /// Minimum output width.
        needed: usize,
        /// Actual output width.
        actual: usize,
    },
    /// Mutation probability or magnitude out of range.
    #[error("invalid mutation arguments: chance {chance}, magnitude {magnitude}")]
    InvalidMutation {
        /// Probability that was passed.
        chance: f32,
        /// Magnitude that was passed.
        magnitude: f32,
    },
    /// Crossover parents must share a topology.
    #[error("parents have different topologies: {left:?} vs {right:?}")]
    ParentMismatch {
        /// Topology of the first parent.
        left: Vec<usize>,
        /// Topology of the second parent.
        right: Vec<usize>,
    },
}

/// Errors raised by the [`EvolutionEngine`](super::engine::EvolutionEngine).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvolutionError {
    /// The engine configuration is not usable.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    /// An outcome was reported while no individual was being evaluated.
    #[error("outcome reported but no individual is pending evaluation")]
    NoPendingIndividual,
    /// Fitness must be a finite number so the population can be ranked.
    #[error("fitness must be finite, got {0}")]
    NonFiniteFitness(f32),
    /// Fitness above the bound would flood the gene pool with entries.
    #[error("fitness {fitness} exceeds the maximum of {max}")]
    FitnessTooLarge {
        /// Reported fitness.
        fitness: f32,
        /// Largest accepted fitness.
        max: f32,
    },
    /// The network handed back does not have the engine's topology.
    #[error("reported network has topology {actual:?}, engine uses {expected:?}")]
    TopologyMismatch {
        /// Engine topology.
        expected: Vec<usize>,
        /// Topology of the returned network.
        actual: Vec<usize>,
    },
    /// A network operation failed.
    #[error(transparent)]
    Network(#[from] NetworkError),
}
