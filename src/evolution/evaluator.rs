//! The seam between the engine and whatever evaluates its networks.

use super::network::NeuralNetwork;

/// Receives the network that should drive the next evaluation run.
///
/// The engine calls [`assign_network`](Evaluator::assign_network) once when
/// the population is created and once after every reported outcome. The
/// evaluator owns the network for the length of the run and hands it back
/// through [`EvolutionEngine::report_outcome`](super::engine::EvolutionEngine::report_outcome).
pub trait Evaluator {
    /// Takes ownership of the network to evaluate next.
    fn assign_network(&mut self, network: NeuralNetwork);
}

/// A single slot holding the most recently assigned network.
impl Evaluator for Option<NeuralNetwork> {
    fn assign_network(&mut self, network: NeuralNetwork) {
        *self = Some(network);
    }
}
