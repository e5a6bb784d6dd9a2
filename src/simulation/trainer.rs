//! Headless evaluation loop connecting an [`Episode`] to the engine.

use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::episode::{Episode, EpisodeStatus};
use crate::evolution::engine::{EvolutionEngine, Outcome};
use crate::evolution::error::{EvolutionError, NetworkError};
use crate::evolution::network::NeuralNetwork;
use crate::evolution::stats::GenerationSummary;

/// Errors raised while driving evaluations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainerError {
    /// The engine has not assigned a network to evaluate.
    #[error("no network has been assigned for evaluation")]
    NoNetworkAssigned,
    /// The network rejected the episode's sensor readings.
    #[error(transparent)]
    Network(#[from] NetworkError),
    /// The engine rejected the reported outcome.
    #[error(transparent)]
    Evolution(#[from] EvolutionError),
}

/// Trainer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerParams {
    /// Steps after which a run is cut short and scored as it stands.
    pub max_evaluation_steps: u32,
}

impl Default for TrainerParams {
    fn default() -> Self {
        Self {
            max_evaluation_steps: 10_000,
        }
    }
}

/// Evaluates the engine's individuals one at a time against an episode.
#[derive(Debug)]
pub struct Trainer<E: Episode, R: Rng = ChaCha8Rng> {
    engine: EvolutionEngine<R>,
    episode: E,
    slot: Option<NeuralNetwork>,
    params: TrainerParams,
}

impl<E: Episode, R: Rng> Trainer<E, R> {
    /// Creates the initial population and readies its first individual.
    pub fn new(
        mut engine: EvolutionEngine<R>,
        episode: E,
        params: TrainerParams,
    ) -> Result<Self, TrainerError> {
        let mut slot: Option<NeuralNetwork> = None;
        engine.create_population(&mut slot)?;
        Ok(Self {
            engine,
            episode,
            slot,
            params,
        })
    }

    /// Runs the assigned individual to completion and reports its fitness.
    pub fn evaluate_current(&mut self) -> Result<Outcome, TrainerError> {
        let mut network = self.slot.take().ok_or(TrainerError::NoNetworkAssigned)?;

        self.episode.reset();
        let steps = match drive(&mut self.episode, &mut network, self.params.max_evaluation_steps) {
            Ok(steps) => steps,
            Err(err) => {
                self.slot = Some(network);
                return Err(err.into());
            }
        };

        let fitness = self.episode.fitness();
        debug!("run ended after {steps} steps with fitness {fitness:.3}");
        Ok(self.engine.report_outcome(fitness, network, &mut self.slot)?)
    }

    /// Evaluates every remaining individual of the current generation.
    pub fn run_generation(&mut self) -> Result<GenerationSummary, TrainerError> {
        loop {
            if let Outcome::Repopulated(summary) = self.evaluate_current()? {
                return Ok(summary);
            }
        }
    }

    /// Runs `generations` full generations.
    pub fn run(&mut self, generations: u32) -> Result<Vec<GenerationSummary>, TrainerError> {
        (0..generations).map(|_| self.run_generation()).collect()
    }

    /// The engine being trained.
    pub fn engine(&self) -> &EvolutionEngine<R> {
        &self.engine
    }

    /// The episode used for evaluation.
    pub fn episode(&self) -> &E {
        &self.episode
    }
}

/// Steps the episode until it finishes or `max_steps` is reached.
fn drive<E: Episode>(
    episode: &mut E,
    network: &mut NeuralNetwork,
    max_steps: u32,
) -> Result<u32, NetworkError> {
    let mut steps = 0;
    while steps < max_steps {
        let controls = network.controls(&episode.sense())?;
        steps += 1;
        if episode.advance(controls) == EpisodeStatus::Finished {
            break;
        }
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::network::Controls;
    use crate::evolution::params::Params;

    /// Never finishes on its own; fitness is the number of steps taken.
    #[derive(Debug, Default)]
    struct Endless {
        steps: u32,
        width: usize,
    }

    impl Episode for Endless {
        fn reset(&mut self) {
            self.steps = 0;
        }

        fn sense(&self) -> Vec<f32> {
            vec![0.5; self.width]
        }

        fn advance(&mut self, _controls: Controls) -> EpisodeStatus {
            self.steps += 1;
            EpisodeStatus::Running
        }

        fn fitness(&self) -> f32 {
            self.steps as f32
        }
    }

    /// Scores its first run as NaN, later runs normally.
    #[derive(Debug, Default)]
    struct Glitchy {
        runs: u32,
    }

    impl Episode for Glitchy {
        fn reset(&mut self) {
            self.runs += 1;
        }

        fn sense(&self) -> Vec<f32> {
            vec![0.1, 0.2, 0.3]
        }

        fn advance(&mut self, _controls: Controls) -> EpisodeStatus {
            EpisodeStatus::Finished
        }

        fn fitness(&self) -> f32 {
            if self.runs == 1 { f32::NAN } else { 1.0 }
        }
    }

    fn engine(layer_sizes: Vec<usize>) -> EvolutionEngine {
        EvolutionEngine::new(Params {
            start_population: 4,
            best_agent_selection: 2,
            number_to_cross_over: 2,
            layer_sizes,
            seed: Some(3),
            ..Params::default()
        })
        .unwrap()
    }

    #[test]
    fn step_limit_ends_runaway_runs() {
        let params = TrainerParams {
            max_evaluation_steps: 25,
        };
        let episode = Endless { steps: 0, width: 3 };
        let mut trainer = Trainer::new(engine(vec![3, 3, 2]), episode, params).unwrap();

        let outcome = trainer.evaluate_current().unwrap();

        assert_eq!(outcome, Outcome::Advanced { index: 1 });
        assert_eq!(trainer.engine().population()[0].fitness, 25.0);
    }

    #[test]
    fn sensor_mismatch_keeps_the_network_assigned() {
        let episode = Endless { steps: 0, width: 5 };
        let mut trainer =
            Trainer::new(engine(vec![3, 3, 2]), episode, TrainerParams::default()).unwrap();

        assert!(matches!(
            trainer.evaluate_current(),
            Err(TrainerError::Network(NetworkError::InputLength { .. }))
        ));
        assert!(trainer.slot.is_some());
    }

    #[test]
    fn rejected_outcome_keeps_the_network_assigned() {
        let mut trainer =
            Trainer::new(engine(vec![3, 3, 2]), Glitchy::default(), TrainerParams::default())
                .unwrap();

        assert!(matches!(
            trainer.evaluate_current(),
            Err(TrainerError::Evolution(EvolutionError::NonFiniteFitness(_)))
        ));
        assert!(trainer.slot.is_some());

        assert_eq!(trainer.evaluate_current().unwrap(), Outcome::Advanced { index: 1 });
        assert_eq!(trainer.engine().population()[0].fitness, 1.0);
    }
}
