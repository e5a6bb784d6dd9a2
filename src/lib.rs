//! # Evodrive - Neuroevolution of Driving Networks
//!
//! A generational genetic algorithm that evolves small feedforward neural
//! networks against a fitness signal from an external evaluation loop.
//!
//! ## Features
//!
//! - Layered feedforward networks with tanh activation
//! - Elitism plus fitness-weighted gene pool selection
//! - Uniform per-gene crossover and per-gene mutation
//! - Seedable random source for reproducible runs
//! - Headless trainer with a ring-track reference episode
//!
//! ## Core Modules
//!
//! - [`evolution::network`] - Neural network and forward pass
//! - [`evolution::engine`] - Population lifecycle and breeding
//! - [`evolution::gene_pool`] - Fitness-proportionate parent sampling
//! - [`simulation::trainer`] - Evaluation loop over an [`simulation::episode::Episode`]
//!
//! ## Example
//!
//! ```
//! use evodrive::evolution::engine::EvolutionEngine;
//! use evodrive::evolution::params::Params;
//! use evodrive::simulation::track::{RingTrack, TrackParams};
//! use evodrive::simulation::trainer::{Trainer, TrainerParams};
//!
//! let params = Params {
//!     start_population: 6,
//!     best_agent_selection: 2,
//!     number_to_cross_over: 2,
//!     seed: Some(1),
//!     ..Params::default()
//! };
//! let engine = EvolutionEngine::new(params)?;
//! let track = RingTrack::new(TrackParams::default());
//! let mut trainer = Trainer::new(engine, track, TrainerParams::default())?;
//!
//! let summary = trainer.run_generation()?;
//! assert_eq!(summary.generation, 0);
//! assert_eq!(trainer.engine().population().len(), 6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// The genetic algorithm core.
pub mod evolution {
    /// Population lifecycle: evaluation cursor, selection, crossover and mutation.
    pub mod engine;
    /// Error types for networks and the engine.
    pub mod error;
    /// The seam through which networks are handed to an evaluator.
    pub mod evaluator;
    /// Weighted multiset of survivor indices.
    pub mod gene_pool;
    /// Feedforward neural networks.
    pub mod network;
    /// Engine parameters.
    pub mod params;
    /// Per-generation fitness statistics.
    pub mod stats;
}

/// Headless evaluation of networks.
pub mod simulation {
    /// Contract between the trainer and a host simulation.
    pub mod episode;
    /// Ring track reference episode.
    pub mod track;
    /// Evaluation loop driving an episode with the engine's networks.
    pub mod trainer;
}

/// Configuration file for training runs.
pub mod config;
