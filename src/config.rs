//! Configuration file for training runs.
//!
//! A JSON document with one optional section per component; missing sections
//! and fields take their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::evolution::error::EvolutionError;
use crate::evolution::params::Params;
use crate::simulation::track::{SENSOR_COUNT, TrackParams};
use crate::simulation::trainer::TrainerParams;

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid configuration JSON.
    #[error("cannot parse config: {0}")]
    Json(#[from] serde_json::Error),
    /// The evolution section is unusable.
    #[error(transparent)]
    Evolution(#[from] EvolutionError),
    /// The track section is unusable.
    #[error("invalid track: {0}")]
    Track(String),
}

/// Complete configuration of a training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Genetic algorithm settings.
    pub evolution: Params,
    /// Ring track settings.
    pub track: TrackParams,
    /// Evaluation loop settings.
    pub trainer: TrainerParams,
}

impl Config {
    /// Loads and validates a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every section, including that the network fits the track's
    /// sensors and controls.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.evolution.validate()?;
        self.track.validate().map_err(ConfigError::Track)?;

        let sizes = &self.evolution.layer_sizes;
        let inputs = sizes[0];
        let outputs = sizes[sizes.len() - 1];
        if inputs != SENSOR_COUNT || outputs < 2 {
            return Err(ConfigError::Track(format!(
                "network {sizes:?} needs {SENSOR_COUNT} inputs and at least 2 outputs"
            )));
        }
        Ok(())
    }
}
