use serde::{Deserialize, Serialize};

use super::error::EvolutionError;

/// Parameters that control the generational genetic algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Population size of every generation.
    pub start_population: usize,
    /// Per-gene mutation probability applied to offspring.
    pub mutation_rate: f32,
    /// Largest perturbation a single mutation can apply.
    pub mutation_magnitude: f32,
    /// Number of top individuals carried over unchanged (elitism).
    pub best_agent_selection: usize,
    /// Number of children bred per generation. Must be even.
    pub number_to_cross_over: usize,
    /// Network topology, input width first and control outputs last.
    pub layer_sizes: Vec<usize>,
    /// Seed for the engine's random source. Entropy is used when absent.
    pub seed: Option<u64>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            start_population: 85,
            mutation_rate: 0.25,
            mutation_magnitude: 0.1,
            best_agent_selection: 4,
            number_to_cross_over: 16,
            layer_sizes: vec![3, 3, 2],
            seed: None,
        }
    }
}

impl Params {
    /// Checks that a population of this shape can be created and refilled.
    pub fn validate(&self) -> Result<(), EvolutionError> {
        let invalid = |reason: String| Err(EvolutionError::InvalidParams(reason));

        if self.start_population == 0 {
            return invalid("start_population must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return invalid(format!(
                "mutation_rate must lie in [0, 1], got {}",
                self.mutation_rate
            ));
        }
        if !self.mutation_magnitude.is_finite() || self.mutation_magnitude < 0.0 {
            return invalid(format!(
                "mutation_magnitude must be finite and non-negative, got {}",
                self.mutation_magnitude
            ));
        }
        if self.number_to_cross_over % 2 != 0 {
            return invalid(format!(
                "number_to_cross_over must be even, got {}",
                self.number_to_cross_over
            ));
        }
        if self.best_agent_selection + self.number_to_cross_over > self.start_population {
            return invalid(format!(
                "best_agent_selection ({}) + number_to_cross_over ({}) exceeds start_population ({})",
                self.best_agent_selection, self.number_to_cross_over, self.start_population
            ));
        }
        if self.layer_sizes.len() < 2 {
            return invalid(format!(
                "layer_sizes needs at least 2 layers, got {}",
                self.layer_sizes.len()
            ));
        }
        if self.layer_sizes.contains(&0) {
            return invalid(format!(
                "layer_sizes must all be positive, got {:?}",
                self.layer_sizes
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Params::default().validate().is_ok());
    }

    #[test]
    fn odd_crossover_count_is_rejected() {
        let params = Params {
            number_to_cross_over: 3,
            ..Params::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn oversubscribed_population_is_rejected() {
        let params = Params {
            start_population: 10,
            best_agent_selection: 4,
            number_to_cross_over: 8,
            ..Params::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn bad_topology_is_rejected() {
        for layer_sizes in [vec![3], vec![3, 0, 2]] {
            let params = Params {
                layer_sizes,
                ..Params::default()
            };
            assert!(params.validate().is_err());
        }
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let params: Params =
            serde_json::from_str(r#"{ "start_population": 12, "seed": 7 }"#).unwrap();
        assert_eq!(params.start_population, 12);
        assert_eq!(params.seed, Some(7));
        assert_eq!(params.layer_sizes, vec![3, 3, 2]);
    }
}
