use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::network::NeuralNetwork;

/// Fitness figures for one finished generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Generation that was evaluated (0 is the initial population).
    pub generation: u32,
    /// Highest fitness reported.
    pub best: f32,
    /// Mean fitness over the population.
    pub mean: f32,
    /// Lowest fitness reported.
    pub worst: f32,
    /// Gene pool entries built from the survivors.
    pub gene_pool_entries: usize,
    /// Children bred for the next generation.
    pub children: usize,
    /// Random individuals added to refill the next generation.
    pub fresh: usize,
}

impl GenerationSummary {
    /// Summarizes a population sorted by descending fitness.
    pub(crate) fn from_sorted(generation: u32, population: &[NeuralNetwork]) -> Self {
        let best = population.first().map_or(0.0, |n| n.fitness);
        let worst = population.last().map_or(0.0, |n| n.fitness);
        let mean = if population.is_empty() {
            0.0
        } else {
            population.iter().map(|n| n.fitness).sum::<f32>() / population.len() as f32
        };

        Self {
            generation,
            best,
            mean,
            worst,
            gene_pool_entries: 0,
            children: 0,
            fresh: 0,
        }
    }
}

/// Most recent generation summaries, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessHistory {
    summaries: VecDeque<GenerationSummary>,
    /// Maximum number of summaries kept.
    pub max_history: usize,
}

impl Default for FitnessHistory {
    fn default() -> Self {
        Self::new(100)
    }
}

impl FitnessHistory {
    /// Creates an empty history holding at most `max_history` summaries.
    pub fn new(max_history: usize) -> Self {
        Self {
            summaries: VecDeque::with_capacity(max_history),
            max_history,
        }
    }

    /// Appends a summary, dropping the oldest beyond capacity.
    pub fn record(&mut self, summary: GenerationSummary) {
        self.summaries.push_back(summary);
        while self.summaries.len() > self.max_history {
            self.summaries.pop_front();
        }
    }

    /// Summary of the latest finished generation.
    pub fn latest(&self) -> Option<&GenerationSummary> {
        self.summaries.back()
    }

    /// All retained summaries, oldest first.
    pub fn summaries(&self) -> &VecDeque<GenerationSummary> {
        &self.summaries
    }

    /// Best fitness seen across the retained summaries.
    pub fn best_ever(&self) -> Option<f32> {
        self.summaries.iter().map(|s| s.best).reduce(f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(generation: u32, best: f32) -> GenerationSummary {
        GenerationSummary {
            generation,
            best,
            mean: best / 2.0,
            worst: 0.0,
            gene_pool_entries: 0,
            children: 0,
            fresh: 0,
        }
    }

    #[test]
    fn history_is_bounded() {
        let mut history = FitnessHistory::new(3);
        for generation in 0..5 {
            history.record(summary(generation, generation as f32));
        }

        assert_eq!(history.summaries().len(), 3);
        assert_eq!(history.summaries()[0].generation, 2);
        assert_eq!(history.latest().map(|s| s.generation), Some(4));
        assert_eq!(history.best_ever(), Some(4.0));
    }
}
