//! Generational evolution engine.
//!
//! The engine is purely reactive. It hands one individual at a time to an
//! [`Evaluator`], waits for the outcome to be reported, and either advances
//! to the next individual or breeds the next generation once every
//! individual has been scored.
//!
//! Breeding runs in a fixed order:
//! 1. sort by descending fitness (ties keep population order)
//! 2. copy the top `best_agent_selection` individuals over unchanged and
//!    enter them into the gene pool weighted by fitness
//! 3. breed `number_to_cross_over` children by uniform crossover of gene
//!    pool parents
//! 4. mutate every individual past index `best_agent_selection`
//! 5. refill with random individuals up to `start_population`

use std::cmp::Ordering;

use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::error::EvolutionError;
use super::evaluator::Evaluator;
use super::gene_pool::{GenePool, MAX_FITNESS};
use super::network::NeuralNetwork;
use super::params::Params;
use super::stats::{FitnessHistory, GenerationSummary};

/// What happened in response to a reported outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The next individual of the current generation was assigned.
    Advanced {
        /// Index of the newly assigned individual.
        index: usize,
    },
    /// The generation was complete and a new one was bred.
    Repopulated(GenerationSummary),
}

/// Owns the population and runs selection, crossover and mutation.
#[derive(Debug, Clone)]
pub struct EvolutionEngine<R: Rng = ChaCha8Rng> {
    params: Params,
    population: Vec<NeuralNetwork>,
    gene_pool: GenePool,
    generation: u32,
    /// Index of the individual under evaluation, `None` before the first population.
    current: Option<usize>,
    naturally_selected: usize,
    history: FitnessHistory,
    rng: R,
}

impl EvolutionEngine<ChaCha8Rng> {
    /// Creates an engine seeded from `params.seed`, or from entropy when unset.
    pub fn new(params: Params) -> Result<Self, EvolutionError> {
        let rng = match params.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        Self::with_rng(params, rng)
    }
}

impl<R: Rng> EvolutionEngine<R> {
    /// Creates an engine drawing all randomness from `rng`.
    pub fn with_rng(params: Params, rng: R) -> Result<Self, EvolutionError> {
        params.validate()?;
        Ok(Self {
            population: Vec::with_capacity(params.start_population),
            params,
            gene_pool: GenePool::new(),
            generation: 0,
            current: None,
            naturally_selected: 0,
            history: FitnessHistory::default(),
            rng,
        })
    }

    /// Builds a random initial population and assigns individual 0.
    pub fn create_population<E: Evaluator + ?Sized>(
        &mut self,
        evaluator: &mut E,
    ) -> Result<(), EvolutionError> {
        let mut population = Vec::with_capacity(self.params.start_population);
        self.fill_random(&mut population)?;
        self.population = population;
        self.current = Some(0);

        info!(
            "created population of {} networks with topology {:?}",
            self.population.len(),
            self.params.layer_sizes
        );
        self.assign_current(evaluator);
        Ok(())
    }

    /// Records the fitness of the individual under evaluation.
    ///
    /// `network` is the individual previously assigned to the evaluator; it
    /// returns to its population slot carrying `fitness`. The next individual
    /// is then assigned, breeding a new generation first when the current one
    /// is exhausted.
    pub fn report_outcome<E: Evaluator + ?Sized>(
        &mut self,
        fitness: f32,
        mut network: NeuralNetwork,
        evaluator: &mut E,
    ) -> Result<Outcome, EvolutionError> {
        let index = self.current.ok_or(EvolutionError::NoPendingIndividual)?;
        if let Err(err) = self.check_outcome(fitness, &network) {
            // The rejected network is dropped; hand the stored copy back out.
            self.assign_current(evaluator);
            return Err(err);
        }

        network.fitness = fitness;
        self.population[index] = network;
        debug!(
            "generation {} individual {index} scored {fitness:.3}",
            self.generation
        );

        if index + 1 < self.population.len() {
            self.current = Some(index + 1);
            self.assign_current(evaluator);
            Ok(Outcome::Advanced { index: index + 1 })
        } else {
            self.repopulate(evaluator).map(Outcome::Repopulated)
        }
    }

    /// Breeds the next generation from the current fitness values and assigns
    /// its first individual.
    pub fn repopulate<E: Evaluator + ?Sized>(
        &mut self,
        evaluator: &mut E,
    ) -> Result<GenerationSummary, EvolutionError> {
        if self.population.is_empty() {
            return Err(EvolutionError::NoPendingIndividual);
        }

        self.gene_pool.clear();
        let evaluated = self.generation;
        self.generation += 1;
        self.naturally_selected = 0;

        self.sort_population();
        let mut summary = GenerationSummary::from_sorted(evaluated, &self.population);

        let mut next = self.select();
        self.cross_over(&mut next)?;
        self.mutate(&mut next)?;
        let fresh = self.fill_random(&mut next)?;

        summary.gene_pool_entries = self.gene_pool.len();
        summary.children = self.naturally_selected - self.params.best_agent_selection;
        summary.fresh = fresh;

        self.population = next;
        self.current = Some(0);

        info!(
            "generation {} done: best {:.3}, mean {:.3}, worst {:.3}, gene pool {}, children {}, fresh {}",
            summary.generation,
            summary.best,
            summary.mean,
            summary.worst,
            summary.gene_pool_entries,
            summary.children,
            summary.fresh
        );
        self.history.record(summary.clone());
        self.assign_current(evaluator);
        Ok(summary)
    }

    fn check_outcome(&self, fitness: f32, network: &NeuralNetwork) -> Result<(), EvolutionError> {
        if !fitness.is_finite() {
            return Err(EvolutionError::NonFiniteFitness(fitness));
        }
        if fitness > MAX_FITNESS {
            return Err(EvolutionError::FitnessTooLarge {
                fitness,
                max: MAX_FITNESS,
            });
        }
        if network.layer_sizes() != self.params.layer_sizes.as_slice() {
            return Err(EvolutionError::TopologyMismatch {
                expected: self.params.layer_sizes.clone(),
                actual: network.layer_sizes().to_vec(),
            });
        }
        Ok(())
    }

    fn assign_current<E: Evaluator + ?Sized>(&self, evaluator: &mut E) {
        if let Some(index) = self.current {
            evaluator.assign_network(self.population[index].clone());
        }
    }

    /// Stable, so equal fitness keeps population order. `0.0` and `-0.0`
    /// count as equal; fitness is finite, so the comparison never fails.
    fn sort_population(&mut self) {
        self.population
            .sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap_or(Ordering::Equal));
    }

    /// Copies the elites into a new population and builds the gene pool.
    fn select(&mut self) -> Vec<NeuralNetwork> {
        let mut next = Vec::with_capacity(self.params.start_population);

        for (index, individual) in self
            .population
            .iter()
            .take(self.params.best_agent_selection)
            .enumerate()
        {
            self.gene_pool.add(index, individual.fitness);

            let mut elite = individual.clone();
            elite.fitness = 0.0;
            next.push(elite);
            self.naturally_selected += 1;
        }

        next
    }

    fn cross_over(&mut self, next: &mut Vec<NeuralNetwork>) -> Result<(), EvolutionError> {
        if self.params.number_to_cross_over > 0 && self.gene_pool.distinct() == 1 {
            warn!(
                "generation {}: only one survivor in the gene pool, pairing parents sequentially",
                self.generation
            );
        }

        for pair_start in (0..self.params.number_to_cross_over).step_by(2) {
            let (a, b) = self
                .gene_pool
                .draw_distinct_pair(&mut self.rng)
                .unwrap_or((pair_start, pair_start + 1));

            let parent_a = &self.population[a];
            let parent_b = &self.population[b];
            let child1 = NeuralNetwork::crossover_uniform(parent_a, parent_b, &mut self.rng)?;
            let child2 = NeuralNetwork::crossover_uniform(parent_a, parent_b, &mut self.rng)?;

            next.push(child1);
            self.naturally_selected += 1;
            next.push(child2);
            self.naturally_selected += 1;
        }

        Ok(())
    }

    /// Elites, and the individual right after them, are left untouched.
    fn mutate(&mut self, next: &mut [NeuralNetwork]) -> Result<(), EvolutionError> {
        let (rate, magnitude) = (self.params.mutation_rate, self.params.mutation_magnitude);
        for individual in next.iter_mut().skip(self.params.best_agent_selection + 1) {
            individual.mutate(rate, magnitude, &mut self.rng)?;
        }
        Ok(())
    }

    /// Pads `population` with random networks; returns how many were added.
    fn fill_random(&mut self, population: &mut Vec<NeuralNetwork>) -> Result<usize, EvolutionError> {
        let mut added = 0;
        while population.len() < self.params.start_population {
            population.push(NeuralNetwork::new_random(
                &self.params.layer_sizes,
                &mut self.rng,
            )?);
            added += 1;
        }
        Ok(added)
    }

    /// Engine configuration.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Current population, in evaluation order.
    pub fn population(&self) -> &[NeuralNetwork] {
        &self.population
    }

    /// Index of the individual under evaluation.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The individual under evaluation, as stored by the engine.
    pub fn current_network(&self) -> Option<&NeuralNetwork> {
        self.current.map(|index| &self.population[index])
    }

    /// Number of completed generations.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Gene pool built during the last repopulation.
    pub fn gene_pool(&self) -> &GenePool {
        &self.gene_pool
    }

    /// Elites plus children produced by the last repopulation.
    pub fn naturally_selected(&self) -> usize {
        self.naturally_selected
    }

    /// Summaries of recent generations.
    pub fn history(&self) -> &FitnessHistory {
        &self.history
    }
}
