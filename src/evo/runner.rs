//! Evolutionary loop execution.
//!
//! [`EvolutionLoop`] drives a [`Population`] for a fixed number of
//! generations: initialization → (select → crossover → mutate →
//! local-improve) × population size → replace → repeat.

use super::config::EvolutionConfig;
use super::population::{Population, PopulationSnapshot};
use super::tour::Tour;
use crate::error::TspResult;
use crate::matrix::DistanceMatrix;
use crate::random::create_rng;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of an evolutionary run.
#[derive(Debug, Clone)]
pub struct EvolutionResult<'m> {
    /// Best tour of the final population.
    pub best: Tour<'m>,

    /// Same as `best.cost()`.
    pub best_cost: u64,

    /// Best tour seen in any generation, including the initial one.
    ///
    /// Can be strictly better than `best`, since no tour is carried over
    /// between generations.
    pub best_ever: Tour<'m>,

    /// Number of generations executed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Costs of the initial population.
    pub initial: PopulationSnapshot,

    /// Costs of the final population.
    pub final_population: PopulationSnapshot,

    /// Best cost of each generation, starting with the initial population.
    pub best_cost_history: Vec<u64>,
}

/// Stateful evolutionary loop over one distance matrix.
///
/// # Usage
///
/// ```
/// use u_tsp_ga::{DistanceMatrix, EvolutionConfig, EvolutionLoop};
/// use u_tsp_ga::random::create_rng;
///
/// let m = DistanceMatrix::new(vec![
///     vec![0, 10, 15, 20],
///     vec![10, 0, 35, 25],
///     vec![15, 35, 0, 30],
///     vec![20, 25, 30, 0],
/// ]).unwrap();
/// let config = EvolutionConfig::default()
///     .with_population_size(10)
///     .with_generations(50);
///
/// let result = EvolutionLoop::new(&m, config, create_rng(42))
///     .unwrap()
///     .run()
///     .unwrap();
/// assert_eq!(result.best_cost, 80);
/// ```
pub struct EvolutionLoop<'m, R: Rng> {
    population: Population<'m>,
    config: EvolutionConfig,
    rng: R,
    initial: PopulationSnapshot,
    best_ever: Tour<'m>,
    best_cost_history: Vec<u64>,
}

impl<'m, R: Rng> EvolutionLoop<'m, R> {
    /// Validates `config` and builds the initial random population.
    ///
    /// `config.seed` is ignored here; the caller supplies the generator.
    /// Use [`solve`] to derive it from the seed.
    ///
    /// # Errors
    ///
    /// Any error from [`EvolutionConfig::validate`].
    pub fn new(matrix: &'m DistanceMatrix, config: EvolutionConfig, mut rng: R) -> TspResult<Self> {
        config.validate()?;

        let population = Population::new(config.population_size, matrix, &mut rng)?;
        let best_ever = population.best()?.clone();
        let mut best_cost_history = Vec::with_capacity(config.generations + 1);
        best_cost_history.push(best_ever.cost());

        Ok(Self {
            initial: population.snapshot(),
            population,
            config,
            rng,
            best_ever,
            best_cost_history,
        })
    }

    /// The current population.
    pub fn population(&self) -> &Population<'m> {
        &self.population
    }

    /// The run's configuration.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Number of generations evolved so far.
    pub fn generation(&self) -> usize {
        self.population.generation()
    }

    /// Best tour of the current population.
    pub fn best(&self) -> TspResult<&Tour<'m>> {
        self.population.best()
    }

    /// Best tour seen so far across all generations.
    pub fn best_ever(&self) -> &Tour<'m> {
        &self.best_ever
    }

    /// Cost snapshot of the current population.
    pub fn snapshot(&self) -> PopulationSnapshot {
        self.population.snapshot()
    }

    /// Evolves exactly one generation and returns its best cost.
    pub fn step(&mut self) -> TspResult<u64> {
        evolve_population(
            &mut self.population,
            self.config.mutation_probability,
            self.config.parallel,
            &mut self.rng,
        );

        let gen_best = self.population.best()?;
        let cost = gen_best.cost();
        if cost < self.best_ever.cost() {
            self.best_ever = gen_best.clone();
        }
        self.best_cost_history.push(cost);

        debug!(
            generation = self.population.generation(),
            best_cost = cost,
            best_ever = self.best_ever.cost(),
            "generation evolved"
        );
        Ok(cost)
    }

    /// Runs the remaining generations and returns the result.
    pub fn run(self) -> TspResult<EvolutionResult<'m>> {
        self.run_with_cancel(None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the loop stops
    /// before the next generation and returns the current state.
    pub fn run_with_cancel(
        mut self,
        cancel: Option<Arc<AtomicBool>>,
    ) -> TspResult<EvolutionResult<'m>> {
        info!(
            cities = self.population.matrix().size(),
            population_size = self.config.population_size,
            generations = self.config.generations,
            mutation_probability = self.config.mutation_probability,
            "evolution started"
        );

        let mut cancelled = false;
        while self.population.generation() < self.config.generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            self.step()?;
        }

        let best = self.population.best()?.clone();
        info!(
            generations = self.population.generation(),
            best_cost = best.cost(),
            best_ever = self.best_ever.cost(),
            cancelled,
            "evolution finished"
        );

        Ok(EvolutionResult {
            best_cost: best.cost(),
            best,
            best_ever: self.best_ever,
            generations: self.population.generation(),
            cancelled,
            final_population: self.population.snapshot(),
            initial: self.initial,
            best_cost_history: self.best_cost_history,
        })
    }
}

/// Runs a complete evolution with a generator derived from `config.seed`.
///
/// Without a seed one is drawn from the thread-local source and logged, so
/// any run can be replayed.
///
/// # Errors
///
/// Any error from [`EvolutionConfig::validate`].
pub fn solve<'m>(matrix: &'m DistanceMatrix, config: &EvolutionConfig) -> TspResult<EvolutionResult<'m>> {
    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, "seeded generator");
    EvolutionLoop::new(matrix, config.clone(), create_rng(seed))?.run()
}

#[cfg(feature = "parallel")]
fn evolve_population<R: Rng>(population: &mut Population<'_>, p: f64, parallel: bool, rng: &mut R) {
    if parallel {
        population.evolve_parallel(p, rng);
    } else {
        population.evolve(p, rng);
    }
}

#[cfg(not(feature = "parallel"))]
fn evolve_population<R: Rng>(population: &mut Population<'_>, p: f64, _parallel: bool, rng: &mut R) {
    population.evolve(p, rng);
}

// ============================================================================
// Tests
// ============================================================================
