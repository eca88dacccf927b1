//! Evolution configuration.
//!
//! [`EvolutionConfig`] holds the scalar parameters of a run.

use crate::error::{TspError, TspResult};

/// Configuration for the evolutionary loop.
///
/// # Defaults
///
/// ```
/// use u_tsp_ga::EvolutionConfig;
///
/// let config = EvolutionConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.generations, 100);
/// assert!((config.mutation_probability - 0.1).abs() < 1e-12);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_tsp_ga::EvolutionConfig;
///
/// let config = EvolutionConfig::default()
///     .with_population_size(10)
///     .with_generations(50)
///     .with_mutation_probability(0.2)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionConfig {
    /// Number of tours per generation. Must be at least 1.
    pub population_size: usize,

    /// Number of generations to run. There is no early stopping; 0 returns
    /// the initial population's best.
    pub generations: usize,

    /// Probability that a child gets a swap mutation, in `[0, 1]`.
    pub mutation_probability: f64,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Whether to breed children in parallel using rayon.
    ///
    /// Only takes effect with the `parallel` feature.
    pub parallel: bool,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            mutation_probability: 0.1,
            seed: None,
            parallel: false,
        }
    }
}

impl EvolutionConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the mutation probability.
    ///
    /// Not clamped; [`validate`](Self::validate) rejects values outside `[0, 1]`.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel breeding.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`TspError::EmptyPopulation`] if `population_size == 0`
    /// - [`TspError::InvalidMutationProbability`] if the probability is NaN
    ///   or outside `[0, 1]`
    pub fn validate(&self) -> TspResult<()> {
        if self.population_size == 0 {
            return Err(TspError::EmptyPopulation);
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(TspError::InvalidMutationProbability(
                self.mutation_probability,
            ));
        }
        Ok(())
    }
}
