//! Evolutionary search engine for the symmetric TSP.
//!
//! A population of random tours is evolved for a fixed number of
//! generations. Every generation is bred from scratch: two parents are
//! drawn uniformly at random, combined by segment crossover, mutated by a
//! random swap, and refined by one greedy pass of position-swap hill
//! climbing. There is no elitism and no fitness-biased selection; selection
//! pressure comes entirely from crossover plus local improvement.
//!
//! # Key Types
//!
//! - [`Tour`]: a city permutation with its cached cycle cost
//! - [`Population`]: one generation of tours and the breeding step
//! - [`EvolutionConfig`]: run parameters (population size, generations, …)
//! - [`EvolutionLoop`]: drives the generations, exposes the current best
//! - [`EvolutionResult`]: final best tour, snapshots and history
//!
//! # Submodules
//!
//! - [`operators`]: permutation crossover and helpers on raw `&[usize]`

mod config;
pub mod operators;
mod population;
mod runner;
mod tour;

pub use config::EvolutionConfig;
pub use population::{Population, PopulationSnapshot};
pub use runner::{solve, EvolutionLoop, EvolutionResult};
pub use tour::Tour;
