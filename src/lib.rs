//! Evolutionary heuristic solver for the symmetric Traveling Salesman Problem.
//!
//! Given a symmetric matrix of integer distances, the solver searches for a
//! short closed tour visiting every city exactly once. It is a metaheuristic:
//! results are good, not provably optimal.
//!
//! - [`DistanceMatrix`]: validated, immutable problem input
//! - [`evo`]: the evolutionary engine (tours, population, loop)
//! - [`random`]: seeded random sources for reproducible runs
//!
//! # Example
//!
//! ```
//! use u_tsp_ga::{solve, DistanceMatrix, EvolutionConfig};
//!
//! let m = DistanceMatrix::new(vec![
//!     vec![0, 10, 15, 20],
//!     vec![10, 0, 35, 25],
//!     vec![15, 35, 0, 30],
//!     vec![20, 25, 30, 0],
//! ]).unwrap();
//!
//! let config = EvolutionConfig::default()
//!     .with_population_size(10)
//!     .with_generations(50)
//!     .with_seed(42);
//!
//! let result = solve(&m, &config).unwrap();
//! println!("best: {} via {:?}", result.best_cost, result.best.cities());
//! ```

pub mod error;
pub mod evo;
pub mod matrix;
pub mod random;

pub use error::{TspError, TspResult};
pub use evo::{
    solve, EvolutionConfig, EvolutionLoop, EvolutionResult, Population, PopulationSnapshot, Tour,
};
pub use matrix::DistanceMatrix;
