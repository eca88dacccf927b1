//! Error types for the TSP solver.
//!
//! Every entity validates its input once, at construction. After that its
//! invariants are assumed and never re-checked inside the search loops.

use thiserror::Error;

/// Result type alias for solver operations.
pub type TspResult<T> = Result<T, TspError>;

/// Malformed input or a degenerate runtime state.
///
/// There is no transient failure class: the solver is a pure computation,
/// so none of these are worth retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TspError {
    // ===== Distance matrix =====
    /// The matrix has no cities.
    #[error("distance matrix must contain at least one city")]
    EmptyMatrix,

    /// A row has the wrong number of columns.
    #[error("distance matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Its length.
        len: usize,
        /// Number of rows in the matrix.
        expected: usize,
    },

    /// `dist[i][j] != dist[j][i]`.
    #[error("distance matrix is not symmetric: dist[{i}][{j}] = {forward}, dist[{j}][{i}] = {backward}")]
    Asymmetric {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
        /// `dist[i][j]`.
        forward: u64,
        /// `dist[j][i]`.
        backward: u64,
    },

    /// `dist[i][i] != 0`.
    #[error("distance matrix diagonal must be zero: dist[{index}][{index}] = {value}")]
    NonZeroDiagonal {
        /// City index.
        index: usize,
        /// The non-zero self distance.
        value: u64,
    },

    /// Random generation bounds are inverted.
    #[error("invalid distance range: min {min} exceeds max {max}")]
    InvalidDistanceRange {
        /// Lower bound.
        min: u64,
        /// Upper bound.
        max: u64,
    },

    /// Some tour over this matrix could cost more than `u64::MAX`.
    #[error("distances up to {max} over {size} cities can overflow a tour cost")]
    DistanceOverflow {
        /// Number of cities (edges per tour).
        size: usize,
        /// Largest distance.
        max: u64,
    },

    /// `size * size` entries cannot be addressed.
    #[error("a {size}-city matrix is too large to allocate")]
    MatrixTooLarge {
        /// Requested number of cities.
        size: usize,
    },

    // ===== Tours =====
    /// A tour's length differs from the matrix size.
    #[error("tour has {actual} cities, matrix has {expected}")]
    LengthMismatch {
        /// Matrix size.
        expected: usize,
        /// Sequence length.
        actual: usize,
    },

    /// A city index is not below the matrix size.
    #[error("city {city} is out of range for a {size}-city matrix")]
    CityOutOfRange {
        /// Offending index.
        city: usize,
        /// Matrix size.
        size: usize,
    },

    /// A city occurs more than once.
    #[error("city {city} appears more than once in the tour")]
    DuplicateCity {
        /// Offending index.
        city: usize,
    },

    /// A tour evaluated against a different matrix than its population.
    #[error("tour was built against a different distance matrix")]
    MatrixMismatch,

    // ===== Population / evolution =====
    /// Population size zero, or the best of an empty population was requested.
    #[error("population must contain at least one tour")]
    EmptyPopulation,

    /// Mutation probability is NaN or outside `[0, 1]`.
    #[error("mutation probability must be within [0, 1], got {0}")]
    InvalidMutationProbability(f64),
}
