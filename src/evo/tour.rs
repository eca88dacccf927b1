//! Candidate tour with a cached cycle cost.
//!
//! A [`Tour`] owns its city sequence and the cost of the closed cycle it
//! describes. Every mutating method leaves the cache equal to the true cost
//! of the sequence before it returns, so [`Tour::cost`] never recomputes.

use super::operators::{is_permutation, shuffled_identity};
use crate::error::{TspError, TspResult};
use crate::matrix::DistanceMatrix;
use rand::Rng;

/// A permutation of all cities plus its total cycle cost.
///
/// Borrows the shared [`DistanceMatrix`] it was built against.
///
/// # Examples
///
/// ```
/// use u_tsp_ga::{DistanceMatrix, Tour};
///
/// let m = DistanceMatrix::new(vec![
///     vec![0, 10, 15, 20],
///     vec![10, 0, 35, 25],
///     vec![15, 35, 0, 30],
///     vec![20, 25, 30, 0],
/// ]).unwrap();
///
/// let mut tour = Tour::new(vec![0, 1, 2, 3], &m).unwrap();
/// assert_eq!(tour.cost(), 95);
///
/// tour.local_improve();
/// assert_eq!(tour.cities(), &[1, 0, 2, 3]);
/// assert_eq!(tour.cost(), 80);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Tour<'m> {
    cities: Vec<usize>,
    cost: u64,
    #[cfg_attr(feature = "serde", serde(skip))]
    matrix: &'m DistanceMatrix,
}

impl<'m> Tour<'m> {
    /// Builds a tour from an explicit city sequence.
    ///
    /// The cost is computed eagerly.
    ///
    /// # Errors
    ///
    /// - [`TspError::LengthMismatch`] if `cities.len() != matrix.size()`
    /// - [`TspError::CityOutOfRange`] / [`TspError::DuplicateCity`] if the
    ///   sequence is not a permutation of `0..n`
    pub fn new(cities: Vec<usize>, matrix: &'m DistanceMatrix) -> TspResult<Self> {
        let n = matrix.size();
        if cities.len() != n {
            return Err(TspError::LengthMismatch {
                expected: n,
                actual: cities.len(),
            });
        }

        let mut seen = vec![false; n];
        for &city in &cities {
            if city >= n {
                return Err(TspError::CityOutOfRange { city, size: n });
            }
            if seen[city] {
                return Err(TspError::DuplicateCity { city });
            }
            seen[city] = true;
        }

        Ok(Self::from_permutation(cities, matrix))
    }

    /// Builds a tour from a uniformly random shuffle of `0..n`.
    pub fn random<R: Rng>(matrix: &'m DistanceMatrix, rng: &mut R) -> Self {
        Self::from_permutation(shuffled_identity(matrix.size(), rng), matrix)
    }

    /// Wraps a sequence already known to be a permutation of `0..n`.
    pub(crate) fn from_permutation(cities: Vec<usize>, matrix: &'m DistanceMatrix) -> Self {
        debug_assert!(is_permutation(&cities, matrix.size()));
        let cost = matrix.cycle_cost(&cities);
        Self {
            cities,
            cost,
            matrix,
        }
    }

    /// Cached total cycle cost.
    #[inline]
    pub fn cost(&self) -> u64 {
        self.cost
    }

    /// City sequence in visiting order.
    #[inline]
    pub fn cities(&self) -> &[usize] {
        &self.cities
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Always `false` for a tour built from a valid matrix.
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// The matrix this tour is evaluated against.
    pub fn matrix(&self) -> &'m DistanceMatrix {
        self.matrix
    }

    /// Consumes the tour, returning its sequence.
    pub fn into_cities(self) -> Vec<usize> {
        self.cities
    }

    /// Random swap mutation.
    ///
    /// With probability `probability` (compared against a uniform draw in
    /// `[0, 1)`), picks two positions independently with replacement and
    /// swaps their cities, then recomputes the full cost. The positions may
    /// coincide, which leaves the tour unchanged.
    ///
    /// Returns `true` if a swap was attempted.
    pub fn mutate<R: Rng>(&mut self, probability: f64, rng: &mut R) -> bool {
        if rng.random::<f64>() >= probability {
            return false;
        }
        let n = self.cities.len();
        let a = rng.random_range(0..n);
        let b = rng.random_range(0..n);
        self.cities.swap(a, b);
        self.cost = self.matrix.cycle_cost(&self.cities);
        true
    }

    /// Single greedy pass of position-swap hill climbing.
    ///
    /// For every pair of positions `i < j` in row-major order, swaps the
    /// cities at `i` and `j`, recomputes the full cycle cost and keeps the
    /// swap only if the cost is strictly lower than the current one;
    /// otherwise the swap is undone. Accepted swaps are visible to all later
    /// pairs. The pass is not repeated to a fixed point.
    ///
    /// This swaps city *positions*, not tour edges, so it is not 2-opt.
    ///
    /// Returns the number of accepted swaps.
    ///
    /// # Complexity
    /// O(n²) trials of O(n) each, O(n³) per call
    pub fn local_improve(&mut self) -> usize {
        let n = self.cities.len();
        let mut accepted = 0;

        for i in 0..n.saturating_sub(1) {
            for j in (i + 1)..n {
                self.cities.swap(i, j);
                let trial = self.matrix.cycle_cost(&self.cities);
                if trial < self.cost {
                    self.cost = trial;
                    accepted += 1;
                } else {
                    self.cities.swap(i, j);
                }
            }
        }

        accepted
    }
}

impl PartialEq for Tour<'_> {
    /// Tours are equal when they visit the same sequence against the same matrix.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.matrix, other.matrix) && self.cities == other.cities
    }
}

impl Eq for Tour<'_> {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn four_city() -> DistanceMatrix {
        DistanceMatrix::new(vec![
            vec![0, 10, 15, 20],
            vec![10, 0, 35, 25],
            vec![15, 35, 0, 30],
            vec![20, 25, 30, 0],
        ])
        .unwrap()
    }

    /// Independent cost recomputation, not sharing code with the matrix.
    fn brute_cost(m: &DistanceMatrix, cities: &[usize]) -> u64 {
        let n = cities.len();
        (0..n).map(|k| m.distance(cities[k], cities[(k + 1) % n])).sum()
    }

    #[test]
    fn test_new_computes_cost() {
        let m = four_city();
        let t = Tour::new(vec![0, 1, 3, 2], &m).unwrap();
        assert_eq!(t.cost(), 80);
        assert_eq!(t.len(), 4);
        assert!(!t.is_empty());
        assert_eq!(t.cities(), &[0, 1, 3, 2]);
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let m = four_city();
        assert_eq!(
            Tour::new(vec![0, 1, 2], &m).unwrap_err(),
            TspError::LengthMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_new_rejects_non_permutation() {
        let m = four_city();
        assert_eq!(
            Tour::new(vec![0, 1, 1, 2], &m).unwrap_err(),
            TspError::DuplicateCity { city: 1 }
        );
        assert_eq!(
            Tour::new(vec![0, 1, 2, 4], &m).unwrap_err(),
            TspError::CityOutOfRange { city: 4, size: 4 }
        );
    }

    #[test]
    fn test_random_tours_are_valid() {
        let m = four_city();
        let mut rng = create_rng(42);
        for _ in 0..50 {
            let t = Tour::random(&m, &mut rng);
            assert!(is_permutation(t.cities(), 4));
            assert_eq!(t.cost(), brute_cost(&m, t.cities()));
        }
    }

    #[test]
    fn test_mutate_zero_probability_is_noop() {
        let m = four_city();
        let mut rng = create_rng(42);
        let mut t = Tour::new(vec![0, 1, 2, 3], &m).unwrap();
        for _ in 0..100 {
            assert!(!t.mutate(0.0, &mut rng));
        }
        assert_eq!(t.cities(), &[0, 1, 2, 3]);
        assert_eq!(t.cost(), 95);
    }

    #[test]
    fn test_mutate_always_keeps_cache_consistent() {
        let mut rng = create_rng(7);
        let m = DistanceMatrix::random(15, 1, 100, &mut rng).unwrap();
        let mut t = Tour::random(&m, &mut rng);
        let mut changed = false;
        for _ in 0..100 {
            let before = t.cities().to_vec();
            assert!(t.mutate(1.0, &mut rng));
            changed |= t.cities() != before.as_slice();
            assert!(is_permutation(t.cities(), 15));
            assert_eq!(t.cost(), brute_cost(&m, t.cities()));
        }
        assert!(changed);
    }

    #[test]
    fn test_local_improve_takes_first_improving_swap() {
        let m = four_city();
        let mut t = Tour::new(vec![0, 1, 2, 3], &m).unwrap();
        // (0, 1) gives [1, 0, 2, 3] at cost 80, which is optimal; nothing after
        // that is strictly better.
        assert_eq!(t.local_improve(), 1);
        assert_eq!(t.cities(), &[1, 0, 2, 3]);
        assert_eq!(t.cost(), 80);
    }

    #[test]
    fn test_local_improve_rejects_equal_cost_swaps() {
        // All cycles on a uniform matrix cost the same.
        let m = DistanceMatrix::new(vec![
            vec![0, 5, 5, 5],
            vec![5, 0, 5, 5],
            vec![5, 5, 0, 5],
            vec![5, 5, 5, 0],
        ])
        .unwrap();
        let mut t = Tour::new(vec![2, 0, 3, 1], &m).unwrap();
        assert_eq!(t.local_improve(), 0);
        assert_eq!(t.cities(), &[2, 0, 3, 1]);
        assert_eq!(t.cost(), 20);
    }

    #[test]
    fn test_local_improve_degenerate_sizes() {
        let single = DistanceMatrix::new(vec![vec![0]]).unwrap();
        let mut t = Tour::new(vec![0], &single).unwrap();
        assert_eq!(t.local_improve(), 0);
        assert_eq!(t.cost(), 0);

        let pair = DistanceMatrix::new(vec![vec![0, 7], vec![7, 0]]).unwrap();
        let mut t = Tour::new(vec![1, 0], &pair).unwrap();
        assert_eq!(t.local_improve(), 0);
        assert_eq!(t.cost(), 14);
    }

    #[test]
    fn test_local_improve_idempotent_at_local_optimum() {
        let mut rng = create_rng(42);
        let m = DistanceMatrix::random(12, 1, 100, &mut rng).unwrap();
        let mut t = Tour::random(&m, &mut rng);
        while t.local_improve() > 0 {}

        let settled = t.clone();
        assert_eq!(t.local_improve(), 0);
        assert_eq!(t, settled);
        assert_eq!(t.cost(), settled.cost());
    }

    #[test]
    fn test_equality_requires_same_matrix() {
        let a = four_city();
        let b = four_city();
        let ta = Tour::new(vec![0, 1, 2, 3], &a).unwrap();
        let tb = Tour::new(vec![0, 1, 2, 3], &b).unwrap();
        assert_eq!(ta, ta.clone());
        assert_ne!(ta, tb);
    }

    proptest! {
        #[test]
        fn prop_local_improve_monotone_and_consistent(seed in any::<u64>(), n in 1usize..14) {
            let mut rng = create_rng(seed);
            let m = DistanceMatrix::random(n, 0, 50, &mut rng).unwrap();
            let mut t = Tour::random(&m, &mut rng);
            let before = t.cost();
            t.local_improve();
            prop_assert!(t.cost() <= before);
            prop_assert!(is_permutation(t.cities(), n));
            prop_assert_eq!(t.cost(), brute_cost(&m, t.cities()));
        }

        #[test]
        fn prop_mutate_preserves_permutation(seed in any::<u64>(), n in 1usize..20, p in 0.0f64..=1.0) {
            let mut rng = create_rng(seed);
            let m = DistanceMatrix::random(n, 0, 50, &mut rng).unwrap();
            let mut t = Tour::random(&m, &mut rng);
            t.mutate(p, &mut rng);
            prop_assert!(is_permutation(t.cities(), n));
            prop_assert_eq!(t.cost(), brute_cost(&m, t.cities()));
        }
    }
}
