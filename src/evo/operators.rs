//! Permutation operators used by the evolutionary engine.
//!
//! These operate on plain `&[usize]` city sequences; [`Tour`](super::Tour)
//! and [`Population`](super::Population) wrap them with cost bookkeeping.
//!
//! # Crossover
//!
//! - [`segment_crossover`]: copy a random block from parent1 in place, fill
//!   the gaps left-to-right with the remaining cities in parent2's order
//!
//! # Helpers
//!
//! - [`random_segment`]: inclusive `[start, end]` interval, `start <= end`
//! - [`shuffled_identity`]: uniformly random permutation of `0..n`

use rand::seq::SliceRandom;
use rand::Rng;

/// Marks a child position that has not been filled yet.
const UNSET: usize = usize::MAX;

/// Segment-preserving crossover for permutations.
///
/// # Algorithm
///
/// 1. Draw an inclusive segment `[start, end]` (see [`random_segment`])
/// 2. Copy `parent1[start..=end]` into the child at the same positions
/// 3. Walk `parent2` in order; every city not yet in the child goes into the
///    lowest-index unset position
///
/// Unlike classic OX, the fill starts at position 0 rather than after the
/// segment, so the child is exactly the segment plus the other cities in
/// parent2's relative order around it.
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if parents have different lengths or are empty.
pub fn segment_crossover<R: Rng>(parent1: &[usize], parent2: &[usize], rng: &mut R) -> Vec<usize> {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    assert!(n > 0, "parents must not be empty");

    let (start, end) = random_segment(n, rng);
    segment_crossover_at(parent1, parent2, start, end)
}

/// Deterministic core of [`segment_crossover`] for a fixed segment.
///
/// # Panics
/// Panics if `start > end`, `end >= parent1.len()`, or the parents are not
/// permutations of the same `0..n`.
pub fn segment_crossover_at(
    parent1: &[usize],
    parent2: &[usize],
    start: usize,
    end: usize,
) -> Vec<usize> {
    let n = parent1.len();
    assert!(start <= end && end < n, "segment [{start}, {end}] out of 0..{n}");

    let mut child = vec![UNSET; n];
    let mut present = vec![false; n];

    for i in start..=end {
        child[i] = parent1[i];
        present[parent1[i]] = true;
    }

    // Gaps are filled in increasing index order; the cursor never moves back.
    let mut cursor = 0;
    for &city in parent2 {
        if present[city] {
            continue;
        }
        while child[cursor] != UNSET {
            cursor += 1;
        }
        child[cursor] = city;
        present[city] = true;
    }

    child
}

/// Pick a random segment `[start, end]` within `0..n` where `start <= end`.
///
/// Both endpoints are drawn independently and swapped if needed, so a
/// single-position segment (`start == end`) is possible.
pub fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A uniformly random permutation of `0..n`.
pub fn shuffled_identity<R: Rng>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..n).collect();
    perm.shuffle(rng);
    perm
}

/// Returns `true` if `perm` contains every value of `0..n` exactly once.
pub fn is_permutation(perm: &[usize], n: usize) -> bool {
    if perm.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &v in perm {
        if v >= n || seen[v] {
            return false;
        }
        seen[v] = true;
    }
    true
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    #[test]
    fn test_fixed_segment_fills_from_front() {
        let p1 = vec![0, 1, 2, 3, 4];
        let p2 = vec![4, 3, 2, 1, 0];
        // Block [1, 2] = {1, 2}; remaining in p2 order: 4, 3, 0.
        assert_eq!(segment_crossover_at(&p1, &p2, 1, 2), vec![4, 1, 2, 3, 0]);
    }

    #[test]
    fn test_fixed_segment_at_end() {
        let p1 = vec![3, 0, 4, 1, 2];
        let p2 = vec![0, 1, 2, 3, 4];
        assert_eq!(segment_crossover_at(&p1, &p2, 3, 4), vec![0, 3, 4, 1, 2]);
    }

    #[test]
    fn test_single_position_segment() {
        let p1 = vec![2, 0, 1];
        let p2 = vec![0, 1, 2];
        assert_eq!(segment_crossover_at(&p1, &p2, 1, 1), vec![1, 0, 2]);
    }

    #[test]
    fn test_full_segment_copies_parent1() {
        let p1 = vec![2, 0, 3, 1];
        let p2 = vec![0, 1, 2, 3];
        assert_eq!(segment_crossover_at(&p1, &p2, 0, 3), p1);
    }

    #[test]
    fn test_self_crossover_reproduces_parent() {
        let mut rng = create_rng(42);
        let p = vec![5, 2, 7, 0, 1, 6, 3, 4];
        for _ in 0..50 {
            assert_eq!(segment_crossover(&p, &p, &mut rng), p);
        }
    }

    #[test]
    fn test_single_city() {
        let mut rng = create_rng(42);
        assert_eq!(segment_crossover(&[0], &[0], &mut rng), vec![0]);
    }

    #[test]
    fn test_random_segment_bounds() {
        let mut rng = create_rng(42);
        let mut saw_single = false;
        for _ in 0..1000 {
            let (start, end) = random_segment(10, &mut rng);
            assert!(start <= end);
            assert!(end < 10);
            saw_single |= start == end;
        }
        assert!(saw_single, "start == end should be reachable");
    }

    #[test]
    fn test_shuffled_identity_is_permutation() {
        let mut rng = create_rng(42);
        for n in [1, 2, 5, 30] {
            let perm = shuffled_identity(n, &mut rng);
            assert!(is_permutation(&perm, n), "{perm:?}");
        }
    }

    #[test]
    fn test_is_permutation_rejects() {
        assert!(!is_permutation(&[0, 0], 2));
        assert!(!is_permutation(&[0, 2], 2));
        assert!(!is_permutation(&[0], 2));
        assert!(is_permutation(&[], 0));
    }

    fn two_parents() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
        (1usize..40).prop_flat_map(|n| {
            let base: Vec<usize> = (0..n).collect();
            (
                Just(base.clone()).prop_shuffle(),
                Just(base).prop_shuffle(),
            )
        })
    }

    proptest! {
        #[test]
        fn prop_crossover_is_permutation((p1, p2) in two_parents(), a in 0usize..40, b in 0usize..40) {
            let n = p1.len();
            let (x, y) = (a % n, b % n);
            let (start, end) = (x.min(y), x.max(y));
            let child = segment_crossover_at(&p1, &p2, start, end);
            prop_assert!(is_permutation(&child, n), "{:?}", child);
            prop_assert_eq!(&child[start..=end], &p1[start..=end]);
        }

        #[test]
        fn prop_crossover_keeps_parent2_order((p1, p2) in two_parents(), seed in any::<u64>()) {
            let n = p1.len();
            let mut rng = create_rng(seed);
            let (start, end) = random_segment(n, &mut rng);
            let child = segment_crossover_at(&p1, &p2, start, end);
            prop_assert!(is_permutation(&child, n));

            // Outside the block, the child is exactly parent2 minus the block
            // cities, in parent2's order.
            let block = &p1[start..=end];
            let expected: Vec<usize> = p2.iter().copied().filter(|c| !block.contains(c)).collect();
            let filled: Vec<usize> = child
                .iter()
                .enumerate()
                .filter(|&(i, _)| i < start || i > end)
                .map(|(_, &c)| c)
                .collect();
            prop_assert_eq!(filled, expected);
        }
    }
}
