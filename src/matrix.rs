//! Symmetric distance matrix.
//!
//! [`DistanceMatrix`] is the only problem input. It is validated once on
//! construction (square, symmetric, zero diagonal, at least one city) and
//! is read-only afterwards, so every [`Tour`](crate::evo::Tour) and
//! [`Population`](crate::evo::Population) borrows it without synchronization.

use crate::error::{TspError, TspResult};
use rand::Rng;
use std::fmt;

/// Immutable `n × n` table of non-negative integer distances.
///
/// Stored row-major in a single buffer.
///
/// # Examples
///
/// ```
/// use u_tsp_ga::DistanceMatrix;
///
/// let m = DistanceMatrix::new(vec![
///     vec![0, 10, 15],
///     vec![10, 0, 35],
///     vec![15, 35, 0],
/// ]).unwrap();
/// assert_eq!(m.size(), 3);
/// assert_eq!(m.distance(2, 1), 35);
/// assert_eq!(m.cycle_cost(&[0, 1, 2]), 60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Vec<u64>>", into = "Vec<Vec<u64>>")
)]
pub struct DistanceMatrix {
    size: usize,
    data: Vec<u64>,
}

impl DistanceMatrix {
    /// Builds a matrix from rows, validating every invariant.
    ///
    /// # Errors
    ///
    /// - [`TspError::EmptyMatrix`] if there are no rows
    /// - [`TspError::NotSquare`] if any row length differs from the row count
    /// - [`TspError::NonZeroDiagonal`] if `dist[i][i] != 0`
    /// - [`TspError::Asymmetric`] if `dist[i][j] != dist[j][i]`
    /// - [`TspError::DistanceOverflow`] if `size * max_entry` exceeds `u64::MAX`,
    ///   i.e. some tour's cost might not be representable
    pub fn new(rows: Vec<Vec<u64>>) -> TspResult<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(TspError::EmptyMatrix);
        }

        let len = size
            .checked_mul(size)
            .ok_or(TspError::MatrixTooLarge { size })?;
        let mut data = Vec::with_capacity(len);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(TspError::NotSquare {
                    row,
                    len: values.len(),
                    expected: size,
                });
            }
            data.extend(values);
        }

        Self::from_flat(size, data)
    }

    /// Builds a matrix from a row-major buffer of `size * size` entries.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new); a buffer of the wrong length is reported
    /// as [`TspError::NotSquare`] on the first short or overlong row.
    pub fn from_flat(size: usize, data: Vec<u64>) -> TspResult<Self> {
        if size == 0 {
            return Err(TspError::EmptyMatrix);
        }
        if size.checked_mul(size) != Some(data.len()) {
            let full_rows = data.len() / size;
            return Err(TspError::NotSquare {
                row: full_rows.min(size - 1),
                len: data.len() - full_rows.min(size - 1) * size,
                expected: size,
            });
        }

        for i in 0..size {
            let value = data[i * size + i];
            if value != 0 {
                return Err(TspError::NonZeroDiagonal { index: i, value });
            }
            for j in (i + 1)..size {
                let forward = data[i * size + j];
                let backward = data[j * size + i];
                if forward != backward {
                    return Err(TspError::Asymmetric {
                        i,
                        j,
                        forward,
                        backward,
                    });
                }
            }
        }

        let max = data.iter().copied().max().unwrap_or(0);
        check_cycle_bound(size, max)?;

        Ok(Self { size, data })
    }

    /// Generates a random symmetric matrix.
    ///
    /// Each unordered pair `{i, j}` with `i != j` gets an independent
    /// distance drawn uniformly from `min..=max`; the diagonal is zero.
    ///
    /// # Errors
    ///
    /// - [`TspError::EmptyMatrix`] if `size == 0`
    /// - [`TspError::InvalidDistanceRange`] if `min > max`
    /// - [`TspError::MatrixTooLarge`] if `size * size` overflows `usize`
    /// - [`TspError::DistanceOverflow`] if a tour could cost more than `u64::MAX`
    pub fn random<R: Rng>(size: usize, min: u64, max: u64, rng: &mut R) -> TspResult<Self> {
        if size == 0 {
            return Err(TspError::EmptyMatrix);
        }
        if min > max {
            return Err(TspError::InvalidDistanceRange { min, max });
        }
        let len = size
            .checked_mul(size)
            .ok_or(TspError::MatrixTooLarge { size })?;
        check_cycle_bound(size, max)?;

        let mut data = vec![0u64; len];
        for i in 0..size {
            for j in (i + 1)..size {
                let d = rng.random_range(min..=max);
                data[i * size + j] = d;
                data[j * size + i] = d;
            }
        }

        Ok(Self { size, data })
    }

    /// Number of cities.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance between cities `i` and `j`.
    ///
    /// # Panics
    /// Panics if either index is `>= size()`.
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> u64 {
        self.data[i * self.size + j]
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[u64] {
        &self.data[i * self.size..(i + 1) * self.size]
    }

    /// Iterates over all rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[u64]> + '_ {
        self.data.chunks_exact(self.size)
    }

    /// Total length of the closed cycle visiting `cities` in order.
    ///
    /// Sums consecutive edges plus the edge from the last city back to the
    /// first. An empty slice costs 0; a single city costs `dist[c][c] = 0`.
    /// Cannot overflow for a permutation: construction bounds `size * max`.
    pub fn cycle_cost(&self, cities: &[usize]) -> u64 {
        let (first, last) = match (cities.first(), cities.last()) {
            (Some(&f), Some(&l)) => (f, l),
            _ => return 0,
        };
        let open: u64 = cities
            .windows(2)
            .map(|w| self.distance(w[0], w[1]))
            .sum();
        open + self.distance(last, first)
    }
}

/// A closed tour has `size` edges, so `size * max` bounds every cycle cost.
fn check_cycle_bound(size: usize, max: u64) -> TspResult<()> {
    u64::try_from(size)
        .ok()
        .and_then(|n| n.checked_mul(max))
        .map(|_| ())
        .ok_or(TspError::DistanceOverflow { size, max })
}

impl TryFrom<Vec<Vec<u64>>> for DistanceMatrix {
    type Error = TspError;

    fn try_from(rows: Vec<Vec<u64>>) -> TspResult<Self> {
        Self::new(rows)
    }
}

impl From<DistanceMatrix> for Vec<Vec<u64>> {
    fn from(matrix: DistanceMatrix) -> Self {
        matrix.rows().map(<[u64]>::to_vec).collect()
    }
}

impl fmt::Display for DistanceMatrix {
    /// One row per line, formatted as `[a, b, c]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{row:?}")?;
        }
        Ok(())
    }
}
