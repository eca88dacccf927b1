//! Generational population of tours.
//!
//! [`Population`] owns one generation of [`Tour`]s over a shared matrix and
//! knows how to breed the next one: uniform parent selection, segment
//! crossover, swap mutation and a local-improvement pass on every child.
//! The whole generation is replaced at once; nothing survives by identity
//! and there is no elitism.

use super::operators::segment_crossover;
use super::tour::Tour;
use crate::error::{TspError, TspResult};
use crate::matrix::DistanceMatrix;
use rand::Rng;
use std::fmt;

/// One generation of candidate tours.
#[derive(Debug, Clone)]
pub struct Population<'m> {
    tours: Vec<Tour<'m>>,
    matrix: &'m DistanceMatrix,
    generation: usize,
}

/// Costs of every tour in a population at one point in time.
///
/// `Display` prints one `Distance: <cost>` line per tour.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationSnapshot {
    /// Generation the snapshot was taken at (0 = initial population).
    pub generation: usize,
    /// Cost of each tour, in population order.
    pub costs: Vec<u64>,
}

impl PopulationSnapshot {
    /// Lowest cost in the snapshot, `None` if it is empty.
    pub fn best(&self) -> Option<u64> {
        self.costs.iter().copied().min()
    }

    /// Mean cost, `None` if the snapshot is empty.
    pub fn mean(&self) -> Option<f64> {
        if self.costs.is_empty() {
            return None;
        }
        let total: u128 = self.costs.iter().map(|&c| u128::from(c)).sum();
        Some(total as f64 / self.costs.len() as f64)
    }
}

impl fmt::Display for PopulationSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cost in &self.costs {
            writeln!(f, "Distance: {cost}")?;
        }
        Ok(())
    }
}

impl<'m> Population<'m> {
    /// Creates `size` independent random tours over `matrix`.
    ///
    /// Duplicate tours are allowed.
    ///
    /// # Errors
    ///
    /// [`TspError::EmptyPopulation`] if `size == 0`.
    pub fn new<R: Rng>(size: usize, matrix: &'m DistanceMatrix, rng: &mut R) -> TspResult<Self> {
        if size == 0 {
            return Err(TspError::EmptyPopulation);
        }
        let tours = (0..size).map(|_| Tour::random(matrix, rng)).collect();
        Ok(Self {
            tours,
            matrix,
            generation: 0,
        })
    }

    /// Builds a population from existing tours.
    ///
    /// # Errors
    ///
    /// - [`TspError::EmptyPopulation`] if `tours` is empty
    /// - [`TspError::MatrixMismatch`] if any tour uses a different matrix
    pub fn from_tours(tours: Vec<Tour<'m>>, matrix: &'m DistanceMatrix) -> TspResult<Self> {
        if tours.is_empty() {
            return Err(TspError::EmptyPopulation);
        }
        if tours.iter().any(|t| !std::ptr::eq(t.matrix(), matrix)) {
            return Err(TspError::MatrixMismatch);
        }
        Ok(Self {
            tours,
            matrix,
            generation: 0,
        })
    }

    /// Number of tours; constant across generations.
    pub fn len(&self) -> usize {
        self.tours.len()
    }

    /// Always `false`: construction rejects empty populations.
    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }

    /// Current tours, in slot order.
    pub fn tours(&self) -> &[Tour<'m>] {
        &self.tours
    }

    /// The shared distance matrix.
    pub fn matrix(&self) -> &'m DistanceMatrix {
        self.matrix
    }

    /// Number of completed [`evolve`](Self::evolve) calls.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Uniformly random tour, sampled with replacement and no fitness bias.
    pub fn select_parent<R: Rng>(&self, rng: &mut R) -> &Tour<'m> {
        &self.tours[rng.random_range(0..self.tours.len())]
    }

    /// Segment crossover of two parents into a new tour over this
    /// population's matrix.
    ///
    /// See [`segment_crossover`](super::operators::segment_crossover).
    pub fn crossover<R: Rng>(&self, parent1: &Tour<'m>, parent2: &Tour<'m>, rng: &mut R) -> Tour<'m> {
        let cities = segment_crossover(parent1.cities(), parent2.cities(), rng);
        Tour::from_permutation(cities, self.matrix)
    }

    /// Breeds one child: select two parents (possibly the same tour),
    /// cross them over, mutate, then run one local-improvement pass.
    fn breed<R: Rng>(&self, mutation_probability: f64, rng: &mut R) -> Tour<'m> {
        let parent1 = self.select_parent(rng);
        let parent2 = self.select_parent(rng);
        let mut child = self.crossover(parent1, parent2, rng);
        child.mutate(mutation_probability, rng);
        let accepted = child.local_improve();
        tracing::trace!(accepted, cost = child.cost(), "child improved");
        child
    }

    /// Replaces the population with a full generation of offspring.
    ///
    /// Each slot gets an independently bred child (see the module docs).
    /// The new tours are collected first and swapped in at the end, so no
    /// caller ever observes a partially built generation.
    pub fn evolve<R: Rng>(&mut self, mutation_probability: f64, rng: &mut R) {
        let next: Vec<Tour<'m>> = (0..self.tours.len())
            .map(|_| self.breed(mutation_probability, rng))
            .collect();
        self.tours = next;
        self.generation += 1;
    }

    /// Like [`evolve`](Self::evolve), but breeds children on the rayon pool.
    ///
    /// One seed per slot is drawn from `rng` up front and each child gets its
    /// own generator, so the result is deterministic for a seeded `rng`
    /// regardless of thread scheduling. The stream differs from
    /// [`evolve`](Self::evolve), but the semantics are the same.
    #[cfg(feature = "parallel")]
    pub fn evolve_parallel<R: Rng>(&mut self, mutation_probability: f64, rng: &mut R) {
        use crate::random::create_rng;
        use rayon::prelude::*;

        let seeds: Vec<u64> = (0..self.tours.len()).map(|_| rng.random()).collect();
        let next: Vec<Tour<'m>> = seeds
            .into_par_iter()
            .map(|seed| self.breed(mutation_probability, &mut create_rng(seed)))
            .collect();
        self.tours = next;
        self.generation += 1;
    }

    /// Tour with the minimum cost; ties go to the earliest slot.
    ///
    /// # Errors
    ///
    /// [`TspError::EmptyPopulation`] if there are no tours.
    pub fn best(&self) -> TspResult<&Tour<'m>> {
        self.tours
            .iter()
            .min_by_key(|t| t.cost())
            .ok_or(TspError::EmptyPopulation)
    }

    /// Costs of every tour, in slot order.
    pub fn costs(&self) -> Vec<u64> {
        self.tours.iter().map(|t| t.cost()).collect()
    }

    /// Cost snapshot tagged with the current generation.
    pub fn snapshot(&self) -> PopulationSnapshot {
        PopulationSnapshot {
            generation: self.generation,
            costs: self.costs(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
