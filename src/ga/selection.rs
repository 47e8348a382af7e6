//! Parent selection strategies.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::types::{Fitness, Individual};
use rand::Rng;

/// Selection strategy for filling the breeding pool.
///
/// All strategies assume **minimization** (lower fitness = better).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Sample `k` individuals uniformly with replacement, keep the best.
    ///
    /// k=3 is the timetabling default.
    Tournament(usize),

    /// Linear ranking: selection probability proportional to rank, so the
    /// magnitude of penalty gaps does not matter.
    ///
    /// Reference: Baker (1985), "Adaptive Selection Methods for Genetic
    /// Algorithms"
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Select a parent index from the population.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<I: Individual, R: Rng>(&self, population: &[I], rng: &mut R) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::Tournament(k) => tournament(population, *k, rng),
            Selection::Rank => rank(population, rng),
        }
    }
}

/// Best of `k` uniform draws with replacement; ties keep the earlier draw.
fn tournament<I: Individual, R: Rng>(population: &[I], k: usize, rng: &mut R) -> usize {
    let n = population.len();
    let first = rng.random_range(0..n);
    (1..k.max(1)).fold(first, |winner, _| {
        let challenger = rng.random_range(0..n);
        if population[challenger].fitness() < population[winner].fitness() {
            challenger
        } else {
            winner
        }
    })
}

/// Linear ranking: the best of `n` individuals has weight `n`, the worst 1.
fn rank<I: Individual, R: Rng>(population: &[I], rng: &mut R) -> usize {
    let n = population.len();
    if n == 1 {
        return 0;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        population[a]
            .fitness()
            .to_f64()
            .total_cmp(&population[b].fitness().to_f64())
    });

    let total = n * (n + 1) / 2;
    let mut ticket = rng.random_range(0..total);
    for (position, &idx) in order.iter().enumerate() {
        let weight = n - position;
        if ticket < weight {
            return idx;
        }
        ticket -= weight;
    }
    order[n - 1]
}
