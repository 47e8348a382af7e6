//! Variation operators for timetable genomes.
//!
//! Both operators only ever copy existing genes or redraw one coordinate
//! from the `0..rooms` / `0..timeslots` ranges, so offspring stay inside the
//! domain used at initialization.

use rand::Rng;

use super::genome::{Gene, Genome};

/// Probability that a mutated gene changes its timeslot rather than its room.
pub const TIMESLOT_MOVE_PROBABILITY: f64 = 0.6;

/// Returns a mutated copy of `genome`.
///
/// Each gene is touched independently with probability `per_gene_prob`.
/// A touched gene either gets a new uniformly drawn timeslot
/// (probability [`TIMESLOT_MOVE_PROBABILITY`]) or a new uniformly drawn room.
pub fn mutate<R: Rng>(
    genome: &Genome,
    rooms: usize,
    timeslots: usize,
    per_gene_prob: f64,
    rng: &mut R,
) -> Genome {
    let mut child = Genome::new(genome.genes().to_vec());
    mutate_in_place(&mut child, rooms, timeslots, per_gene_prob, rng);
    child
}

/// In-place form of [`mutate`]. Returns the number of genes redrawn.
pub fn mutate_in_place<R: Rng>(
    genome: &mut Genome,
    rooms: usize,
    timeslots: usize,
    per_gene_prob: f64,
    rng: &mut R,
) -> usize {
    let p = per_gene_prob.clamp(0.0, 1.0);
    let mut touched = 0;
    for gene in genome.genes_mut() {
        if rng.random_bool(p) {
            if rng.random_bool(TIMESLOT_MOVE_PROBABILITY) {
                gene.timeslot = rng.random_range(0..timeslots);
            } else {
                gene.room = rng.random_range(0..rooms);
            }
            touched += 1;
        }
    }
    if touched > 0 {
        genome.invalidate();
    }
    touched
}

/// Two-point crossover.
///
/// Draws two cut points uniformly in `1..=len-1`, orders them, and swaps the
/// genes between the cuts. Genomes shorter than two genes are returned
/// unchanged.
///
/// # Panics
/// Panics if the parents have different lengths.
pub fn crossover<R: Rng>(parent1: &Genome, parent2: &Genome, rng: &mut R) -> (Genome, Genome) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");

    if n < 2 {
        return (parent1.clone(), parent2.clone());
    }

    let (a, b) = cut_points(n, rng);
    let mut c1: Vec<Gene> = parent1.genes().to_vec();
    let mut c2: Vec<Gene> = parent2.genes().to_vec();
    c1[a..b].swap_with_slice(&mut c2[a..b]);

    (Genome::new(c1), Genome::new(c2))
}

/// Two ordered cut points in `1..n`, possibly equal.
fn cut_points<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(1..n);
    let b = rng.random_range(1..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
