//! Genome model: one `(room, timeslot)` gene per lesson instance.

use rand::Rng;

use crate::domain::TimetableProblem;
use crate::ga::{Fitness, Individual};

/// Placement of a single lesson.
///
/// Room and timeslot are indices into [`TimetableProblem::room_ids`] and
/// [`TimetableProblem::timeslots`]; every constructor and operator draws them
/// from those ranges, so a gene is always inside the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gene {
    pub room: usize,
    pub timeslot: usize,
}

impl Gene {
    pub fn new(room: usize, timeslot: usize) -> Self {
        Self { room, timeslot }
    }

    /// Draws a gene uniformly from the `rooms × timeslots` domain.
    pub fn random<R: Rng>(rooms: usize, timeslots: usize, rng: &mut R) -> Self {
        Self {
            room: rng.random_range(0..rooms),
            timeslot: rng.random_range(0..timeslots),
        }
    }

    /// Room id of this gene, `"?"` when the index is outside the room table.
    pub fn room_id<'a>(&self, problem: &'a TimetableProblem) -> &'a str {
        problem.room_ids().get(self.room).map_or("?", String::as_str)
    }

    /// Timeslot id of this gene, `"?"` when the index is outside the
    /// timeslot table.
    pub fn timeslot_id<'a>(&self, problem: &'a TimetableProblem) -> &'a str {
        problem
            .timeslots()
            .get(self.timeslot)
            .map_or("?", |ts| ts.id.as_str())
    }
}

/// A candidate timetable. Position `i` places lesson `i`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Genome {
    genes: Vec<Gene>,
    fitness: f64,
}

impl Genome {
    /// Wraps a gene sequence. The genome starts unevaluated.
    pub fn new(genes: Vec<Gene>) -> Self {
        Self {
            genes,
            fitness: f64::worst(),
        }
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn genes_mut(&mut self) -> &mut [Gene] {
        &mut self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Marks the stored fitness as stale after a gene change.
    pub(crate) fn invalidate(&mut self) {
        self.fitness = f64::worst();
    }
}

impl From<Vec<Gene>> for Genome {
    fn from(genes: Vec<Gene>) -> Self {
        Self::new(genes)
    }
}

impl Individual for Genome {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

/// Creates a genome of `length` genes, each drawn independently and
/// uniformly over `rooms × timeslots`.
///
/// No capacity or conflict checks happen here; the evaluator scores them.
///
/// # Panics
/// Panics if `rooms` or `timeslots` is zero.
pub fn random_genome<R: Rng>(rooms: usize, timeslots: usize, length: usize, rng: &mut R) -> Genome {
    assert!(rooms > 0 && timeslots > 0, "room and timeslot domains must not be empty");
    Genome::new(
        (0..length)
            .map(|_| Gene::random(rooms, timeslots, rng))
            .collect(),
    )
}

/// Creates `n` random genomes of equal length.
pub fn random_population<R: Rng>(
    n: usize,
    rooms: usize,
    timeslots: usize,
    length: usize,
    rng: &mut R,
) -> Vec<Genome> {
    (0..n)
        .map(|_| random_genome(rooms, timeslots, length, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_genome_length_and_domain() {
        let mut rng = StdRng::seed_from_u64(42);
        let g = random_genome(3, 5, 40, &mut rng);
        assert_eq!(g.len(), 40);
        assert!(g.genes().iter().all(|gene| gene.room < 3 && gene.timeslot < 5));
        assert_eq!(g.fitness(), f64::worst());
    }

    #[test]
    fn test_random_genome_covers_domain() {
        let mut rng = StdRng::seed_from_u64(7);
        let g = random_genome(2, 2, 200, &mut rng);
        for room in 0..2 {
            for ts in 0..2 {
                assert!(
                    g.genes().contains(&Gene::new(room, ts)),
                    "gene ({room}, {ts}) never drawn"
                );
            }
        }
    }

    #[test]
    fn test_random_population() {
        let mut rng = StdRng::seed_from_u64(1);
        let pop = random_population(10, 4, 4, 6, &mut rng);
        assert_eq!(pop.len(), 10);
        assert!(pop.iter().all(|g| g.len() == 6));
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn test_empty_domain_panics() {
        let mut rng = StdRng::seed_from_u64(1);
        random_genome(0, 4, 3, &mut rng);
    }

    #[test]
    fn test_invalidate_resets_to_worst() {
        let mut g = Genome::new(vec![Gene::new(0, 0)]);
        g.set_fitness(2.5);
        g.invalidate();
        assert_eq!(g.fitness(), f64::worst());
        assert!(g.fitness().is_infinite());
    }

    #[test]
    fn test_gene_ids_outside_tables() {
        use crate::domain::{LessonInstance, Room, Timeslot};

        let problem = TimetableProblem::builder()
            .lesson(LessonInstance::new("7A", "math", 1))
            .room(Room::new("R1", 30))
            .timeslot(Timeslot::new("MON-1", "Monday"))
            .build()
            .unwrap();
        assert_eq!(Gene::new(0, 0).room_id(&problem), "R1");
        assert_eq!(Gene::new(0, 0).timeslot_id(&problem), "MON-1");
        assert_eq!(Gene::new(4, 7).room_id(&problem), "?");
        assert_eq!(Gene::new(4, 7).timeslot_id(&problem), "?");
    }

    #[test]
    fn test_empty_genome() {
        let g = Genome::new(Vec::new());
        assert!(g.is_empty());
    }
}
