//! Core trait definitions for the GA engine.
//!
//! [`Individual`] and [`GaProblem`] form the contract between the generic
//! generational loop and a concrete encoding such as the timetable genome.

use rand::Rng;

/// Marker trait for fitness values.
///
/// Lower fitness is better (minimization); a timetable score of `0.0`
/// means no rule is violated.
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// A value worse than any real evaluation.
    ///
    /// Used for individuals that have not been evaluated yet.
    fn worst() -> Self;

    /// Converts the fitness to `f64` for logging and statistics.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn worst() -> Self {
        f64::INFINITY
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// A candidate solution carrying its own fitness.
///
/// The runner calls [`GaProblem::evaluate`] and stores the result through
/// [`set_fitness`](Individual::set_fitness).
pub trait Individual: Clone + Send + Sync {
    /// The fitness type.
    type Fitness: Fitness;

    /// Returns the stored fitness.
    fn fitness(&self) -> Self::Fitness;

    /// Stores a freshly computed fitness.
    fn set_fitness(&mut self, fitness: Self::Fitness);
}

/// Defines how individuals are created, scored and varied.
///
/// `GaProblem` must be `Send + Sync` because evaluation may fan out across
/// rayon worker threads. Evaluation must be a pure function of the
/// individual: the runner gives no ordering guarantee between individuals.
pub trait GaProblem: Send + Sync {
    /// The individual (solution) type for this problem.
    type Individual: Individual;

    /// Creates a random individual for the initial population.
    fn create_individual<R: Rng>(&self, rng: &mut R) -> Self::Individual;

    /// Scores an individual. Lower is better.
    fn evaluate(&self, individual: &Self::Individual) -> <Self::Individual as Individual>::Fitness;

    /// Recombines two parents into one or two children.
    ///
    /// When two children are returned they replace both parents in the
    /// breeding pool. The default implementation clones parent1.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        _parent2: &Self::Individual,
        _rng: &mut R,
    ) -> Vec<Self::Individual> {
        vec![parent1.clone()]
    }

    /// Mutates an individual in place. The default is a no-op.
    fn mutate<R: Rng>(&self, _individual: &mut Self::Individual, _rng: &mut R) {}

    /// Called after each completed generation with the best-ever fitness.
    fn on_generation(
        &self,
        _generation: usize,
        _best_fitness: <Self::Individual as Individual>::Fitness,
    ) {
    }
}
