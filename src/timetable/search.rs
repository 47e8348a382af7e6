//! Timetable search: the GA encoding and the solve entry points.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use super::evaluator::{Evaluation, Evaluator, PenaltyWeights, Violation};
use super::genome::{random_genome, Gene, Genome};
use super::operators;
use crate::domain::{LessonInstance, TimetableProblem};
use crate::error::Result;
use crate::ga::{GaConfig, GaProblem, GaRunner, GenerationStats};

/// [`GaProblem`] implementation for timetables.
///
/// Borrows the problem tables and owns the compiled [`Evaluator`].
pub struct TimetableGa<'a> {
    problem: &'a TimetableProblem,
    evaluator: Evaluator,
    gene_mutation_rate: f64,
    /// First generation whose hall of fame scored zero; `usize::MAX` if none.
    conflict_free_at: AtomicUsize,
}

impl<'a> TimetableGa<'a> {
    pub fn new(problem: &'a TimetableProblem, weights: PenaltyWeights, gene_mutation_rate: f64) -> Self {
        Self {
            problem,
            evaluator: Evaluator::with_weights(problem, weights),
            gene_mutation_rate,
            conflict_free_at: AtomicUsize::new(usize::MAX),
        }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// First completed generation after which the best timetable scored zero.
    pub fn conflict_free_at(&self) -> Option<usize> {
        match self.conflict_free_at.load(Ordering::Relaxed) {
            usize::MAX => None,
            generation => Some(generation),
        }
    }
}

impl GaProblem for TimetableGa<'_> {
    type Individual = Genome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Genome {
        random_genome(
            self.problem.room_ids().len(),
            self.problem.timeslots().len(),
            self.problem.genome_len(),
            rng,
        )
    }

    fn evaluate(&self, individual: &Genome) -> f64 {
        self.evaluator.score(individual.genes())
    }

    fn crossover<R: Rng>(&self, parent1: &Genome, parent2: &Genome, rng: &mut R) -> Vec<Genome> {
        let (c1, c2) = operators::crossover(parent1, parent2, rng);
        vec![c1, c2]
    }

    fn mutate<R: Rng>(&self, individual: &mut Genome, rng: &mut R) {
        operators::mutate_in_place(
            individual,
            self.problem.room_ids().len(),
            self.problem.timeslots().len(),
            self.gene_mutation_rate,
            rng,
        );
    }

    fn on_generation(&self, generation: usize, best_fitness: f64) {
        if best_fitness == 0.0
            && self
                .conflict_free_at
                .compare_exchange(usize::MAX, generation, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
        {
            info!(generation, "conflict-free timetable reached");
        }
    }
}

/// Where one lesson ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    pub lesson: LessonInstance,
    pub room: String,
    pub timeslot: String,
    pub teacher: Option<String>,
}

/// Best timetable found by a run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Hall-of-fame genome.
    pub genome: Genome,
    /// Total penalty; `0.0` means every rule is satisfied.
    pub score: f64,
    /// Violations of the elite genome in discovery order.
    pub violations: Vec<Violation>,
    /// Lesson placements, in lesson order.
    pub assignments: Vec<Assignment>,
    /// Completed generations.
    pub generations: usize,
    /// Whether the run stopped on a cancellation request.
    pub cancelled: bool,
    /// Population statistics per generation, starting with the initial one.
    pub stats: Vec<GenerationStats>,
    /// Generation at which a zero score was first reached (0 for the
    /// initial population).
    pub conflict_free_at: Option<usize>,
}

impl Solution {
    pub(crate) fn from_genome(
        problem: &TimetableProblem,
        genome: Genome,
        evaluation: Evaluation,
        generations: usize,
        cancelled: bool,
        stats: Vec<GenerationStats>,
    ) -> Self {
        let assignments = problem
            .lessons()
            .iter()
            .zip(genome.genes())
            .enumerate()
            .map(|(i, (lesson, gene))| Assignment {
                lesson: lesson.clone(),
                room: gene.room_id(problem).to_string(),
                timeslot: gene.timeslot_id(problem).to_string(),
                teacher: problem.teacher_of_lesson(i).map(str::to_string),
            })
            .collect();

        Self {
            genome,
            score: evaluation.score,
            violations: evaluation.violations,
            assignments,
            generations,
            cancelled,
            stats,
            conflict_free_at: None,
        }
    }

    /// True when no rule is violated.
    pub fn is_perfect(&self) -> bool {
        self.score == 0.0
    }

    /// Lesson id → `(room, timeslot)`.
    pub fn mapping(&self) -> HashMap<String, (&str, &str)> {
        self.assignments
            .iter()
            .map(|a| (a.lesson.to_string(), (a.room.as_str(), a.timeslot.as_str())))
            .collect()
    }

    /// Gene sequence of the elite genome.
    pub fn genes(&self) -> &[Gene] {
        self.genome.genes()
    }
}

/// How many fresh runs to try before settling for an imperfect timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryPolicy {
    pub max_attempts: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 5 }
    }
}

/// Result of [`Scheduler::solve_with_retries`].
#[derive(Debug, Clone)]
pub struct RetryOutcome {
    /// Best solution over all attempts.
    pub solution: Solution,
    /// Attempts actually run.
    pub attempts: usize,
}

/// Entry point: validates configuration and runs the search.
///
/// # Examples
///
/// ```
/// use u_timetable::domain::{LessonInstance, Room, Timeslot, TimetableProblem};
/// use u_timetable::ga::GaConfig;
/// use u_timetable::timetable::Scheduler;
///
/// let problem = TimetableProblem::builder()
///     .lessons(LessonInstance::weekly("7A", "math", 2))
///     .class_size("7A", 25)
///     .room(Room::new("R1", 30))
///     .timeslot(Timeslot::new("MON-1", "Monday"))
///     .timeslot(Timeslot::new("MON-2", "Monday"))
///     .build()
///     .unwrap();
///
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_max_generations(10)
///     .with_seed(42);
/// let solution = Scheduler::new(&problem, config).solve().unwrap();
/// assert_eq!(solution.assignments.len(), 2);
/// assert!(solution.score >= 0.0);
/// ```
pub struct Scheduler<'a> {
    problem: &'a TimetableProblem,
    config: GaConfig,
    weights: PenaltyWeights,
}

impl<'a> Scheduler<'a> {
    pub fn new(problem: &'a TimetableProblem, config: GaConfig) -> Self {
        Self {
            problem,
            config,
            weights: PenaltyWeights::default(),
        }
    }

    /// Overrides the penalty weights.
    pub fn with_weights(mut self, weights: PenaltyWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Runs one full generational loop.
    ///
    /// # Errors
    /// Returns [`TimetableError::InvalidConfig`](crate::error::TimetableError::InvalidConfig)
    /// when the GA configuration is invalid. A non-zero score is not an error.
    pub fn solve(&self) -> Result<Solution> {
        self.solve_inner(&self.config, None)
    }

    /// Like [`solve`](Self::solve), stopping between generations once `cancel`
    /// is set.
    pub fn solve_with_cancel(&self, cancel: Arc<AtomicBool>) -> Result<Solution> {
        self.solve_inner(&self.config, Some(cancel))
    }

    /// Runs fresh searches until one reaches a zero score or the attempt
    /// budget is spent, then returns the best solution seen.
    ///
    /// Attempt `n` uses seed `seed + n` when a seed is configured.
    pub fn solve_with_retries(&self, policy: RetryPolicy) -> Result<RetryOutcome> {
        self.config.validate()?;
        let max_attempts = policy.max_attempts.max(1);

        let run_attempt = |attempt: usize| {
            let mut config = self.config.clone();
            config.seed = self.config.seed.map(|s| s.wrapping_add(attempt as u64));
            info!(attempt = attempt + 1, max_attempts, "starting timetable search");
            self.solve_inner(&config, None)
        };

        let mut solution = run_attempt(0)?;
        let mut attempts = 1;
        while attempts < max_attempts && !solution.is_perfect() {
            let candidate = run_attempt(attempts)?;
            attempts += 1;
            if candidate.score < solution.score {
                solution = candidate;
            }
        }

        if solution.is_perfect() {
            info!(attempts, "conflict-free timetable found");
        } else {
            warn!(
                attempts,
                score = solution.score,
                violations = solution.violations.len(),
                "retry budget exhausted without a conflict-free timetable"
            );
        }
        Ok(RetryOutcome { solution, attempts })
    }

    fn solve_inner(&self, config: &GaConfig, cancel: Option<Arc<AtomicBool>>) -> Result<Solution> {
        config.validate()?;

        for (class_id, students) in self.problem.inviable_classes() {
            warn!(class_id = %class_id, students, "class does not fit in any room");
        }

        let ga = TimetableGa::new(self.problem, self.weights, config.gene_mutation_rate);
        let result = GaRunner::run_with_cancel(&ga, config, cancel);
        let evaluation = ga.evaluator().evaluate(result.best.genes());

        info!(
            generations = result.generations,
            score = evaluation.score,
            violations = evaluation.violations.len(),
            "timetable search finished"
        );

        let initially_perfect = result.stats.first().is_some_and(|s| s.best == 0.0);
        let mut solution = Solution::from_genome(
            self.problem,
            result.best,
            evaluation,
            result.generations,
            result.cancelled,
            result.stats,
        );
        solution.conflict_free_at = if initially_perfect {
            Some(0)
        } else {
            ga.conflict_free_at()
        };
        Ok(solution)
    }
}
