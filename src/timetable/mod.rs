//! Timetable encoding for the GA engine.
//!
//! - [`Genome`] / [`Gene`]: one `(room, timeslot)` pair per lesson instance
//! - [`Evaluator`]: penalty score plus [`Violation`] diagnostics
//! - [`operators`]: per-gene mutation and two-point crossover
//! - [`Scheduler`]: validates the configuration and runs the search,
//!   optionally retrying with fresh populations

mod evaluator;
mod genome;
pub mod operators;
mod search;

pub use evaluator::{
    Category, Cause, Evaluation, Evaluator, PenaltyWeights, Severity, Violation, ViolationKind,
};
pub use genome::{random_genome, random_population, Gene, Genome};
pub use search::{Assignment, RetryOutcome, RetryPolicy, Scheduler, Solution, TimetableGa};
