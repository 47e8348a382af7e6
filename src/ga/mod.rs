//! Generic generational GA engine.
//!
//! The engine knows nothing about timetables: an encoding plugs in by
//! implementing [`GaProblem`], which specifies how to create, evaluate,
//! recombine, and mutate individuals. The timetable encoding lives in
//! [`crate::timetable`].
//!
//! # Core Traits
//!
//! - [`Individual`]: A candidate solution with associated fitness type
//! - [`GaProblem`]: Problem definition: initialization, evaluation, operators
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, rates, seed)
//! - [`GaRunner`]: Executes the generational loop with a hall of fame
//! - [`GaResult`]: Best individual plus per-generation statistics
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner, GenerationStats};
pub use selection::Selection;
pub use types::{Fitness, GaProblem, Individual};
