//! School timetabling with a genetic algorithm.
//!
//! Assigns every weekly lesson instance of every class a `(room, timeslot)`
//! pair while minimizing a weighted penalty score over hard and soft rules:
//!
//! - **Hard**: unregistered rooms, room capacity, room double-booking,
//!   teacher double-booking, teacher workload, shift availability and
//!   lessons assigned to unknown teachers.
//! - **Soft**: teacher preferred timeslots and favorite subjects.
//!
//! # Modules
//!
//! - [`domain`]: lessons, rooms, timeslots, teachers and the validated
//!   [`TimetableProblem`](domain::TimetableProblem)
//! - [`ga`]: generic minimizing GA engine (tournament selection,
//!   hall of fame, parallel evaluation)
//! - [`timetable`]: genome encoding, variation operators, the penalty
//!   [`Evaluator`](timetable::Evaluator) and the [`Scheduler`](timetable::Scheduler)
//! - [`report`]: grouped, printable view of a solution
//! - [`error`]: [`TimetableError`]
//!
//! # Example
//!
//! ```
//! use u_timetable::domain::{LessonInstance, Room, Timeslot, TimetableProblem};
//! use u_timetable::ga::GaConfig;
//! use u_timetable::timetable::Scheduler;
//!
//! let problem = TimetableProblem::builder()
//!     .lessons(LessonInstance::weekly("7A", "math", 2))
//!     .class_size("7A", 25)
//!     .room(Room::new("R1", 30))
//!     .timeslot(Timeslot::new("MON-1", "Monday"))
//!     .timeslot(Timeslot::new("TUE-1", "Tuesday"))
//!     .build()
//!     .unwrap();
//!
//! let config = GaConfig::default()
//!     .with_population_size(20)
//!     .with_max_generations(20)
//!     .with_seed(7);
//! let solution = Scheduler::new(&problem, config).solve().unwrap();
//! assert_eq!(solution.assignments.len(), 2);
//! ```

pub mod domain;
pub mod error;
pub mod ga;
pub mod report;
pub mod timetable;

pub use error::{Result, TimetableError};
