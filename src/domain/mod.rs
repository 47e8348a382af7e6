//! Domain tables supplied by the caller.
//!
//! Everything here is immutable once a [`TimetableProblem`] is built:
//!
//! - [`LessonInstance`]: one weekly occurrence of a subject for a class
//! - [`Room`]: room id and capacity
//! - [`Timeslot`]: bookable period with weekday, [`Shift`] and label
//! - [`Teacher`]: availability, workload limit and preferences
//!
//! CSV loading, enrollment forecasting and data generation live outside
//! this crate; they only need to produce these tables.

mod lesson;
mod problem;
mod resources;

pub use lesson::{LessonInstance, LESSON_ID_SEPARATOR};
pub use problem::{TimetableProblem, TimetableProblemBuilder};
pub use resources::{Room, Shift, ShiftAvailability, Teacher, Timeslot, Weekday};
