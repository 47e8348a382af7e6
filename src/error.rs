//! Error types for the timetabling engine.
//!
//! Only malformed *configuration* is reported as an error. Problems with
//! individual lessons (unknown rooms, unknown teachers, oversized classes)
//! are folded into the violation score instead; see
//! [`Evaluator`](crate::timetable::Evaluator).

use thiserror::Error;

/// Errors raised before the evolutionary loop starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimetableError {
    /// The room domain is empty.
    #[error("room list must not be empty")]
    EmptyRooms,

    /// The timeslot domain is empty.
    #[error("timeslot list must not be empty")]
    EmptyTimeslots,

    /// There are no lesson instances to place.
    #[error("lesson list must not be empty")]
    EmptyLessons,

    /// The same room id appears twice in the room domain.
    #[error("duplicate room id: {0}")]
    DuplicateRoom(String),

    /// The same timeslot id appears twice in the timeslot domain.
    #[error("duplicate timeslot id: {0}")]
    DuplicateTimeslot(String),

    /// A lesson identifier does not follow `class::subject::occurrence`.
    #[error("invalid lesson id {0:?}: expected `class::subject::occurrence`")]
    InvalidLessonId(String),

    /// A teacher assignment refers to a lesson position that does not exist.
    #[error("teacher assignment for lesson {index} but only {len} lessons exist")]
    TeacherIndexOutOfRange {
        /// Offending lesson position.
        index: usize,
        /// Number of lesson instances.
        len: usize,
    },

    /// A GA parameter is out of range.
    #[error("invalid GA configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TimetableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            TimetableError::EmptyRooms.to_string(),
            "room list must not be empty"
        );
        assert_eq!(
            TimetableError::InvalidLessonId("7A".into()).to_string(),
            "invalid lesson id \"7A\": expected `class::subject::occurrence`"
        );
        assert_eq!(
            TimetableError::TeacherIndexOutOfRange { index: 4, len: 3 }.to_string(),
            "teacher assignment for lesson 4 but only 3 lessons exist"
        );
    }
}
