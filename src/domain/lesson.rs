//! Lesson instances: the units placed by the search.

use std::fmt;
use std::str::FromStr;

use crate::error::TimetableError;

/// Separator between the parts of a lesson identifier.
pub const LESSON_ID_SEPARATOR: &str = "::";

/// One weekly occurrence of a subject taught to a class.
///
/// Identified textually as `class::subject::occurrence`, e.g. `7A::math::2`.
/// The ordered list of lesson instances fixes the genome layout: gene `i`
/// always places lesson `i`.
///
/// # Examples
///
/// ```
/// use u_timetable::domain::LessonInstance;
///
/// let lesson: LessonInstance = "7A::math::2".parse().unwrap();
/// assert_eq!(lesson.class_id, "7A");
/// assert_eq!(lesson.subject, "math");
/// assert_eq!(lesson.occurrence, 2);
/// assert_eq!(lesson.to_string(), "7A::math::2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LessonInstance {
    /// Class (student group) attending the lesson.
    pub class_id: String,
    /// Subject taught.
    pub subject: String,
    /// Occurrence index within the week, starting at 1.
    pub occurrence: u32,
}

impl LessonInstance {
    /// Creates a lesson instance.
    pub fn new(class_id: impl Into<String>, subject: impl Into<String>, occurrence: u32) -> Self {
        Self {
            class_id: class_id.into(),
            subject: subject.into(),
            occurrence,
        }
    }

    /// Expands `lessons_per_week` occurrences of one subject for one class.
    ///
    /// Occurrences are numbered from 1.
    pub fn weekly(class_id: &str, subject: &str, lessons_per_week: u32) -> Vec<Self> {
        (1..=lessons_per_week)
            .map(|occ| Self::new(class_id, subject, occ))
            .collect()
    }
}

impl fmt::Display for LessonInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.class_id,
            self.subject,
            self.occurrence,
            sep = LESSON_ID_SEPARATOR
        )
    }
}

impl FromStr for LessonInstance {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TimetableError::InvalidLessonId(s.to_string());

        let mut parts = s.split(LESSON_ID_SEPARATOR);
        let class_id = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;
        let subject = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;
        let occurrence = parts
            .next()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self::new(class_id, subject, occurrence))
    }
}
