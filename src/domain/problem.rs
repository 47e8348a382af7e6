//! The immutable input tables of one timetabling run.

use std::collections::{HashMap, HashSet};

use super::lesson::LessonInstance;
use super::resources::{Room, Teacher, Timeslot};
use crate::error::{Result, TimetableError};

/// All lookup tables the engine needs, validated once.
///
/// Rooms and timeslots are stored as ordered domains; genes refer to them
/// by index. A room id may be present in the domain without a capacity
/// entry: placing a lesson there is penalised, not rejected.
///
/// Build with [`TimetableProblem::builder`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimetableProblem {
    lessons: Vec<LessonInstance>,
    room_ids: Vec<String>,
    room_capacity: HashMap<String, u32>,
    class_size: HashMap<String, u32>,
    timeslots: Vec<Timeslot>,
    teachers: Vec<Teacher>,
    teacher_of_lesson: HashMap<usize, String>,
}

impl TimetableProblem {
    /// Starts building a problem.
    pub fn builder() -> TimetableProblemBuilder {
        TimetableProblemBuilder::default()
    }

    /// Ordered lesson instances; defines the genome layout.
    pub fn lessons(&self) -> &[LessonInstance] {
        &self.lessons
    }

    /// Number of genes per genome.
    pub fn genome_len(&self) -> usize {
        self.lessons.len()
    }

    /// Room domain, in the order genes index into it.
    pub fn room_ids(&self) -> &[String] {
        &self.room_ids
    }

    /// Capacity of a room, `None` when the room has no capacity entry.
    pub fn room_capacity(&self, room_id: &str) -> Option<u32> {
        self.room_capacity.get(room_id).copied()
    }

    /// Student count of a class. Unknown classes count as empty.
    pub fn class_size(&self, class_id: &str) -> u32 {
        self.class_size.get(class_id).copied().unwrap_or(0)
    }

    /// Timeslot domain, in the order genes index into it.
    pub fn timeslots(&self) -> &[Timeslot] {
        &self.timeslots
    }

    /// Known teacher profiles.
    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    /// Looks up a teacher profile by id.
    pub fn teacher(&self, id: &str) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == id)
    }

    /// Teacher id assigned to the lesson at `position`, if any.
    pub fn teacher_of_lesson(&self, position: usize) -> Option<&str> {
        self.teacher_of_lesson.get(&position).map(String::as_str)
    }

    /// Display name for a teacher id, falling back to the id itself.
    pub fn teacher_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.teacher(id).map_or(id, |t| t.name.as_str())
    }

    /// Classes that do not fit in any room with a known capacity.
    ///
    /// Such classes can never reach a zero score. The result is advisory;
    /// the engine still runs and reports the overflow.
    pub fn inviable_classes(&self) -> Vec<(String, u32)> {
        let largest = self.room_capacity.values().copied().max().unwrap_or(0);
        let mut seen = HashSet::new();
        self.lessons
            .iter()
            .filter(|l| seen.insert(l.class_id.as_str()))
            .filter_map(|l| {
                let students = self.class_size(&l.class_id);
                (students > largest).then(|| (l.class_id.clone(), students))
            })
            .collect()
    }
}

/// Builder for [`TimetableProblem`].
///
/// # Examples
///
/// ```
/// use u_timetable::domain::{LessonInstance, Room, Teacher, Timeslot, TimetableProblem};
///
/// let problem = TimetableProblem::builder()
///     .lessons(LessonInstance::weekly("7A", "math", 2))
///     .class_size("7A", 28)
///     .room(Room::new("R1", 30))
///     .timeslot(Timeslot::new("MON-1", "Monday"))
///     .timeslot(Timeslot::new("MON-2", "Monday"))
///     .teacher(Teacher::new("P1"))
///     .assign_teacher(0, "P1")
///     .assign_teacher(1, "P1")
///     .build()
///     .unwrap();
///
/// assert_eq!(problem.genome_len(), 2);
/// assert_eq!(problem.teacher_of_lesson(1), Some("P1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimetableProblemBuilder {
    lessons: Vec<LessonInstance>,
    room_ids: Vec<String>,
    room_capacity: HashMap<String, u32>,
    class_size: HashMap<String, u32>,
    timeslots: Vec<Timeslot>,
    teachers: Vec<Teacher>,
    teacher_of_lesson: HashMap<usize, String>,
}

impl TimetableProblemBuilder {
    /// Appends one lesson instance.
    pub fn lesson(mut self, lesson: LessonInstance) -> Self {
        self.lessons.push(lesson);
        self
    }

    /// Appends lesson instances in order.
    pub fn lessons(mut self, lessons: impl IntoIterator<Item = LessonInstance>) -> Self {
        self.lessons.extend(lessons);
        self
    }

    /// Parses and appends textual lesson ids (`class::subject::occurrence`).
    pub fn lesson_ids<I, S>(mut self, ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in ids {
            self.lessons.push(id.as_ref().parse()?);
        }
        Ok(self)
    }

    /// Adds a room to the domain with its capacity.
    pub fn room(mut self, room: Room) -> Self {
        self.room_ids.push(room.id.clone());
        self.room_capacity.insert(room.id, room.capacity);
        self
    }

    /// Adds a room id to the domain without a capacity entry.
    pub fn room_id(mut self, id: impl Into<String>) -> Self {
        self.room_ids.push(id.into());
        self
    }

    /// Sets a class's student count.
    pub fn class_size(mut self, class_id: impl Into<String>, students: u32) -> Self {
        self.class_size.insert(class_id.into(), students);
        self
    }

    /// Adds a timeslot to the domain.
    pub fn timeslot(mut self, timeslot: Timeslot) -> Self {
        self.timeslots.push(timeslot);
        self
    }

    /// Adds a teacher profile. A later profile with the same id replaces it.
    pub fn teacher(mut self, teacher: Teacher) -> Self {
        self.teachers.retain(|t| t.id != teacher.id);
        self.teachers.push(teacher);
        self
    }

    /// Assigns a teacher to the lesson at `position`.
    pub fn assign_teacher(mut self, position: usize, teacher_id: impl Into<String>) -> Self {
        self.teacher_of_lesson.insert(position, teacher_id.into());
        self
    }

    /// Validates the configuration and freezes it.
    ///
    /// # Errors
    ///
    /// Fails on empty room, timeslot or lesson lists, duplicated room or
    /// timeslot ids, and teacher assignments past the end of the lesson list.
    pub fn build(self) -> Result<TimetableProblem> {
        if self.room_ids.is_empty() {
            return Err(TimetableError::EmptyRooms);
        }
        if self.timeslots.is_empty() {
            return Err(TimetableError::EmptyTimeslots);
        }
        if self.lessons.is_empty() {
            return Err(TimetableError::EmptyLessons);
        }

        let mut seen = HashSet::new();
        for id in &self.room_ids {
            if !seen.insert(id.as_str()) {
                return Err(TimetableError::DuplicateRoom(id.clone()));
            }
        }
        let mut seen = HashSet::new();
        for ts in &self.timeslots {
            if !seen.insert(ts.id.as_str()) {
                return Err(TimetableError::DuplicateTimeslot(ts.id.clone()));
            }
        }

        let len = self.lessons.len();
        if let Some(&index) = self.teacher_of_lesson.keys().filter(|&&i| i >= len).min() {
            return Err(TimetableError::TeacherIndexOutOfRange { index, len });
        }

        Ok(TimetableProblem {
            lessons: self.lessons,
            room_ids: self.room_ids,
            room_capacity: self.room_capacity,
            class_size: self.class_size,
            timeslots: self.timeslots,
            teachers: self.teachers,
            teacher_of_lesson: self.teacher_of_lesson,
        })
    }
}
