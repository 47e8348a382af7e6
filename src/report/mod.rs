//! Human-readable view of a solution.
//!
//! [`Report`] groups the elite genome by class, orders each class's lessons
//! by weekday and period label, partitions the violations for display, and
//! summarises room usage and teacher schedules. Nothing here feeds back into
//! the search.

use std::collections::HashMap;
use std::fmt;

use crate::domain::TimetableProblem;
use crate::timetable::{Category, Solution};

/// Sort position of weekday names that are not recognised.
const UNKNOWN_WEEKDAY: usize = 99;

/// One placed lesson, as listed under a class or a teacher.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotLine {
    pub weekday: String,
    /// Weekday position (Monday = 0), `None` when the name is unrecognised.
    pub weekday_index: Option<usize>,
    pub label: String,
    pub shift: String,
    pub room: String,
    pub class_id: String,
    pub subject: String,
    pub teacher: String,
}

/// All lessons of one class in weekly order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassSchedule {
    pub class_id: String,
    pub students: u32,
    pub slots: Vec<SlotLine>,
}

/// All lessons of one teacher in weekly order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeacherSchedule {
    pub teacher_id: String,
    pub name: String,
    pub slots: Vec<SlotLine>,
}

/// How a room is used across the week.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomUsage {
    pub room: String,
    pub capacity: Option<u32>,
    /// Lessons placed in the room.
    pub lessons: usize,
    /// Mean share of seats taken per lesson, in percent.
    pub average_fill: Option<f64>,
}

/// Printable allocation report.
///
/// # Examples
///
/// ```
/// use u_timetable::domain::{LessonInstance, Room, Timeslot, TimetableProblem};
/// use u_timetable::ga::GaConfig;
/// use u_timetable::report::Report;
/// use u_timetable::timetable::Scheduler;
///
/// let problem = TimetableProblem::builder()
///     .lesson(LessonInstance::new("7A", "math", 1))
///     .class_size("7A", 20)
///     .room(Room::new("R1", 30))
///     .timeslot(Timeslot::new("MON-1", "Monday"))
///     .build()
///     .unwrap();
/// let config = GaConfig::default().with_population_size(4).with_max_generations(1);
/// let solution = Scheduler::new(&problem, config).solve().unwrap();
///
/// let report = Report::new(&problem, &solution);
/// assert!(report.to_string().contains("Class 7A"));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Report {
    pub score: f64,
    pub room_problems: Vec<String>,
    pub conflicts: Vec<String>,
    pub teacher_problems: Vec<String>,
    /// Classes in order of their first lesson.
    pub classes: Vec<ClassSchedule>,
    /// Teachers in order of their first lesson.
    pub teachers: Vec<TeacherSchedule>,
    /// Rooms in domain order.
    pub rooms: Vec<RoomUsage>,
}

impl Report {
    /// Builds the report for `solution` against the tables it was solved on.
    pub fn new(problem: &TimetableProblem, solution: &Solution) -> Self {
        let mut room_problems = Vec::new();
        let mut conflicts = Vec::new();
        let mut teacher_problems = Vec::new();
        for v in &solution.violations {
            let text = v.describe(problem);
            match v.category() {
                Category::Room => room_problems.push(text),
                Category::Conflict => conflicts.push(text),
                Category::Teacher | Category::Workload | Category::Preference => {
                    teacher_problems.push(text)
                }
            }
        }

        let mut classes: Vec<ClassSchedule> = Vec::new();
        let mut class_pos: HashMap<&str, usize> = HashMap::new();
        let mut teachers: Vec<TeacherSchedule> = Vec::new();
        let mut teacher_pos: HashMap<&str, usize> = HashMap::new();

        for (i, (lesson, gene)) in problem.lessons().iter().zip(solution.genes()).enumerate() {
            let ts = problem.timeslots().get(gene.timeslot);
            let teacher_id = problem.teacher_of_lesson(i);
            let line = SlotLine {
                weekday: ts.map_or("?", |ts| ts.weekday.as_str()).to_string(),
                weekday_index: ts.and_then(|ts| ts.weekday_index()),
                label: ts.map_or("?", |ts| ts.label.as_str()).to_string(),
                shift: ts.and_then(|ts| ts.shift).map_or("?", |s| s.code()).to_string(),
                room: gene.room_id(problem).to_string(),
                class_id: lesson.class_id.clone(),
                subject: lesson.subject.clone(),
                teacher: teacher_id.map_or("N/A", |id| problem.teacher_name(id)).to_string(),
            };

            if let Some(id) = teacher_id {
                let at = *teacher_pos.entry(id).or_insert_with(|| {
                    teachers.push(TeacherSchedule {
                        teacher_id: id.to_string(),
                        name: problem.teacher_name(id).to_string(),
                        slots: Vec::new(),
                    });
                    teachers.len() - 1
                });
                teachers[at].slots.push(line.clone());
            }

            let at = *class_pos.entry(lesson.class_id.as_str()).or_insert_with(|| {
                classes.push(ClassSchedule {
                    class_id: lesson.class_id.clone(),
                    students: problem.class_size(&lesson.class_id),
                    slots: Vec::new(),
                });
                classes.len() - 1
            });
            classes[at].slots.push(line);
        }

        for class in &mut classes {
            class.slots.sort_by_cached_key(slot_order);
        }
        for teacher in &mut teachers {
            teacher.slots.sort_by_cached_key(slot_order);
        }

        Self {
            score: solution.score,
            room_problems,
            conflicts,
            teacher_problems,
            classes,
            teachers,
            rooms: room_usage(problem, solution),
        }
    }
}

/// Weekday position (Monday = 0, unknown last), then period label.
fn slot_order(line: &SlotLine) -> (usize, String) {
    (
        line.weekday_index.unwrap_or(UNKNOWN_WEEKDAY),
        line.label.clone(),
    )
}

fn room_usage(problem: &TimetableProblem, solution: &Solution) -> Vec<RoomUsage> {
    let mut lessons = vec![0usize; problem.room_ids().len()];
    let mut seats = vec![0u64; problem.room_ids().len()];
    for (lesson, gene) in problem.lessons().iter().zip(solution.genes()) {
        if gene.room < lessons.len() {
            lessons[gene.room] += 1;
            seats[gene.room] += u64::from(problem.class_size(&lesson.class_id));
        }
    }

    problem
        .room_ids()
        .iter()
        .enumerate()
        .map(|(r, id)| {
            let capacity = problem.room_capacity(id);
            let average_fill = capacity
                .filter(|&c| c > 0 && lessons[r] > 0)
                .map(|c| seats[r] as f64 / (f64::from(c) * lessons[r] as f64) * 100.0);
            RoomUsage {
                room: id.clone(),
                capacity,
                lessons: lessons[r],
                average_fill,
            }
        })
        .collect()
}

fn write_section(f: &mut fmt::Formatter<'_>, title: &str, items: &[String], empty: &str) -> fmt::Result {
    writeln!(f, "{title}:")?;
    if items.is_empty() {
        writeln!(f, " - {empty}")?;
    }
    for item in items {
        writeln!(f, " - {item}")?;
    }
    writeln!(f)
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== ALLOCATION REPORT (score {}) ===", self.score)?;
        writeln!(f)?;
        write_section(f, "Room problems", &self.room_problems, "No problems found.")?;
        write_section(f, "Scheduling conflicts", &self.conflicts, "No conflicts found.")?;
        write_section(f, "Teacher problems", &self.teacher_problems, "No problems found.")?;

        writeln!(f, "Weekly allocation by class:")?;
        writeln!(f)?;
        for class in &self.classes {
            writeln!(f, "Class {} - {} students", class.class_id, class.students)?;
            for s in &class.slots {
                writeln!(
                    f,
                    "   - {} | {} | {} | Room: {} | Subject: {} | Teacher: {}",
                    s.weekday, s.label, s.shift, s.room, s.subject, s.teacher
                )?;
            }
            writeln!(f, "{}", "-".repeat(70))?;
        }

        if !self.teachers.is_empty() {
            writeln!(f)?;
            writeln!(f, "Teacher schedules:")?;
            for teacher in &self.teachers {
                writeln!(f, "Teacher {} ({}):", teacher.name, teacher.teacher_id)?;
                for s in &teacher.slots {
                    writeln!(
                        f,
                        "   - {} | {} | Class {} | {} | Room: {}",
                        s.weekday, s.label, s.class_id, s.subject, s.room
                    )?;
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "Room usage:")?;
        for room in &self.rooms {
            match (room.capacity, room.average_fill) {
                (Some(cap), Some(fill)) => writeln!(
                    f,
                    "   - Room {}: {} lessons, capacity {cap}, average fill {fill:.2}%",
                    room.room, room.lessons
                )?,
                (Some(cap), None) => writeln!(
                    f,
                    "   - Room {}: {} lessons, capacity {cap}",
                    room.room, room.lessons
                )?,
                (None, _) => writeln!(
                    f,
                    "   - Room {}: {} lessons, not registered",
                    room.room, room.lessons
                )?,
            }
        }
        Ok(())
    }
}
