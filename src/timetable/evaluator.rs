//! Constraint evaluator: genome → penalty score plus structured diagnostics.
//!
//! # Rules
//!
//! Per gene (lesson `i` placed at `(room, timeslot)`):
//!
//! | Rule | Kind | Penalty |
//! |------|------|---------|
//! | room has no capacity entry, or lies outside the room table | hard | `room_missing` (10), rest of this gene skipped |
//! | class larger than room | hard | `capacity_factor × overflow` (2×) |
//! | teacher id not in the teacher table | hard | `unknown_teacher` (10) |
//! | timeslot not among teacher's preferred | soft | `preference` (0.5) |
//! | subject not among teacher's favorites | soft | `preference` (0.5) |
//! | teacher not available in the shift | hard | `unavailable` (5) |
//!
//! Group passes, after all genes:
//!
//! | Rule | Kind | Penalty |
//! |------|------|---------|
//! | `k > 1` lessons in one `(room, timeslot)` | hard | `room_conflict × (k − 1)` (10×) |
//! | `k > 1` lessons of one teacher in one timeslot | hard | `teacher_conflict × (k − 1)` (10×) |
//! | teacher load above `max_workload` | hard | `workload_factor × excess` (2×) |
//!
//! Violations are reported in discovery order: per-gene findings by lesson
//! position, then room conflicts by the first lesson that occupied the cell,
//! teacher conflicts likewise, and workload excesses by the teacher's first
//! lesson.
//!
//! A timeslot index outside the timeslot table never collides with another
//! lesson and fails the teacher's preferred-timeslot and availability checks.

use std::collections::HashMap;

use super::genome::Gene;
use crate::domain::TimetableProblem;

/// Penalty weights for each rule.
///
/// The defaults make every hard violation outweigh any realistic number of
/// soft ones, so the search clears hard violations first.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PenaltyWeights {
    pub room_missing: f64,
    pub capacity_factor: f64,
    pub room_conflict: f64,
    pub teacher_conflict: f64,
    pub workload_factor: f64,
    pub preference: f64,
    pub unavailable: f64,
    pub unknown_teacher: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            room_missing: 10.0,
            capacity_factor: 2.0,
            room_conflict: 10.0,
            teacher_conflict: 10.0,
            workload_factor: 2.0,
            preference: 0.5,
            unavailable: 5.0,
            unknown_teacher: 10.0,
        }
    }
}

/// Rule family of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ViolationKind {
    RoomMissing,
    CapacityExceeded,
    RoomConflict,
    TeacherConflict,
    WorkloadExceeded,
    PreferenceMismatch,
    TeacherUnavailable,
    UnknownTeacher,
}

/// Whether a rule is structural or a preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Hard,
    Soft,
}

/// Display grouping of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    Room,
    Conflict,
    Teacher,
    Workload,
    Preference,
}

/// What went wrong, with the entities involved.
///
/// Lessons, rooms and timeslots are positions in the problem's tables;
/// use [`Violation::describe`] to render them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cause {
    /// Lesson placed in a room that has no capacity entry.
    RoomMissing { lesson: usize, room: usize },
    /// Lesson's class has more students than the room seats.
    CapacityExceeded {
        lesson: usize,
        room: usize,
        capacity: u32,
        students: u32,
    },
    /// Several lessons share one room in one timeslot.
    RoomConflict {
        room: usize,
        timeslot: usize,
        lessons: Vec<usize>,
    },
    /// One teacher has several lessons in one timeslot.
    TeacherConflict {
        teacher: String,
        timeslot: usize,
        lessons: Vec<usize>,
    },
    /// A teacher has more lessons than allowed.
    WorkloadExceeded { teacher: String, load: u32, max: u32 },
    /// Lesson placed outside the teacher's preferred timeslots.
    PreferredTimeslotMissed { lesson: usize, timeslot: usize },
    /// Lesson's subject is not one of the teacher's favorites.
    FavoriteSubjectMissed { lesson: usize },
    /// Lesson placed in a shift the teacher cannot work.
    TeacherUnavailable { lesson: usize, timeslot: usize },
    /// Lesson assigned to a teacher id with no profile.
    UnknownTeacher { lesson: usize },
}

/// One scored rule violation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Violation {
    /// Penalty this violation added to the score.
    pub penalty: f64,
    pub cause: Cause,
}

impl Violation {
    pub fn kind(&self) -> ViolationKind {
        match self.cause {
            Cause::RoomMissing { .. } => ViolationKind::RoomMissing,
            Cause::CapacityExceeded { .. } => ViolationKind::CapacityExceeded,
            Cause::RoomConflict { .. } => ViolationKind::RoomConflict,
            Cause::TeacherConflict { .. } => ViolationKind::TeacherConflict,
            Cause::WorkloadExceeded { .. } => ViolationKind::WorkloadExceeded,
            Cause::PreferredTimeslotMissed { .. } | Cause::FavoriteSubjectMissed { .. } => {
                ViolationKind::PreferenceMismatch
            }
            Cause::TeacherUnavailable { .. } => ViolationKind::TeacherUnavailable,
            Cause::UnknownTeacher { .. } => ViolationKind::UnknownTeacher,
        }
    }

    pub fn severity(&self) -> Severity {
        match self.kind() {
            ViolationKind::PreferenceMismatch => Severity::Soft,
            _ => Severity::Hard,
        }
    }

    pub fn category(&self) -> Category {
        match self.kind() {
            ViolationKind::RoomMissing | ViolationKind::CapacityExceeded => Category::Room,
            ViolationKind::RoomConflict => Category::Conflict,
            ViolationKind::TeacherConflict
            | ViolationKind::TeacherUnavailable
            | ViolationKind::UnknownTeacher => Category::Teacher,
            ViolationKind::WorkloadExceeded => Category::Workload,
            ViolationKind::PreferenceMismatch => Category::Preference,
        }
    }

    /// Renders a human-readable description against the problem tables.
    pub fn describe(&self, problem: &TimetableProblem) -> String {
        let lesson = |i: usize| problem.lessons()[i].to_string();
        let class = |i: usize| problem.lessons()[i].class_id.as_str();
        let room = |r: usize| problem.room_ids().get(r).map_or("?", String::as_str);
        let slot = |t: usize| problem.timeslots().get(t).map_or("?", |ts| ts.id.as_str());
        let teacher_of = |i: usize| {
            let id = problem.teacher_of_lesson(i).unwrap_or("?");
            format!("{} ({id})", problem.teacher_name(id))
        };
        let classes = |lessons: &[usize]| {
            lessons
                .iter()
                .map(|&i| class(i))
                .collect::<Vec<_>>()
                .join(", ")
        };

        match &self.cause {
            Cause::RoomMissing { lesson: l, room: r } => {
                format!("Room {} is not registered (lesson {}).", room(*r), lesson(*l))
            }
            Cause::CapacityExceeded {
                lesson: l,
                room: r,
                capacity,
                students,
            } => format!(
                "Room {} (capacity {capacity}) received class {} with {students} students.",
                room(*r),
                class(*l)
            ),
            Cause::RoomConflict {
                room: r,
                timeslot: t,
                lessons,
            } => format!(
                "Scheduling conflict: room {} booked for classes {} at {}.",
                room(*r),
                classes(lessons),
                slot(*t)
            ),
            Cause::TeacherConflict {
                teacher,
                timeslot: t,
                lessons,
            } => format!(
                "Teacher {} ({teacher}) double-booked at {} for classes {}.",
                problem.teacher_name(teacher),
                slot(*t),
                classes(lessons)
            ),
            Cause::WorkloadExceeded { teacher, load, max } => format!(
                "Teacher {} ({teacher}) exceeded workload ({load} > {max}).",
                problem.teacher_name(teacher)
            ),
            Cause::PreferredTimeslotMissed { lesson: l, timeslot: t } => format!(
                "Teacher {} does not prefer {} (class {}).",
                teacher_of(*l),
                slot(*t),
                class(*l)
            ),
            Cause::FavoriteSubjectMissed { lesson: l } => format!(
                "Teacher {} does not favor subject {} (class {}).",
                teacher_of(*l),
                problem.lessons()[*l].subject,
                class(*l)
            ),
            Cause::TeacherUnavailable { lesson: l, timeslot: t } => {
                let shift = problem
                    .timeslots()
                    .get(*t)
                    .and_then(|ts| ts.shift)
                    .map_or("?", |s| s.code());
                format!(
                    "Teacher {} is not available in shift {shift} but was placed with class {} at {}.",
                    teacher_of(*l),
                    class(*l),
                    slot(*t)
                )
            }
            Cause::UnknownTeacher { lesson: l } => format!(
                "Lesson {} is assigned to unknown teacher {}.",
                lesson(*l),
                problem.teacher_of_lesson(*l).unwrap_or("?")
            ),
        }
    }
}

/// Score and diagnostics of one genome.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    /// Sum of all penalties; `0.0` means every rule is satisfied.
    pub score: f64,
    /// Violations in discovery order.
    pub violations: Vec<Violation>,
}

impl Evaluation {
    /// Number of violations of one kind.
    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind() == kind).count()
    }

    /// Number of hard violations.
    pub fn hard_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity() == Severity::Hard)
            .count()
    }
}

/// Teacher data resolved for fast lookup.
#[derive(Debug, Clone)]
struct TeacherSlot {
    id: String,
    known: bool,
    max_workload: Option<u32>,
    /// Per timeslot: inside the preferred set. `None` when no preference.
    preferred: Option<Vec<bool>>,
    /// Per timeslot: shift is allowed. `None` when unrestricted.
    available: Option<Vec<bool>>,
}

/// Compiled form of the rule set for one problem.
///
/// Construction resolves every string lookup once; [`evaluate`](Self::evaluate)
/// then works on indices only. Evaluation is pure: the same genes always
/// yield the same score and violations.
#[derive(Debug, Clone)]
pub struct Evaluator {
    weights: PenaltyWeights,
    rooms: usize,
    timeslots: usize,
    /// Per room index.
    capacity: Vec<Option<u32>>,
    /// Per lesson.
    students: Vec<u32>,
    /// Per lesson: index into `teachers`.
    lesson_teacher: Vec<Option<usize>>,
    /// Per lesson: subject is acceptable to the lesson's teacher.
    subject_ok: Vec<bool>,
    /// Known teachers first, then ids without a profile, by first lesson.
    teachers: Vec<TeacherSlot>,
}

impl Evaluator {
    /// Compiles the rules for `problem` with default weights.
    pub fn new(problem: &TimetableProblem) -> Self {
        Self::with_weights(problem, PenaltyWeights::default())
    }

    /// Compiles the rules for `problem` with custom weights.
    pub fn with_weights(problem: &TimetableProblem, weights: PenaltyWeights) -> Self {
        let timeslots = problem.timeslots();

        let capacity = problem
            .room_ids()
            .iter()
            .map(|id| problem.room_capacity(id))
            .collect();
        let students = problem
            .lessons()
            .iter()
            .map(|l| problem.class_size(&l.class_id))
            .collect();

        let mut teachers: Vec<TeacherSlot> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut lesson_teacher = Vec::with_capacity(problem.genome_len());
        let mut subject_ok = Vec::with_capacity(problem.genome_len());

        for (pos, lesson) in problem.lessons().iter().enumerate() {
            let Some(id) = problem.teacher_of_lesson(pos) else {
                lesson_teacher.push(None);
                subject_ok.push(true);
                continue;
            };
            let profile = problem.teacher(id);
            let slot = *index.entry(id).or_insert_with(|| {
                teachers.push(match profile {
                    Some(t) => TeacherSlot {
                        id: t.id.clone(),
                        known: true,
                        max_workload: t.max_workload,
                        preferred: (!t.preferred_timeslots.is_empty()).then(|| {
                            timeslots
                                .iter()
                                .map(|ts| t.preferred_timeslots.contains(&ts.id))
                                .collect()
                        }),
                        available: (t.availability != Default::default()).then(|| {
                            timeslots
                                .iter()
                                .map(|ts| ts.shift.map_or(true, |s| t.availability.allows(s)))
                                .collect()
                        }),
                    },
                    None => TeacherSlot {
                        id: id.to_string(),
                        known: false,
                        max_workload: None,
                        preferred: None,
                        available: None,
                    },
                });
                teachers.len() - 1
            });
            lesson_teacher.push(Some(slot));
            subject_ok.push(profile.map_or(true, |t| t.likes_subject(&lesson.subject)));
        }

        Self {
            weights,
            rooms: problem.room_ids().len(),
            timeslots: timeslots.len(),
            capacity,
            students,
            lesson_teacher,
            subject_ok,
            teachers,
        }
    }

    /// Penalty weights in use.
    pub fn weights(&self) -> &PenaltyWeights {
        &self.weights
    }

    /// Scores `genes` and collects every violation.
    ///
    /// # Panics
    /// Panics if `genes` does not hold exactly one gene per lesson.
    pub fn evaluate(&self, genes: &[Gene]) -> Evaluation {
        let mut violations = Vec::new();
        let score = self.run(genes, Some(&mut violations));
        Evaluation { score, violations }
    }

    /// Scores `genes` without building diagnostics.
    ///
    /// # Panics
    /// Panics if `genes` does not hold exactly one gene per lesson.
    pub fn score(&self, genes: &[Gene]) -> f64 {
        self.run(genes, None)
    }

    fn run(&self, genes: &[Gene], mut out: Option<&mut Vec<Violation>>) -> f64 {
        assert_eq!(
            genes.len(),
            self.students.len(),
            "genome length must equal the number of lessons"
        );
        let w = &self.weights;
        let nt = self.timeslots;
        let mut score = 0.0;

        // (room, timeslot) occupancy and (teacher, timeslot) bookings,
        // dense, with cells listed in first-touch order.
        let mut room_cells = vec![0u32; self.rooms * nt];
        let mut room_order: Vec<usize> = Vec::new();
        let mut teacher_cells = vec![0u32; self.teachers.len() * nt];
        let mut teacher_order: Vec<usize> = Vec::new();
        let mut load = vec![0u32; self.teachers.len()];

        for (i, gene) in genes.iter().enumerate() {
            let Some(capacity) = self.capacity.get(gene.room).copied().flatten() else {
                score += w.room_missing;
                if let Some(out) = out.as_deref_mut() {
                    out.push(Violation {
                        penalty: w.room_missing,
                        cause: Cause::RoomMissing {
                            lesson: i,
                            room: gene.room,
                        },
                    });
                }
                continue;
            };

            let students = self.students[i];
            if capacity < students {
                let penalty = w.capacity_factor * f64::from(students - capacity);
                score += penalty;
                if let Some(out) = out.as_deref_mut() {
                    out.push(Violation {
                        penalty,
                        cause: Cause::CapacityExceeded {
                            lesson: i,
                            room: gene.room,
                            capacity,
                            students,
                        },
                    });
                }
            }

            let slot_known = gene.timeslot < nt;
            if slot_known {
                let cell = gene.room * nt + gene.timeslot;
                if room_cells[cell] == 0 {
                    room_order.push(cell);
                }
                room_cells[cell] += 1;
            }

            let Some(t) = self.lesson_teacher[i] else {
                continue;
            };
            load[t] += 1;
            if slot_known {
                let cell = t * nt + gene.timeslot;
                if teacher_cells[cell] == 0 {
                    teacher_order.push(cell);
                }
                teacher_cells[cell] += 1;
            }

            let teacher = &self.teachers[t];
            if !teacher.known {
                score += w.unknown_teacher;
                if let Some(out) = out.as_deref_mut() {
                    out.push(Violation {
                        penalty: w.unknown_teacher,
                        cause: Cause::UnknownTeacher { lesson: i },
                    });
                }
                continue;
            }
            if let Some(preferred) = &teacher.preferred {
                if preferred.get(gene.timeslot) != Some(&true) {
                    score += w.preference;
                    if let Some(out) = out.as_deref_mut() {
                        out.push(Violation {
                            penalty: w.preference,
                            cause: Cause::PreferredTimeslotMissed {
                                lesson: i,
                                timeslot: gene.timeslot,
                            },
                        });
                    }
                }
            }
            if !self.subject_ok[i] {
                score += w.preference;
                if let Some(out) = out.as_deref_mut() {
                    out.push(Violation {
                        penalty: w.preference,
                        cause: Cause::FavoriteSubjectMissed { lesson: i },
                    });
                }
            }
            if let Some(available) = &teacher.available {
                if available.get(gene.timeslot) != Some(&true) {
                    score += w.unavailable;
                    if let Some(out) = out.as_deref_mut() {
                        out.push(Violation {
                            penalty: w.unavailable,
                            cause: Cause::TeacherUnavailable {
                                lesson: i,
                                timeslot: gene.timeslot,
                            },
                        });
                    }
                }
            }
        }

        // Room conflicts
        for &cell in &room_order {
            let k = room_cells[cell];
            if k > 1 {
                let penalty = w.room_conflict * f64::from(k - 1);
                score += penalty;
                if let Some(out) = out.as_deref_mut() {
                    let (room, timeslot) = (cell / nt, cell % nt);
                    let lessons =
                        lessons_where(genes, |_, g| g.room == room && g.timeslot == timeslot);
                    out.push(Violation {
                        penalty,
                        cause: Cause::RoomConflict {
                            room,
                            timeslot,
                            lessons,
                        },
                    });
                }
            }
        }

        // Teacher conflicts
        for &cell in &teacher_order {
            let k = teacher_cells[cell];
            if k > 1 {
                let penalty = w.teacher_conflict * f64::from(k - 1);
                score += penalty;
                if let Some(out) = out.as_deref_mut() {
                    let (t, timeslot) = (cell / nt, cell % nt);
                    let lessons = lessons_where(genes, |i, g| {
                        matches!(self.capacity.get(g.room), Some(Some(_)))
                            && self.lesson_teacher[i] == Some(t)
                            && g.timeslot == timeslot
                    });
                    out.push(Violation {
                        penalty,
                        cause: Cause::TeacherConflict {
                            teacher: self.teachers[t].id.clone(),
                            timeslot,
                            lessons,
                        },
                    });
                }
            }
        }

        // Workload
        for (t, teacher) in self.teachers.iter().enumerate() {
            if let Some(max) = teacher.max_workload {
                if load[t] > max {
                    let penalty = w.workload_factor * f64::from(load[t] - max);
                    score += penalty;
                    if let Some(out) = out.as_deref_mut() {
                        out.push(Violation {
                            penalty,
                            cause: Cause::WorkloadExceeded {
                                teacher: teacher.id.clone(),
                                load: load[t],
                                max,
                            },
                        });
                    }
                }
            }
        }

        score
    }
}

fn lessons_where(genes: &[Gene], pred: impl Fn(usize, &Gene) -> bool) -> Vec<usize> {
    genes
        .iter()
        .enumerate()
        .filter(|(i, g)| pred(*i, g))
        .map(|(i, _)| i)
        .collect()
}
