//! Rooms, timeslots and teachers.

use std::collections::HashSet;

/// A room with a seating capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    /// Room identifier.
    pub id: String,
    /// Number of students the room seats.
    pub capacity: u32,
}

impl Room {
    /// Creates a room.
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            capacity,
        }
    }
}

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Parses an English or Portuguese weekday name (case-insensitive).
    ///
    /// ```
    /// use u_timetable::domain::Weekday;
    ///
    /// assert_eq!(Weekday::from_name("monday"), Some(Weekday::Monday));
    /// assert_eq!(Weekday::from_name("Terça"), Some(Weekday::Tuesday));
    /// assert_eq!(Weekday::from_name("Someday"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        let day = match name.as_str() {
            "monday" | "mon" | "segunda" | "segunda-feira" => Weekday::Monday,
            "tuesday" | "tue" | "terça" | "terca" | "terça-feira" => Weekday::Tuesday,
            "wednesday" | "wed" | "quarta" | "quarta-feira" => Weekday::Wednesday,
            "thursday" | "thu" | "quinta" | "quinta-feira" => Weekday::Thursday,
            "friday" | "fri" | "sexta" | "sexta-feira" => Weekday::Friday,
            "saturday" | "sat" | "sábado" | "sabado" => Weekday::Saturday,
            "sunday" | "sun" | "domingo" => Weekday::Sunday,
            _ => return None,
        };
        Some(day)
    }

    /// Position in the week: Monday = 0 … Sunday = 6.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Part of the day a timeslot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shift {
    Morning,
    Afternoon,
    Evening,
}

impl Shift {
    /// Parses a one-letter shift code: `M`, `A` or `E`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "M" | "m" => Some(Shift::Morning),
            "A" | "a" => Some(Shift::Afternoon),
            "E" | "e" => Some(Shift::Evening),
            _ => None,
        }
    }

    /// One-letter code of this shift.
    pub fn code(self) -> &'static str {
        match self {
            Shift::Morning => "M",
            Shift::Afternoon => "A",
            Shift::Evening => "E",
        }
    }
}

/// A bookable period of the week.
///
/// The weekday is kept as free text because it is only used for display
/// ordering; unrecognised names sort after every known day.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timeslot {
    /// Timeslot identifier.
    pub id: String,
    /// Weekday name as supplied.
    pub weekday: String,
    /// Shift, if known. Availability rules are skipped when `None`.
    pub shift: Option<Shift>,
    /// Display label, e.g. `"08:00-08:50"`.
    pub label: String,
}

impl Timeslot {
    /// Creates a timeslot whose label equals its id and with no shift.
    pub fn new(id: impl Into<String>, weekday: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            weekday: weekday.into(),
            shift: None,
        }
    }

    /// Sets the shift.
    pub fn with_shift(mut self, shift: Shift) -> Self {
        self.shift = Some(shift);
        self
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Weekday position for sorting, `None` when the name is unrecognised.
    pub fn weekday_index(&self) -> Option<usize> {
        Weekday::from_name(&self.weekday).map(Weekday::index)
    }
}

/// Shifts a teacher can work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShiftAvailability {
    pub morning: bool,
    pub afternoon: bool,
    pub evening: bool,
}

impl Default for ShiftAvailability {
    fn default() -> Self {
        Self::all()
    }
}

impl ShiftAvailability {
    /// Available in every shift.
    pub fn all() -> Self {
        Self {
            morning: true,
            afternoon: true,
            evening: true,
        }
    }

    /// Whether the teacher can work the given shift.
    pub fn allows(&self, shift: Shift) -> bool {
        match shift {
            Shift::Morning => self.morning,
            Shift::Afternoon => self.afternoon,
            Shift::Evening => self.evening,
        }
    }
}

/// Teacher profile used by the workload and preference rules.
///
/// # Examples
///
/// ```
/// use u_timetable::domain::Teacher;
///
/// let t = Teacher::new("P1")
///     .with_name("Ana")
///     .with_max_workload(20)
///     .with_preferred_timeslots(["MON-1", "MON-2"])
///     .with_favorite_subjects(["math"]);
/// assert_eq!(t.max_workload, Some(20));
/// assert!(t.prefers_timeslot("MON-1"));
/// assert!(!t.prefers_timeslot("TUE-1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Teacher {
    /// Teacher identifier.
    pub id: String,
    /// Display name; defaults to the id.
    pub name: String,
    /// Shift availability. Defaults to every shift.
    pub availability: ShiftAvailability,
    /// Maximum number of lessons per week, if bounded.
    pub max_workload: Option<u32>,
    /// Preferred timeslot ids. Empty means no preference.
    pub preferred_timeslots: HashSet<String>,
    /// Favorite subjects. Empty means no preference.
    pub favorite_subjects: HashSet<String>,
}

impl Teacher {
    /// Creates a teacher with no limits or preferences.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            availability: ShiftAvailability::default(),
            max_workload: None,
            preferred_timeslots: HashSet::new(),
            favorite_subjects: HashSet::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_availability(mut self, availability: ShiftAvailability) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_max_workload(mut self, max: u32) -> Self {
        self.max_workload = Some(max);
        self
    }

    pub fn with_preferred_timeslots<I, S>(mut self, timeslots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_timeslots = timeslots.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_favorite_subjects<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorite_subjects = subjects.into_iter().map(Into::into).collect();
        self
    }

    /// True when there is no timeslot preference or `timeslot` is preferred.
    pub fn prefers_timeslot(&self, timeslot: &str) -> bool {
        self.preferred_timeslots.is_empty() || self.preferred_timeslots.contains(timeslot)
    }

    /// True when there is no subject preference or `subject` is a favorite.
    pub fn likes_subject(&self, subject: &str) -> bool {
        self.favorite_subjects.is_empty() || self.favorite_subjects.contains(subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_order() {
        let names = ["Sunday", "Friday", "Monday", "Quarta"];
        let idx: Vec<_> = names
            .iter()
            .map(|n| Weekday::from_name(n).map(Weekday::index))
            .collect();
        assert_eq!(idx, vec![Some(6), Some(4), Some(0), Some(2)]);
    }

    #[test]
    fn test_shift_codes() {
        for shift in [Shift::Morning, Shift::Afternoon, Shift::Evening] {
            assert_eq!(Shift::from_code(shift.code()), Some(shift));
        }
        assert_eq!(Shift::from_code("?"), None);
    }

    #[test]
    fn test_timeslot_defaults() {
        let ts = Timeslot::new("T1", "Blursday");
        assert_eq!(ts.label, "T1");
        assert_eq!(ts.shift, None);
        assert_eq!(ts.weekday_index(), None);

        let ts = Timeslot::new("T2", "Tuesday")
            .with_shift(Shift::Evening)
            .with_label("19:00");
        assert_eq!(ts.weekday_index(), Some(1));
        assert_eq!(ts.label, "19:00");
    }

    #[test]
    fn test_availability() {
        let avail = ShiftAvailability {
            morning: true,
            afternoon: false,
            evening: true,
        };
        assert!(avail.allows(Shift::Morning));
        assert!(!avail.allows(Shift::Afternoon));
        assert!(ShiftAvailability::default().allows(Shift::Afternoon));
    }

    #[test]
    fn test_teacher_preferences_empty_means_any() {
        let t = Teacher::new("P9");
        assert_eq!(t.name, "P9");
        assert!(t.prefers_timeslot("anything"));
        assert!(t.likes_subject("anything"));

        let t = t.with_favorite_subjects(["art"]);
        assert!(t.likes_subject("art"));
        assert!(!t.likes_subject("math"));
    }
}
