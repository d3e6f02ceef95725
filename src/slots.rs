//! Fixed teaching week and the occupancy bookkeeping used during placement.

use log::debug;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::data::{LecturerId, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A teaching window within a day, `HH:MM` wall-clock strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeSlot {
    pub start: &'static str,
    pub end: &'static str,
}

const MORNING_SLOTS: [TimeSlot; 3] = [
    TimeSlot { start: "07:30", end: "09:10" },
    TimeSlot { start: "09:20", end: "11:00" },
    TimeSlot { start: "11:10", end: "12:50" },
];

const AFTERNOON_SLOTS: [TimeSlot; 3] = [
    TimeSlot { start: "13:00", end: "14:40" },
    TimeSlot { start: "14:50", end: "16:30" },
    TimeSlot { start: "16:40", end: "18:20" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    #[default]
    Morning,
    Afternoon,
}

impl Shift {
    /// Resolves a shift name. Anything unrecognised (or missing) is the
    /// morning shift; this knob never fails a request.
    pub fn from_name(name: Option<&str>) -> Shift {
        match name.map(|n| n.trim().to_ascii_lowercase()).as_deref() {
            Some("morning") | Some("pagi") => Shift::Morning,
            Some("afternoon") | Some("siang") | Some("sore") => Shift::Afternoon,
            other => {
                if let Some(other) = other {
                    debug!("Unknown shift '{}', defaulting to morning", other);
                }
                Shift::Morning
            }
        }
    }

    pub fn slots(self) -> &'static [TimeSlot] {
        match self {
            Shift::Morning => &MORNING_SLOTS,
            Shift::Afternoon => &AFTERNOON_SLOTS,
        }
    }
}

/// One unit of contended resource-time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OccupancyKey {
    Lecturer(LecturerId, Day, &'static str),
    Room(RoomId, Day, &'static str),
    Section(String, Day, &'static str),
}

/// The three grow-only occupancy sets of a single placement run.
///
/// Keys are only ever inserted; nothing is released once booked.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    lecturers: HashSet<(LecturerId, Day, &'static str)>,
    rooms: HashSet<(RoomId, Day, &'static str)>,
    sections: HashMap<String, HashSet<(Day, &'static str)>>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when none of the three keys for this tuple is booked yet.
    pub fn is_free(
        &self,
        lecturer: LecturerId,
        room: RoomId,
        section: &str,
        day: Day,
        slot: &TimeSlot,
    ) -> bool {
        !self.lecturers.contains(&(lecturer, day, slot.start))
            && !self.rooms.contains(&(room, day, slot.start))
            && !self.section_booked(section, day, slot.start)
    }

    pub fn book(
        &mut self,
        lecturer: LecturerId,
        room: RoomId,
        section: &str,
        day: Day,
        slot: &TimeSlot,
    ) {
        self.lecturers.insert((lecturer, day, slot.start));
        self.rooms.insert((room, day, slot.start));
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert((day, slot.start));
    }

    fn section_booked(&self, section: &str, day: Day, start: &'static str) -> bool {
        self.sections
            .get(section)
            .is_some_and(|booked| booked.contains(&(day, start)))
    }

    pub fn contains(&self, key: &OccupancyKey) -> bool {
        match key {
            OccupancyKey::Lecturer(id, day, start) => self.lecturers.contains(&(*id, *day, *start)),
            OccupancyKey::Room(id, day, start) => self.rooms.contains(&(*id, *day, *start)),
            OccupancyKey::Section(label, day, start) => self.section_booked(label, *day, start),
        }
    }

    /// Total number of booked keys across the three sets.
    pub fn len(&self) -> usize {
        let sections: usize = self.sections.values().map(HashSet::len).sum();
        self.lecturers.len() + self.rooms.len() + sections
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
