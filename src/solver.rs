use crate::data::{
    CourseDemand, CourseId, Lecturer, LecturerId, PlacedItem, PreAssignments, Room,
    UnplacedCourse,
};
use crate::error::{Result, ScheduleError};
use crate::slots::{Day, Occupancy, OccupancyKey, Shift, TimeSlot};
use itertools::Itertools;
use log::{debug, info, trace, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

/// Everything a single placement run reads. All catalogs are fetched up front.
#[derive(Debug, Clone, Copy)]
pub struct PlacementInput<'a> {
    pub section_label: &'a str,
    pub shift: Shift,
    pub courses: &'a [CourseDemand],
    pub lecturers: &'a [Lecturer],
    pub rooms: &'a [Room],
    pub assignments: &'a PreAssignments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementLimits {
    /// Upper bound on (day, slot, lecturer, room) tuples examined per course.
    pub max_candidates_per_course: usize,
}

impl Default for PlacementLimits {
    fn default() -> Self {
        Self {
            max_candidates_per_course: 100_000,
        }
    }
}

/// Output of a run that placed at least one course.
#[derive(Debug, Clone)]
pub struct Placement {
    pub placed: Vec<PlacedItem>,
    pub unplaced: Vec<UnplacedCourse>,
    pub occupancy: Occupancy,
}

/// Randomized first-fit placement of every course of one section.
///
/// Courses are visited in shuffled order. For each one the days, slots,
/// candidate lecturers and rooms are shuffled independently and the first
/// tuple that is free for the lecturer, the room and the section is booked.
/// There is no backtracking: a course that finds nothing is reported in
/// [`Placement::unplaced`] and the run moves on.
///
/// Fails with [`ScheduleError::EmptySchedule`] when nothing could be placed.
pub fn place<R: Rng + ?Sized>(
    input: &PlacementInput<'_>,
    mut occupancy: Occupancy,
    limits: &PlacementLimits,
    rng: &mut R,
) -> Result<Placement> {
    let start_time = Instant::now();
    // lookups
    let lecturer_map: HashMap<LecturerId, &Lecturer> =
        input.lecturers.iter().map(|l| (l.id, l)).collect();
    let mut rooms: Vec<&Room> = input.rooms.iter().filter(|r| r.active).collect();

    let mut courses: Vec<&CourseDemand> = input.courses.iter().unique_by(|c| c.id).collect();
    if courses.len() != input.courses.len() {
        debug!(
            "Dropped {} duplicate course entries for section {}",
            input.courses.len() - courses.len(),
            input.section_label
        );
    }

    info!(
        "Placing {} courses for section {} with {} lecturers, {} rooms, {:?} shift...",
        courses.len(),
        input.section_label,
        lecturer_map.len(),
        rooms.len(),
        input.shift
    );

    courses.shuffle(rng);

    let mut placed = Vec::with_capacity(courses.len());
    let mut unplaced = Vec::new();

    for course in courses {
        let mut candidates: Vec<&Lecturer> = match input.assignments.get(&course.id) {
            Some(lecturer_id) => match lecturer_map.get(lecturer_id) {
                Some(lecturer) => vec![*lecturer],
                None => {
                    warn!(
                        "Pre-assigned lecturer {} of course {} ({}) is not in the pool; trying all",
                        lecturer_id, course.id, course.name
                    );
                    input.lecturers.iter().collect()
                }
            },
            None => input.lecturers.iter().collect(),
        };
        if candidates.len() > 1 {
            candidates.shuffle(rng);
        }

        let mut days = Day::ALL.to_vec();
        days.shuffle(rng);
        let mut slots: Vec<TimeSlot> = input.shift.slots().to_vec();
        slots.shuffle(rng);
        rooms.shuffle(rng);

        let search = SearchSpace {
            section: input.section_label,
            days: &days,
            slots: &slots,
            lecturers: &candidates,
            rooms: &rooms,
        };

        match search.first_free(&occupancy, limits.max_candidates_per_course) {
            Some((day, slot, lecturer, room)) => {
                occupancy.book(lecturer.id, room.id, input.section_label, day, &slot);
                trace!(
                    "Placed course {} with lecturer {} in room {} on {} {}-{}",
                    course.id, lecturer.id, room.id, day, slot.start, slot.end
                );
                placed.push(PlacedItem {
                    course_id: course.id,
                    lecturer_id: lecturer.id,
                    day,
                    slot_start: slot.start,
                    slot_end: slot.end,
                    room_id: room.id,
                    section_label: input.section_label.to_string(),
                    room_capacity: room.capacity,
                });
            }
            None => {
                debug!("No free slot for course {} ({})", course.id, course.name);
                unplaced.push(UnplacedCourse {
                    course_id: course.id,
                    name: course.name.clone(),
                });
            }
        }
    }

    let duration = start_time.elapsed();
    info!(
        "Placement for section {} finished in {:.2?}: {} placed, {} unplaced",
        input.section_label,
        duration,
        placed.len(),
        unplaced.len()
    );

    if placed.is_empty() {
        return Err(ScheduleError::EmptySchedule {
            courses: unplaced.len(),
        });
    }

    Ok(Placement {
        placed,
        unplaced,
        occupancy,
    })
}

struct SearchSpace<'a> {
    section: &'a str,
    days: &'a [Day],
    slots: &'a [TimeSlot],
    lecturers: &'a [&'a Lecturer],
    rooms: &'a [&'a Room],
}

impl<'a> SearchSpace<'a> {
    // day x slot x lecturer x room, in that nesting order
    fn first_free(
        &self,
        occupancy: &Occupancy,
        max_candidates: usize,
    ) -> Option<(Day, TimeSlot, &'a Lecturer, &'a Room)> {
        let mut examined = 0usize;
        for &day in self.days {
            for slot in self.slots {
                for &lecturer in self.lecturers {
                    for &room in self.rooms {
                        if examined >= max_candidates {
                            warn!(
                                "Gave up after examining {} candidates for section {}",
                                examined, self.section
                            );
                            return None;
                        }
                        examined += 1;
                        if occupancy.is_free(lecturer.id, room.id, self.section, day, slot) {
                            return Some((day, *slot, lecturer, room));
                        }
                    }
                }
            }
        }
        None
    }
}

/// Two placed items that book the same resource at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub resource: String,
    pub first_course: CourseId,
    pub second_course: CourseId,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is double-booked by courses {} and {}",
            self.resource, self.first_course, self.second_course
        )
    }
}

/// Lists every pair of items sharing a lecturer, room or section key.
pub fn find_conflicts(items: &[PlacedItem]) -> Vec<Conflict> {
    let by_key: HashMap<OccupancyKey, Vec<&PlacedItem>> = items
        .iter()
        .flat_map(|item| {
            [
                (OccupancyKey::Lecturer(item.lecturer_id, item.day, item.slot_start), item),
                (OccupancyKey::Room(item.room_id, item.day, item.slot_start), item),
                (
                    OccupancyKey::Section(item.section_label.clone(), item.day, item.slot_start),
                    item,
                ),
            ]
        })
        .into_group_map();

    let mut conflicts: Vec<Conflict> = by_key
        .into_iter()
        .filter(|(_, holders)| holders.len() > 1)
        .flat_map(|(key, holders)| {
            holders
                .into_iter()
                .tuple_combinations()
                .map(|(a, b)| Conflict {
                    resource: describe(&key),
                    first_course: a.course_id,
                    second_course: b.course_id,
                })
                .collect::<Vec<_>>()
        })
        .collect();
    conflicts.sort_by(|a, b| {
        (&a.resource, a.first_course, a.second_course).cmp(&(
            &b.resource,
            b.first_course,
            b.second_course,
        ))
    });
    conflicts
}

fn describe(key: &OccupancyKey) -> String {
    match key {
        OccupancyKey::Lecturer(id, day, start) => {
            format!("Lecturer {} on {} at {}", id, day, start)
        }
        OccupancyKey::Room(id, day, start) => format!("Room {} on {} at {}", id, day, start),
        OccupancyKey::Section(label, day, start) => {
            format!("Section {} on {} at {}", label, day, start)
        }
    }
}
