use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::slots::{Day, Shift};

// Type aliases for clarity
pub type CourseId = u32;
pub type LecturerId = u32;
pub type RoomId = u32;
pub type ProgramId = u32;
pub type TermId = u32;
pub type UserId = u32;
pub type ScheduleId = u32;

/// Externally approved lecturer for a course in one term, keyed by course.
pub type PreAssignments = HashMap<CourseId, LecturerId>;

/// A course the section has to take this semester.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDemand {
    pub id: CourseId,
    pub name: String,
    pub credit_units: u32,
    pub semester: u8,
    pub program_id: ProgramId,
}

/// A lecturer belonging to a study program.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecturer {
    pub id: LecturerId,
    pub name: String,
    pub program_id: ProgramId,
}

/// Represents a physical room with a given capacity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub capacity: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// One successfully placed course.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedItem {
    pub course_id: CourseId,
    pub lecturer_id: LecturerId,
    pub day: Day,
    pub slot_start: &'static str,
    pub slot_end: &'static str,
    pub room_id: RoomId,
    pub section_label: String,
    pub room_capacity: u32,
}

/// A course for which no free (lecturer, room, day, slot) tuple was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnplacedCourse {
    pub course_id: CourseId,
    pub name: String,
}

impl fmt::Display for UnplacedCourse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (course {})", self.name, self.course_id)
    }
}

/// Body of `POST /v1/schedules/generate`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub term_id: TermId,
    pub section_label: String,
    pub user_id: UserId,
    pub program_id: ProgramId,
    #[serde(default)]
    pub shift: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Result of a persisted generation run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub schedule_id: ScheduleId,
    pub seed: u64,
    pub placed_count: usize,
    pub unplaced_courses: Vec<String>,
}

/// Body of `POST /v1/schedule/place`: catalogs supplied inline, nothing persisted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRequest {
    pub section_label: String,
    #[serde(default)]
    pub shift: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
    pub courses: Vec<CourseDemand>,
    pub lecturers: Vec<Lecturer>,
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub assignments: PreAssignments,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementResponse {
    pub seed: u64,
    pub shift: Shift,
    pub placed: Vec<PlacedItem>,
    pub unplaced: Vec<UnplacedCourse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Draft,
}

/// A schedule as committed by the persistence boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    pub id: ScheduleId,
    pub status: ScheduleStatus,
    pub section_label: String,
    pub term_id: TermId,
    pub program_id: ProgramId,
    pub author_id: UserId,
    pub shift: Shift,
    pub items: Vec<PlacedItem>,
}

/// Listing entry for `GET /v1/schedules`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub id: ScheduleId,
    pub status: ScheduleStatus,
    pub section_label: String,
    pub term_id: TermId,
    pub program_id: ProgramId,
    pub item_count: usize,
}

impl From<&ScheduleRecord> for ScheduleSummary {
    fn from(record: &ScheduleRecord) -> Self {
        Self {
            id: record.id,
            status: record.status,
            section_label: record.section_label.clone(),
            term_id: record.term_id,
            program_id: record.program_id,
            item_count: record.items.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_defaults_to_active() {
        let room: Room = serde_json::from_str(r#"{"id": 1, "name": "A-101", "capacity": 40}"#)
            .unwrap();
        assert!(room.active);
    }

    #[test]
    fn generate_request_uses_camel_case() {
        let req: GenerateRequest = serde_json::from_str(
            r#"{"termId": 7, "sectionLabel": "3TI2", "userId": 9, "programId": 1}"#,
        )
        .unwrap();
        assert_eq!(req.section_label, "3TI2");
        assert_eq!(req.shift, None);
        assert_eq!(req.seed, None);
    }
}
