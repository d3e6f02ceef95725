//! Read-only access to the course, lecturer, room and approval catalogs.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::data::{
    CourseDemand, CourseId, Lecturer, LecturerId, PreAssignments, ProgramId, Room, TermId,
};
use crate::error::{Result, ScheduleError};
use crate::section::SectionId;

/// Source of the inputs a placement run needs.
///
/// Implementations only read; the generator never writes through this trait.
pub trait Catalog: Send + Sync {
    fn courses_for(&self, program: ProgramId, semester: u8) -> Result<Vec<CourseDemand>>;

    fn lecturers_for(&self, program: ProgramId) -> Result<Vec<Lecturer>>;

    fn active_rooms(&self) -> Result<Vec<Room>>;

    /// Approved course → lecturer bindings. An empty map is a valid answer.
    fn active_assignments(
        &self,
        term: TermId,
        semester: u8,
        program: ProgramId,
    ) -> Result<PreAssignments>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// A lecturer's approved (or pending) claim on a course for one term.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub term_id: TermId,
    pub course_id: CourseId,
    pub lecturer_id: LecturerId,
    pub status: ApprovalStatus,
}

/// Catalog held in memory, typically loaded from a JSON document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InMemoryCatalog {
    pub courses: Vec<CourseDemand>,
    pub lecturers: Vec<Lecturer>,
    pub rooms: Vec<Room>,
    pub approvals: Vec<Approval>,
}

impl InMemoryCatalog {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let catalog = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!(
            "Loaded catalog from {}: {} courses, {} lecturers, {} rooms, {} approvals",
            path.display(),
            catalog.courses.len(),
            catalog.lecturers.len(),
            catalog.rooms.len(),
            catalog.approvals.len()
        );
        Ok(catalog)
    }
}

impl Catalog for InMemoryCatalog {
    fn courses_for(&self, program: ProgramId, semester: u8) -> Result<Vec<CourseDemand>> {
        Ok(self
            .courses
            .iter()
            .filter(|c| c.program_id == program && c.semester == semester)
            .cloned()
            .collect())
    }

    fn lecturers_for(&self, program: ProgramId) -> Result<Vec<Lecturer>> {
        Ok(self
            .lecturers
            .iter()
            .filter(|l| l.program_id == program)
            .cloned()
            .collect())
    }

    fn active_rooms(&self) -> Result<Vec<Room>> {
        Ok(self.rooms.iter().filter(|r| r.active).cloned().collect())
    }

    fn active_assignments(
        &self,
        term: TermId,
        semester: u8,
        program: ProgramId,
    ) -> Result<PreAssignments> {
        let in_scope: HashSet<CourseId> = self
            .courses
            .iter()
            .filter(|c| c.program_id == program && c.semester == semester)
            .map(|c| c.id)
            .collect();

        // later approvals for the same course overwrite earlier ones
        Ok(self
            .approvals
            .iter()
            .filter(|a| a.term_id == term && a.status == ApprovalStatus::Approved)
            .filter(|a| in_scope.contains(&a.course_id))
            .map(|a| (a.course_id, a.lecturer_id))
            .collect())
    }
}

/// Everything one generation run reads, fetched once and checked up front.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub courses: Vec<CourseDemand>,
    pub lecturers: Vec<Lecturer>,
    pub rooms: Vec<Room>,
    pub assignments: PreAssignments,
}

impl CatalogSnapshot {
    /// Reads all four catalogs for a section. Empty courses, lecturers or
    /// rooms are fatal and checked in that order.
    pub fn load(catalog: &dyn Catalog, section: &SectionId, term: TermId) -> Result<Self> {
        let program = section.program_id;
        let semester = section.semester;

        let courses = catalog.courses_for(program, semester)?;
        if courses.is_empty() {
            return Err(ScheduleError::NoCourses { program, semester });
        }
        let lecturers = catalog.lecturers_for(program)?;
        if lecturers.is_empty() {
            return Err(ScheduleError::NoLecturers { program });
        }
        let rooms = catalog.active_rooms()?;
        if rooms.is_empty() {
            return Err(ScheduleError::NoRooms);
        }
        let assignments = catalog.active_assignments(term, semester, program)?;

        debug!(
            "Snapshot for {} term {}: {} courses, {} lecturers, {} rooms, {} pre-assignments",
            section.label,
            term,
            courses.len(),
            lecturers.len(),
            rooms.len(),
            assignments.len()
        );

        Ok(Self {
            courses,
            lecturers,
            rooms,
            assignments,
        })
    }
}
