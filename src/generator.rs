use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

use crate::catalog::{Catalog, CatalogSnapshot};
use crate::data::{
    GenerateRequest, GenerateResponse, PlacementRequest, PlacementResponse, ScheduleRecord,
    ScheduleSummary, ScheduleId,
};
use crate::error::{Result, ScheduleError};
use crate::section::parse_section;
use crate::slots::{Occupancy, Shift};
use crate::solver::{PlacementInput, PlacementLimits, place};
use crate::store::{DraftSchedule, ScheduleStore};

/// Glues the catalog, the placement engine and the store together.
#[derive(Clone)]
pub struct ScheduleService {
    catalog: Arc<dyn Catalog>,
    store: Arc<dyn ScheduleStore>,
    limits: PlacementLimits,
}

impl ScheduleService {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn ScheduleStore>,
        limits: PlacementLimits,
    ) -> Self {
        Self {
            catalog,
            store,
            limits,
        }
    }

    /// Generates and stores a draft timetable for one section.
    ///
    /// Label, program and catalog problems fail before any placement is
    /// attempted. Courses the engine could not place are returned by name
    /// next to the new schedule id; calling again with another seed may
    /// place them.
    pub fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let section = parse_section(&request.section_label)?;
        if section.program_id != request.program_id {
            return Err(ScheduleError::ProgramMismatch {
                parsed: section.program_id,
                requested: request.program_id,
            });
        }

        let snapshot = CatalogSnapshot::load(self.catalog.as_ref(), &section, request.term_id)?;
        let shift = Shift::from_name(request.shift.as_deref());
        let seed = request.seed.unwrap_or_else(rand::random);
        info!(
            "Generating schedule for {} term {} (seed {})",
            section.label, request.term_id, seed
        );

        let input = PlacementInput {
            section_label: &section.label,
            shift,
            courses: &snapshot.courses,
            lecturers: &snapshot.lecturers,
            rooms: &snapshot.rooms,
            assignments: &snapshot.assignments,
        };
        let placement = place(
            &input,
            Occupancy::new(),
            &self.limits,
            &mut StdRng::seed_from_u64(seed),
        )?;

        let placed_count = placement.placed.len();
        let unplaced_courses: Vec<String> =
            placement.unplaced.into_iter().map(|c| c.name).collect();
        if !unplaced_courses.is_empty() {
            warn!(
                "{} courses of {} could not be placed: {}",
                unplaced_courses.len(),
                section.label,
                unplaced_courses.join(", ")
            );
        }

        let schedule_id = self.store.commit_draft(DraftSchedule {
            section_label: section.label.clone(),
            term_id: request.term_id,
            program_id: section.program_id,
            author_id: request.user_id,
            shift,
            items: placement.placed,
        })?;

        Ok(GenerateResponse {
            schedule_id,
            seed,
            placed_count,
            unplaced_courses,
        })
    }

    pub fn schedule(&self, id: ScheduleId) -> Result<ScheduleRecord> {
        self.store.get(id)
    }

    pub fn schedules(&self) -> Result<Vec<ScheduleSummary>> {
        self.store.list()
    }
}

/// Runs the engine on inline catalogs without touching any store.
pub fn place_inline(
    request: &PlacementRequest,
    limits: &PlacementLimits,
) -> Result<PlacementResponse> {
    let section = parse_section(&request.section_label)?;
    if request.courses.is_empty() {
        return Err(ScheduleError::NoCourses {
            program: section.program_id,
            semester: section.semester,
        });
    }
    if request.lecturers.is_empty() {
        return Err(ScheduleError::NoLecturers {
            program: section.program_id,
        });
    }
    if !request.rooms.iter().any(|r| r.active) {
        return Err(ScheduleError::NoRooms);
    }

    let shift = Shift::from_name(request.shift.as_deref());
    let seed = request.seed.unwrap_or_else(rand::random);
    let input = PlacementInput {
        section_label: &section.label,
        shift,
        courses: &request.courses,
        lecturers: &request.lecturers,
        rooms: &request.rooms,
        assignments: &request.assignments,
    };
    let placement = place(&input, Occupancy::new(), limits, &mut StdRng::seed_from_u64(seed))?;

    Ok(PlacementResponse {
        seed,
        shift,
        placed: placement.placed,
        unplaced: placement.unplaced,
    })
}
