use axum::http::StatusCode;
use thiserror::Error;

use crate::data::{ProgramId, ScheduleId};

/// Fatal outcomes of a generation request.
///
/// Courses that could not be placed are not errors; they travel back to the
/// caller alongside the created schedule.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid section label '{label}': {reason}")]
    InvalidLabel { label: String, reason: String },

    #[error("Section belongs to program {parsed}, but program {requested} was requested")]
    ProgramMismatch { parsed: ProgramId, requested: ProgramId },

    #[error("No courses found for program {program} semester {semester}")]
    NoCourses { program: ProgramId, semester: u8 },

    #[error("No lecturers found for program {program}")]
    NoLecturers { program: ProgramId },

    #[error("No active rooms available")]
    NoRooms,

    #[error("None of the {courses} courses could be placed; try generating again")]
    EmptySchedule { courses: usize },

    #[error("Schedule {0} not found")]
    ScheduleNotFound(ScheduleId),

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScheduleError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScheduleError::InvalidLabel { .. } | ScheduleError::Json(_) => StatusCode::BAD_REQUEST,
            ScheduleError::ProgramMismatch { .. } => StatusCode::FORBIDDEN,
            ScheduleError::NoCourses { .. }
            | ScheduleError::NoLecturers { .. }
            | ScheduleError::NoRooms
            | ScheduleError::EmptySchedule { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ScheduleError::ScheduleNotFound(_) => StatusCode::NOT_FOUND,
            ScheduleError::Storage { .. } | ScheduleError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
