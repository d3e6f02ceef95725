//! Class-timetable generation for a single section.
//!
//! A section label such as `3TI2` selects a program and semester; the courses,
//! lecturers, rooms and approved lecturer bindings for it are read from a
//! [`catalog::Catalog`], placed by the randomized first-fit engine in
//! [`solver`], and stored as a draft through a [`store::ScheduleStore`].

pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod generator;
pub mod section;
pub mod server;
pub mod slots;
pub mod solver;
pub mod store;

pub use error::{Result, ScheduleError};
pub use generator::ScheduleService;
