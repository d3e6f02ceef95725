use std::collections::HashSet;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use timetable_generator::catalog::InMemoryCatalog;
use timetable_generator::data::{CourseDemand, GenerateRequest, Lecturer, PreAssignments, Room};
use timetable_generator::slots::{Day, Occupancy, OccupancyKey, Shift};
use timetable_generator::solver::{PlacementInput, PlacementLimits, find_conflicts, place};
use timetable_generator::store::InMemoryStore;
use timetable_generator::{ScheduleError, ScheduleService};

fn courses(n: u32) -> Vec<CourseDemand> {
    (1..=n)
        .map(|id| CourseDemand {
            id,
            name: format!("Course {id}"),
            credit_units: 3,
            semester: 3,
            program_id: 1,
        })
        .collect()
}

fn lecturers(ids: &[u32]) -> Vec<Lecturer> {
    ids.iter()
        .map(|&id| Lecturer {
            id,
            name: format!("Lecturer {id}"),
            program_id: 1,
        })
        .collect()
}

fn rooms(ids: &[u32]) -> Vec<Room> {
    ids.iter()
        .map(|&id| Room {
            id,
            name: format!("R{id}"),
            capacity: 30 + id,
            active: true,
        })
        .collect()
}

#[test]
fn two_courses_fit_in_fifteen_slots() {
    let courses = courses(2);
    let lecturers = lecturers(&[1]);
    let rooms = rooms(&[1]);
    let assignments = PreAssignments::new();
    let input = PlacementInput {
        section_label: "3TI2",
        shift: Shift::Morning,
        courses: &courses,
        lecturers: &lecturers,
        rooms: &rooms,
        assignments: &assignments,
    };

    for seed in 0..50 {
        let out = place(
            &input,
            Occupancy::new(),
            &PlacementLimits::default(),
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap();
        assert_eq!(out.placed.len(), 2);
        assert!(out.unplaced.is_empty());
        assert!(find_conflicts(&out.placed).is_empty());
        assert!(out.placed.iter().all(|p| p.room_capacity == 31));
    }
}

#[test]
fn single_free_slot_places_exactly_one_pinned_course() {
    let courses = courses(2);
    let lecturers = lecturers(&[1]);
    let rooms = rooms(&[1]);
    let assignments: PreAssignments = [(1, 1), (2, 1)].into_iter().collect();
    let input = PlacementInput {
        section_label: "3TI2",
        shift: Shift::Morning,
        courses: &courses,
        lecturers: &lecturers,
        rooms: &rooms,
        assignments: &assignments,
    };

    for seed in 0..50 {
        // lecturer 1 is busy elsewhere in every slot but Wednesday 11:10
        let mut occupancy = Occupancy::new();
        for day in Day::ALL {
            for slot in Shift::Morning.slots() {
                if !(day == Day::Wednesday && slot.start == "11:10") {
                    occupancy.book(1, 50, "5TL1", day, slot);
                }
            }
        }

        let out = place(
            &input,
            occupancy,
            &PlacementLimits::default(),
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap();
        assert_eq!(out.placed.len(), 1);
        assert_eq!(out.unplaced.len(), 1);
        assert_eq!(out.placed[0].day, Day::Wednesday);
        assert_eq!(out.placed[0].slot_start, "11:10");
        assert_ne!(out.placed[0].course_id, out.unplaced[0].course_id);
    }
}

fn service_with(catalog: InMemoryCatalog) -> ScheduleService {
    ScheduleService::new(
        Arc::new(catalog),
        Arc::new(InMemoryStore::new()),
        PlacementLimits::default(),
    )
}

fn request(label: &str, seed: u64) -> GenerateRequest {
    GenerateRequest {
        term_id: 1,
        section_label: label.to_string(),
        user_id: 1,
        program_id: 1,
        shift: Some("morning".into()),
        seed: Some(seed),
    }
}

#[test]
fn no_rooms_fails_for_every_seed() {
    let catalog = InMemoryCatalog {
        courses: courses(2),
        lecturers: lecturers(&[1]),
        rooms: Vec::new(),
        approvals: Vec::new(),
    };
    let service = service_with(catalog);
    for seed in 0..20 {
        let err = service.generate(&request("3TI2", seed)).unwrap_err();
        assert!(matches!(err, ScheduleError::NoRooms));
    }
    assert!(service.schedules().unwrap().is_empty());
}

#[test]
fn unknown_program_code_is_invalid_label() {
    let service = service_with(InMemoryCatalog::default());
    let err = service.generate(&request("9ZZ", 1)).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidLabel { .. }));
}

#[test]
fn unresolvable_pre_assignment_falls_back_to_pool() {
    let courses = courses(1);
    let lecturers = lecturers(&[1, 2]);
    let rooms = rooms(&[1]);
    let assignments: PreAssignments = [(1, 99)].into_iter().collect();
    let input = PlacementInput {
        section_label: "3TI2",
        shift: Shift::Afternoon,
        courses: &courses,
        lecturers: &lecturers,
        rooms: &rooms,
        assignments: &assignments,
    };

    for seed in 0..50 {
        // lecturer 1 teaches elsewhere all week, so only lecturer 2 can take the course
        let mut occupancy = Occupancy::new();
        for day in Day::ALL {
            for slot in Shift::Morning.slots().iter().chain(Shift::Afternoon.slots()) {
                occupancy.book(1, 50, "5TL1", day, slot);
            }
        }

        let out = place(
            &input,
            occupancy,
            &PlacementLimits::default(),
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap();
        assert_eq!(out.placed.len(), 1);
        assert_eq!(out.placed[0].lecturer_id, 2);

        for day in Day::ALL {
            for slot in Shift::Afternoon.slots() {
                assert!(!out.occupancy.contains(&OccupancyKey::Lecturer(99, day, slot.start)));
            }
        }
    }
}

#[test]
fn coverage_conflicts_and_pre_assignments_hold_across_seeds() {
    let courses = courses(20);
    let lecturers = lecturers(&[1, 2, 3]);
    let rooms = rooms(&[1, 2]);
    let assignments: PreAssignments = [(1, 2), (2, 2), (3, 3)].into_iter().collect();
    let input = PlacementInput {
        section_label: "3TI2",
        shift: Shift::Morning,
        courses: &courses,
        lecturers: &lecturers,
        rooms: &rooms,
        assignments: &assignments,
    };

    for seed in 0..200 {
        let out = place(
            &input,
            Occupancy::new(),
            &PlacementLimits::default(),
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap();

        // the section itself only has 15 slots
        assert_eq!(out.placed.len(), 15);
        assert_eq!(out.unplaced.len(), 5);

        let placed: HashSet<u32> = out.placed.iter().map(|p| p.course_id).collect();
        let unplaced: HashSet<u32> = out.unplaced.iter().map(|u| u.course_id).collect();
        assert_eq!(placed.len(), out.placed.len());
        assert!(placed.is_disjoint(&unplaced));
        let all: HashSet<u32> = placed.union(&unplaced).copied().collect();
        assert_eq!(all, (1..=20).collect());

        assert!(find_conflicts(&out.placed).is_empty(), "seed {seed}");

        for item in &out.placed {
            if let Some(lecturer) = assignments.get(&item.course_id) {
                assert_eq!(item.lecturer_id, *lecturer);
            }
            assert!(out.occupancy.contains(&OccupancyKey::Section(
                "3TI2".into(),
                item.day,
                item.slot_start
            )));
        }
    }
}

#[test]
fn same_seed_same_schedule() {
    let courses = courses(12);
    let lecturers = lecturers(&[1, 2]);
    let rooms = rooms(&[1, 2, 3]);
    let assignments: PreAssignments = [(4, 1)].into_iter().collect();
    let input = PlacementInput {
        section_label: "5TKBG1",
        shift: Shift::Afternoon,
        courses: &courses,
        lecturers: &lecturers,
        rooms: &rooms,
        assignments: &assignments,
    };
    let run = |seed| {
        place(
            &input,
            Occupancy::new(),
            &PlacementLimits::default(),
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap()
    };

    let (a, b) = (run(42), run(42));
    assert_eq!(a.placed, b.placed);
    assert_eq!(a.unplaced, b.unplaced);
}

#[test]
fn sections_sharing_occupancy_never_collide() {
    let courses = courses(10);
    let lecturers = lecturers(&[1, 2]);
    let rooms = rooms(&[1]);
    let assignments = PreAssignments::new();
    let mut occupancy = Occupancy::new();
    let mut all_items = Vec::new();

    for label in ["3TI1", "3TI2"] {
        let input = PlacementInput {
            section_label: label,
            shift: Shift::Morning,
            courses: &courses,
            lecturers: &lecturers,
            rooms: &rooms,
            assignments: &assignments,
        };
        let out = place(
            &input,
            occupancy,
            &PlacementLimits::default(),
            &mut StdRng::seed_from_u64(9),
        )
        .unwrap();
        occupancy = out.occupancy;
        all_items.extend(out.placed);
    }

    // a single room caps both sections together at 15 slots
    assert_eq!(all_items.len(), 15);
    assert!(find_conflicts(&all_items).is_empty());
}
