use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::solver::PlacementLimits;

#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "timetable_generator")]
#[command(about = "Generates conflict-free draft timetables for class sections")]
pub struct ServerConfig {
    #[arg(long, env = "TIMETABLE_BIND_ADDR", default_value = "127.0.0.1:8080")]
    pub bind_addr: SocketAddr,

    /// JSON document with courses, lecturers, rooms and approvals.
    #[arg(long, env = "TIMETABLE_CATALOG")]
    pub catalog_path: Option<PathBuf>,

    /// Upper bound on candidate tuples examined per course.
    #[arg(
        long,
        env = "TIMETABLE_MAX_CANDIDATES",
        default_value_t = 100_000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub max_candidates: u64,

    #[arg(long, help = "Enable debug logging")]
    pub verbose: bool,
}

impl ServerConfig {
    pub fn limits(&self) -> PlacementLimits {
        PlacementLimits {
            max_candidates_per_course: usize::try_from(self.max_candidates).unwrap_or(usize::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ServerConfig::try_parse_from(["timetable_generator"]).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.catalog_path, None);
        assert_eq!(cfg.limits(), PlacementLimits::default());
        assert!(!cfg.verbose);
    }

    #[test]
    fn overrides() {
        let cfg = ServerConfig::try_parse_from([
            "timetable_generator",
            "--bind-addr",
            "0.0.0.0:9000",
            "--catalog-path",
            "/srv/catalog.json",
            "--max-candidates",
            "500",
            "--verbose",
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.catalog_path, Some(PathBuf::from("/srv/catalog.json")));
        assert_eq!(cfg.limits().max_candidates_per_course, 500);
        assert!(cfg.verbose);
    }

    #[test]
    fn rejects_bad_values() {
        for args in [
            ["timetable_generator", "--bind-addr", "nowhere"],
            ["timetable_generator", "--max-candidates", "0"],
            ["timetable_generator", "--max-candidates", "-3"],
        ] {
            assert!(ServerConfig::try_parse_from(args).is_err(), "{args:?} should fail");
        }
    }
}
