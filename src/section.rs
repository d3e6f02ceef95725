use regex::Regex;
use std::sync::LazyLock;

use crate::data::ProgramId;
use crate::error::{Result, ScheduleError};

static LABEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9])([A-Z]+)([0-9]*)$").expect("valid section pattern"));

/// Study-program codes as they appear in section labels.
pub const PROGRAM_CODES: [(&str, ProgramId); 4] = [("TI", 1), ("TL", 2), ("TKBG", 3), ("TKJJ", 4)];

/// A decoded section label such as `3TI2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionId {
    pub label: String,
    pub semester: u8,
    pub program_id: ProgramId,
}

/// Decodes `<digit><letters><optional digits>` into semester and program.
///
/// The letter segment is matched against [`PROGRAM_CODES`] by longest prefix,
/// so `TKBG` wins over a hypothetical `TK`.
pub fn parse_section(label: &str) -> Result<SectionId> {
    let normalized = label.trim().to_ascii_uppercase();
    let invalid = |reason: &str| ScheduleError::InvalidLabel {
        label: label.to_string(),
        reason: reason.to_string(),
    };

    let caps = LABEL_PATTERN
        .captures(&normalized)
        .ok_or_else(|| invalid("expected <digit><letters><digits>, e.g. 3TI2"))?;

    let semester: u8 = caps[1]
        .parse()
        .map_err(|_| invalid("semester is not a digit"))?;

    let letters = &caps[2];
    let program_id = PROGRAM_CODES
        .iter()
        .filter(|(code, _)| letters.starts_with(code))
        .max_by_key(|(code, _)| code.len())
        .map(|(_, id)| *id)
        .ok_or_else(|| invalid("unknown program code"))?;

    Ok(SectionId {
        label: normalized,
        semester,
        program_id,
    })
}
