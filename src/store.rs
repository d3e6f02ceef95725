//! Persistence boundary for generated draft schedules.

use log::{info, warn};
use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::data::{
    PlacedItem, ProgramId, ScheduleId, ScheduleRecord, ScheduleStatus, ScheduleSummary, TermId,
    UserId,
};
use crate::error::{Result, ScheduleError};
use crate::slots::Shift;
use crate::solver::find_conflicts;

/// A schedule ready to be written: one parent plus its rows.
#[derive(Debug, Clone)]
pub struct DraftSchedule {
    pub section_label: String,
    pub term_id: TermId,
    pub program_id: ProgramId,
    pub author_id: UserId,
    pub shift: Shift,
    pub items: Vec<PlacedItem>,
}

pub trait ScheduleStore: Send + Sync {
    /// Writes the parent record and every row atomically, replacing any
    /// earlier draft for the same section and term. On error nothing changes.
    fn commit_draft(&self, draft: DraftSchedule) -> Result<ScheduleId>;

    fn get(&self, id: ScheduleId) -> Result<ScheduleRecord>;

    fn list(&self) -> Result<Vec<ScheduleSummary>>;
}

#[derive(Debug, Default)]
struct StoreState {
    next_id: ScheduleId,
    schedules: BTreeMap<ScheduleId, ScheduleRecord>,
}

/// Process-local store; one mutex acquisition per commit is the transaction.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StoreState>> {
        self.state.lock().map_err(|_| ScheduleError::Storage {
            message: "schedule store lock poisoned".to_string(),
        })
    }
}

impl ScheduleStore for InMemoryStore {
    fn commit_draft(&self, draft: DraftSchedule) -> Result<ScheduleId> {
        if draft.items.is_empty() {
            return Err(ScheduleError::Storage {
                message: "refusing to store a schedule without rows".to_string(),
            });
        }
        let conflicts = find_conflicts(&draft.items);
        if let Some(first) = conflicts.first() {
            warn!("Rejected draft for {} with {} conflicts", draft.section_label, conflicts.len());
            return Err(ScheduleError::Storage {
                message: format!("draft contains conflicting rows: {}", first),
            });
        }

        let mut state = self.lock()?;
        // one draft per (section, term): a regenerated draft supersedes the old one
        let superseded: Vec<ScheduleId> = state
            .schedules
            .values()
            .filter(|s| {
                s.status == ScheduleStatus::Draft
                    && s.section_label == draft.section_label
                    && s.term_id == draft.term_id
            })
            .map(|s| s.id)
            .collect();
        for old in superseded {
            state.schedules.remove(&old);
            info!("Draft schedule {} superseded by a new run for {}", old, draft.section_label);
        }

        state.next_id += 1;
        let id = state.next_id;
        let rows = draft.items.len();
        state.schedules.insert(
            id,
            ScheduleRecord {
                id,
                status: ScheduleStatus::Draft,
                section_label: draft.section_label,
                term_id: draft.term_id,
                program_id: draft.program_id,
                author_id: draft.author_id,
                shift: draft.shift,
                items: draft.items,
            },
        );
        info!("Stored draft schedule {} with {} rows", id, rows);
        Ok(id)
    }

    fn get(&self, id: ScheduleId) -> Result<ScheduleRecord> {
        self.lock()?
            .schedules
            .get(&id)
            .cloned()
            .ok_or(ScheduleError::ScheduleNotFound(id))
    }

    fn list(&self) -> Result<Vec<ScheduleSummary>> {
        Ok(self.lock()?.schedules.values().map(ScheduleSummary::from).collect())
    }
}
