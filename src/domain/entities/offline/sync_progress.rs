use crate::domain::value_objects::offline::EntryId;
use serde::{Deserialize, Serialize};

/// Progress of the in-flight cycle, published after every entry so long
/// syncs stay observable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncProgress {
    pub cycle_id: Option<String>,
    pub total: u32,
    pub completed: u32,
    pub failed: u32,
    pub conflicts: u32,
    pub current: Option<EntryId>,
    pub finished: bool,
}

impl SyncProgress {
    pub fn idle() -> Self {
        Self {
            cycle_id: None,
            total: 0,
            completed: 0,
            failed: 0,
            conflicts: 0,
            current: None,
            finished: true,
        }
    }

    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let processed = self.completed + self.failed + self.conflicts;
        ((u64::from(processed) * 100) / u64::from(self.total)).min(100) as u8
    }
}

/// Outcome summary of one coordinator cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncCycleSummary {
    pub cycle_id: String,
    pub completed: u32,
    pub failed: u32,
    pub conflicts: u32,
    /// True when the cycle stopped early (offline transition or deadline).
    pub aborted: bool,
}
