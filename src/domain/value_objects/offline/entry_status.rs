use serde::{Deserialize, Serialize};

/// Queue entry state machine: pending -> syncing -> {completed | pending | failed}.
/// No transition skips `Syncing`; `Failed` with exhausted attempts is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Pending,
    Syncing,
    Completed,
    Failed,
}

impl EntryStatus {
    pub fn as_str(&self) -> &str {
        match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Syncing => "syncing",
            EntryStatus::Completed => "completed",
            EntryStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "pending" => Ok(EntryStatus::Pending),
            "syncing" => Ok(EntryStatus::Syncing),
            "completed" => Ok(EntryStatus::Completed),
            "failed" => Ok(EntryStatus::Failed),
            other => Err(format!("Unknown entry status: {other}")),
        }
    }
}
