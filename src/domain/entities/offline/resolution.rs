use serde::{Deserialize, Serialize};

/// Decision for a queued mutation whose remote apply reported a version
/// mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Local payload overwrites remote; entry proceeds as a forced update.
    ApplyLocal,
    /// Local entry is discarded and the cache refreshed from the remote
    /// version.
    AcceptRemote,
    /// Record parked in conflict state until an external decision arrives.
    Defer,
}

/// Manual decision supplied through the boundary interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictOutcome {
    PreferLocal,
    PreferRemote,
}

impl ConflictOutcome {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "preferLocal" => Ok(ConflictOutcome::PreferLocal),
            "preferRemote" => Ok(ConflictOutcome::PreferRemote),
            other => Err(format!("Unknown conflict outcome: {other}")),
        }
    }
}
