use crate::domain::value_objects::offline::{
    OfflinePayload, Priority, RecordId, ResourceType, SyncStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Locally cached copy of a remote resource, independent of pending-mutation
/// state. `size_bytes` is the unit charged against the storage quota.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfflineRecord {
    pub id: RecordId,
    pub resource_type: ResourceType,
    pub payload: OfflinePayload,
    pub last_modified: DateTime<Utc>,
    pub size_bytes: u64,
    pub sync_status: SyncStatus,
    pub priority: Priority,
    pub expires_at: Option<DateTime<Utc>>,
    /// Remote payload parked when a manual conflict is deferred; cleared on
    /// resolution.
    pub conflict_payload: Option<OfflinePayload>,
}

impl OfflineRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| expiry <= now)
    }

    pub fn in_conflict(&self) -> bool {
        self.sync_status == SyncStatus::Conflict
    }
}

/// Admission parameters for a record fetched for offline use.
#[derive(Debug, Clone)]
pub struct OfflineRecordDraft {
    pub id: RecordId,
    pub resource_type: ResourceType,
    pub payload: OfflinePayload,
    pub size_bytes: u64,
    pub priority: Priority,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Aggregate cache accounting, read through the boundary interface.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StorageUsage {
    pub used_bytes: u64,
    pub record_count: u64,
}
