use crate::domain::value_objects::offline::{
    EntryId, EntryStatus, OfflinePayload, Priority, QueueOperation, RecordId, ResourceType,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable record of one pending mutation awaiting application to the remote
/// store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncQueueEntry {
    pub id: EntryId,
    pub operation: QueueOperation,
    pub resource_type: ResourceType,
    pub resource_id: RecordId,
    pub payload: OfflinePayload,
    pub created_at: DateTime<Utc>,
    pub attempts: u32,
    pub max_attempts: u32,
    pub status: EntryStatus,
    pub error: Option<String>,
    /// Priority derived from the referenced record at read time; medium when
    /// the record is gone.
    pub priority: Priority,
    /// Earliest wall-clock time the next attempt may run (backoff gate).
    pub next_attempt_at: Option<DateTime<Utc>>,
    /// Set by a manual prefer-local decision: the next apply bypasses the
    /// remote version check.
    pub force_apply: bool,
}

impl SyncQueueEntry {
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, EntryStatus::Completed)
            || (self.status == EntryStatus::Failed && self.attempts >= self.max_attempts)
    }

    pub fn retry_eligible(&self) -> bool {
        matches!(self.status, EntryStatus::Pending | EntryStatus::Failed)
            && self.attempts < self.max_attempts
    }
}

/// A local mutation accepted while offline: the cache write and the queue
/// append it produces are committed atomically.
#[derive(Debug, Clone)]
pub struct MutationDraft {
    pub operation: QueueOperation,
    pub resource_type: ResourceType,
    pub resource_id: RecordId,
    pub payload: OfflinePayload,
    pub priority: Priority,
    pub size_bytes: u64,
    pub max_attempts: u32,
    pub expires_at: Option<DateTime<Utc>>,
}
