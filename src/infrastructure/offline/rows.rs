use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct OfflineRecordRow {
    pub id: String,
    pub resource_type: String,
    pub payload: String,
    pub last_modified: i64,
    pub size_bytes: i64,
    pub sync_status: String,
    pub priority: String,
    pub expires_at: Option<i64>,
    pub conflict_payload: Option<String>,
}

/// Queue row joined with the referenced record's priority
/// (`record_priority`, coalesced to medium when the record is gone).
#[derive(Debug, Clone, FromRow)]
pub struct SyncQueueEntryRow {
    pub id: String,
    pub operation: String,
    pub resource_type: String,
    pub resource_id: String,
    pub payload: String,
    pub created_at: i64,
    pub attempts: i64,
    pub max_attempts: i64,
    pub status: String,
    pub error_message: Option<String>,
    pub next_attempt_at: Option<i64>,
    pub force_apply: bool,
    pub record_priority: String,
}
