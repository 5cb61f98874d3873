use crate::domain::entities::offline::{OfflineRecord, SyncQueueEntry};
use crate::domain::value_objects::offline::{
    EntryId, EntryStatus, OfflinePayload, Priority, QueueOperation, RecordId, ResourceType,
    SyncStatus,
};
use crate::infrastructure::offline::rows::{OfflineRecordRow, SyncQueueEntryRow};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};

pub fn record_from_row(row: OfflineRecordRow) -> Result<OfflineRecord, AppError> {
    let conflict_payload = row
        .conflict_payload
        .as_deref()
        .map(OfflinePayload::from_json_str)
        .transpose()
        .map_err(AppError::Database)?;

    Ok(OfflineRecord {
        id: RecordId::new(row.id).map_err(AppError::Database)?,
        resource_type: ResourceType::parse(&row.resource_type).map_err(AppError::Database)?,
        payload: OfflinePayload::from_json_str(&row.payload).map_err(AppError::Database)?,
        last_modified: datetime_from_epoch(row.last_modified)?,
        size_bytes: row.size_bytes.max(0) as u64,
        sync_status: SyncStatus::parse(&row.sync_status).map_err(AppError::Database)?,
        priority: Priority::parse(&row.priority).map_err(AppError::Database)?,
        expires_at: row.expires_at.map(datetime_from_epoch).transpose()?,
        conflict_payload,
    })
}

pub fn entry_from_row(row: SyncQueueEntryRow) -> Result<SyncQueueEntry, AppError> {
    Ok(SyncQueueEntry {
        id: EntryId::new(row.id).map_err(AppError::Database)?,
        operation: QueueOperation::parse(&row.operation).map_err(AppError::Database)?,
        resource_type: ResourceType::parse(&row.resource_type).map_err(AppError::Database)?,
        resource_id: RecordId::new(row.resource_id).map_err(AppError::Database)?,
        payload: OfflinePayload::from_json_str(&row.payload).map_err(AppError::Database)?,
        created_at: datetime_from_epoch(row.created_at)?,
        attempts: row.attempts.max(0) as u32,
        max_attempts: row.max_attempts.max(0) as u32,
        status: EntryStatus::parse(&row.status).map_err(AppError::Database)?,
        error: row.error_message,
        priority: Priority::parse(&row.record_priority).unwrap_or_default(),
        next_attempt_at: row.next_attempt_at.map(datetime_from_epoch).transpose()?,
        force_apply: row.force_apply,
    })
}

pub fn datetime_from_epoch(secs: i64) -> Result<DateTime<Utc>, AppError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| AppError::Database(format!("Invalid stored timestamp: {secs}")))
}
