use crate::domain::entities::offline::{
    MutationDraft, OfflineRecord, OfflineRecordDraft, StorageUsage, SyncQueueEntry, SyncSettings,
};
use crate::domain::value_objects::offline::{EntryId, OfflinePayload, RecordId, SyncStatus};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable persistence behind the local cache and the mutation queue.
///
/// The queue contract this port must uphold:
/// - `enqueue_mutation` commits the queue append and the cache write in one
///   transaction; both exist or neither does.
/// - `dequeue_batch` returns only retry-eligible entries (pending/failed,
///   attempts below the ceiling, backoff elapsed, record not in conflict),
///   ordered by record priority then `created_at` ascending.
/// - `recover_interrupted` reverts every `syncing` row to `pending` so a
///   crash mid-apply is replayed (at-least-once).
#[async_trait]
pub trait OfflineStore: Send + Sync {
    // Queue
    async fn enqueue_mutation(&self, draft: MutationDraft) -> Result<SyncQueueEntry, AppError>;
    async fn dequeue_batch(&self, limit: u32) -> Result<Vec<SyncQueueEntry>, AppError>;
    async fn entries_by_ids(&self, ids: &[EntryId]) -> Result<Vec<SyncQueueEntry>, AppError>;
    async fn get_entry(&self, id: &EntryId) -> Result<Option<SyncQueueEntry>, AppError>;
    async fn list_entries(&self) -> Result<Vec<SyncQueueEntry>, AppError>;
    async fn mark_syncing(&self, id: &EntryId) -> Result<(), AppError>;
    async fn mark_completed(&self, id: &EntryId) -> Result<(), AppError>;
    /// Increments `attempts`; the entry stays retry-eligible until the
    /// attempt ceiling, after which `failed` is terminal.
    async fn mark_failed(
        &self,
        id: &EntryId,
        error: &str,
        next_attempt_at: Option<DateTime<Utc>>,
    ) -> Result<SyncQueueEntry, AppError>;
    /// Pins `attempts` to the ceiling: permanent (4xx-class) failures are
    /// never retried.
    async fn mark_permanently_failed(&self, id: &EntryId, error: &str) -> Result<(), AppError>;
    /// Returns a `syncing` entry to `pending` without charging an attempt
    /// (manual-conflict deferral).
    async fn requeue(&self, id: &EntryId) -> Result<(), AppError>;
    async fn set_force_apply(&self, id: &EntryId, force: bool) -> Result<(), AppError>;
    async fn recover_interrupted(&self) -> Result<u32, AppError>;
    async fn prune_completed(&self) -> Result<u32, AppError>;
    /// Pending + syncing entries, for clear-refusal and eviction protection.
    async fn unsynced_count(&self) -> Result<u64, AppError>;

    // Cache
    async fn upsert_record(&self, draft: OfflineRecordDraft, status: SyncStatus)
        -> Result<(), AppError>;
    async fn get_record(&self, id: &RecordId) -> Result<Option<OfflineRecord>, AppError>;
    async fn list_records(&self) -> Result<Vec<OfflineRecord>, AppError>;
    async fn set_record_status(&self, id: &RecordId, status: SyncStatus) -> Result<(), AppError>;
    async fn replace_record_payload(
        &self,
        id: &RecordId,
        payload: &OfflinePayload,
        status: SyncStatus,
    ) -> Result<(), AppError>;
    async fn set_conflict_payload(
        &self,
        id: &RecordId,
        remote: Option<&OfflinePayload>,
    ) -> Result<(), AppError>;
    async fn delete_record(&self, id: &RecordId) -> Result<(), AppError>;
    async fn storage_usage(&self) -> Result<StorageUsage, AppError>;
    /// Records eligible for quota eviction: no pending/syncing queue entry,
    /// not in conflict. Lowest priority first, then oldest-modified.
    async fn eviction_candidates(&self) -> Result<Vec<OfflineRecord>, AppError>;
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u32, AppError>;
    async fn clear_all(&self) -> Result<(), AppError>;

    // Settings and metadata
    async fn load_settings(&self) -> Result<SyncSettings, AppError>;
    async fn save_settings(&self, settings: &SyncSettings) -> Result<(), AppError>;
    async fn last_sync_time(&self) -> Result<Option<DateTime<Utc>>, AppError>;
    async fn set_last_sync_time(&self, at: DateTime<Utc>) -> Result<(), AppError>;
}
