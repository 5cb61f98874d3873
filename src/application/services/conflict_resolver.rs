use crate::application::ports::offline_store::OfflineStore;
use crate::domain::entities::offline::{ConflictOutcome, Resolution, SyncQueueEntry};
use crate::domain::value_objects::offline::{ConflictPolicy, EntryId, OfflinePayload, SyncStatus};
use crate::shared::error::{AppError, Result};
use std::sync::Arc;
use tracing::info;

/// Decides the outcome when a queued mutation collides with a diverged
/// remote version. Unresolved conflicts are never silently lost: a deferred
/// record sits in `conflict` state, excluded from eviction and from dequeue,
/// until an external decision arrives.
pub struct ConflictResolver {
    store: Arc<dyn OfflineStore>,
}

impl ConflictResolver {
    pub fn new(store: Arc<dyn OfflineStore>) -> Self {
        Self { store }
    }

    /// Maps the configured policy to a resolution and applies its local side
    /// effects. The coordinator performs the remote side (forced apply) for
    /// `ApplyLocal`.
    pub async fn resolve(
        &self,
        entry: &SyncQueueEntry,
        remote_payload: &OfflinePayload,
        policy: ConflictPolicy,
    ) -> Result<Resolution> {
        match policy {
            ConflictPolicy::PreferLocal => Ok(Resolution::ApplyLocal),
            ConflictPolicy::PreferRemote => {
                self.accept_remote(entry, remote_payload).await?;
                Ok(Resolution::AcceptRemote)
            }
            ConflictPolicy::Manual => {
                self.defer(entry, remote_payload).await?;
                Ok(Resolution::Defer)
            }
        }
    }

    /// Discards the local mutation: the entry completes without applying and
    /// the cache is refreshed from the remote version.
    async fn accept_remote(
        &self,
        entry: &SyncQueueEntry,
        remote_payload: &OfflinePayload,
    ) -> Result<()> {
        self.store.mark_completed(&entry.id).await?;
        self.store
            .replace_record_payload(&entry.resource_id, remote_payload, SyncStatus::Synced)
            .await?;
        info!(
            target: "offline::conflict",
            entry = %entry.id,
            resource = %entry.resource_id,
            "conflict resolved by accepting the remote version"
        );
        Ok(())
    }

    /// Parks the record in conflict state with the remote payload attached,
    /// and returns the entry to pending without charging an attempt. Dequeue
    /// skips it until resolved.
    async fn defer(&self, entry: &SyncQueueEntry, remote_payload: &OfflinePayload) -> Result<()> {
        self.store.requeue(&entry.id).await?;
        self.store
            .set_record_status(&entry.resource_id, SyncStatus::Conflict)
            .await?;
        self.store
            .set_conflict_payload(&entry.resource_id, Some(remote_payload))
            .await?;
        info!(
            target: "offline::conflict",
            entry = %entry.id,
            resource = %entry.resource_id,
            "conflict deferred for manual resolution"
        );
        Ok(())
    }

    /// Applies an operator decision for a deferred conflict.
    pub async fn resolve_manual(&self, entry_id: &EntryId, outcome: ConflictOutcome) -> Result<()> {
        let entry = self
            .store
            .get_entry(entry_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Queue entry {entry_id} not found")))?;

        let record = self
            .store
            .get_record(&entry.resource_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Record {} not found", entry.resource_id))
            })?;

        if !record.in_conflict() {
            return Err(AppError::Validation(format!(
                "Record {} is not in conflict",
                entry.resource_id
            )));
        }

        match outcome {
            ConflictOutcome::PreferLocal => {
                // Next cycle picks the entry up and overwrites the remote.
                self.store.set_force_apply(&entry.id, true).await?;
                self.store
                    .set_record_status(&entry.resource_id, SyncStatus::Pending)
                    .await?;
                self.store
                    .set_conflict_payload(&entry.resource_id, None)
                    .await?;
            }
            ConflictOutcome::PreferRemote => {
                let remote = record.conflict_payload.ok_or_else(|| {
                    AppError::Internal(format!(
                        "Conflicted record {} has no parked remote payload",
                        entry.resource_id
                    ))
                })?;
                self.accept_remote(&entry, &remote).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::offline::MutationDraft;
    use crate::domain::value_objects::offline::{
        EntryStatus, Priority, QueueOperation, RecordId, ResourceType,
    };
    use crate::infrastructure::offline::SqliteOfflineStore;

    async fn setup() -> (ConflictResolver, Arc<SqliteOfflineStore>) {
        let store = Arc::new(SqliteOfflineStore::connect("sqlite::memory:", 1).await.unwrap());
        (ConflictResolver::new(store.clone()), store)
    }

    async fn syncing_entry(store: &SqliteOfflineStore) -> SyncQueueEntry {
        let entry = store
            .enqueue_mutation(MutationDraft {
                operation: QueueOperation::Update,
                resource_type: ResourceType::Documents,
                resource_id: RecordId::new("doc-1".into()).unwrap(),
                payload: OfflinePayload::from_json_str(r#"{"body":"local"}"#).unwrap(),
                priority: Priority::Medium,
                size_bytes: 32,
                max_attempts: 3,
                expires_at: None,
            })
            .await
            .unwrap();
        store.mark_syncing(&entry.id).await.unwrap();
        entry
    }

    fn remote() -> OfflinePayload {
        OfflinePayload::from_json_str(r#"{"body":"remote"}"#).unwrap()
    }

    #[tokio::test]
    async fn prefer_remote_completes_entry_and_refreshes_cache() {
        let (resolver, store) = setup().await;
        let entry = syncing_entry(&store).await;

        let resolution = resolver
            .resolve(&entry, &remote(), ConflictPolicy::PreferRemote)
            .await
            .unwrap();
        assert_eq!(resolution, Resolution::AcceptRemote);

        let reloaded = store.get_entry(&entry.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, EntryStatus::Completed);

        let record = store.get_record(&entry.resource_id).await.unwrap().unwrap();
        assert_eq!(record.sync_status, SyncStatus::Synced);
        assert_eq!(record.payload, remote());
    }

    #[tokio::test]
    async fn manual_policy_parks_record_and_skips_entry() {
        let (resolver, store) = setup().await;
        let entry = syncing_entry(&store).await;

        let resolution = resolver
            .resolve(&entry, &remote(), ConflictPolicy::Manual)
            .await
            .unwrap();
        assert_eq!(resolution, Resolution::Defer);

        let record = store.get_record(&entry.resource_id).await.unwrap().unwrap();
        assert!(record.in_conflict());
        assert_eq!(record.conflict_payload, Some(remote()));

        // The deferred entry is pending but invisible to dequeue.
        let reloaded = store.get_entry(&entry.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, EntryStatus::Pending);
        assert!(store.dequeue_batch(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn manual_prefer_local_flags_forced_apply() {
        let (resolver, store) = setup().await;
        let entry = syncing_entry(&store).await;
        resolver
            .resolve(&entry, &remote(), ConflictPolicy::Manual)
            .await
            .unwrap();

        resolver
            .resolve_manual(&entry.id, ConflictOutcome::PreferLocal)
            .await
            .unwrap();

        // Entry is dequeueable again and marked for forced overwrite.
        let batch = store.dequeue_batch(10).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert!(batch[0].force_apply);

        let record = store.get_record(&entry.resource_id).await.unwrap().unwrap();
        assert_eq!(record.sync_status, SyncStatus::Pending);
        assert!(record.conflict_payload.is_none());
    }

    #[tokio::test]
    async fn manual_prefer_remote_uses_parked_payload() {
        let (resolver, store) = setup().await;
        let entry = syncing_entry(&store).await;
        resolver
            .resolve(&entry, &remote(), ConflictPolicy::Manual)
            .await
            .unwrap();

        resolver
            .resolve_manual(&entry.id, ConflictOutcome::PreferRemote)
            .await
            .unwrap();

        let record = store.get_record(&entry.resource_id).await.unwrap().unwrap();
        assert_eq!(record.sync_status, SyncStatus::Synced);
        assert_eq!(record.payload, remote());
        assert!(record.conflict_payload.is_none());
    }

    #[tokio::test]
    async fn delete_conflict_parks_tombstone_and_resolves_from_it() {
        let (resolver, store) = setup().await;
        let entry = store
            .enqueue_mutation(MutationDraft {
                operation: QueueOperation::Delete,
                resource_type: ResourceType::Documents,
                resource_id: RecordId::new("doc-gone".into()).unwrap(),
                payload: OfflinePayload::from_json_str(r#"{"deleted":true}"#).unwrap(),
                priority: Priority::Medium,
                size_bytes: 16,
                max_attempts: 3,
                expires_at: None,
            })
            .await
            .unwrap();
        store.mark_syncing(&entry.id).await.unwrap();

        let resolution = resolver
            .resolve(&entry, &remote(), ConflictPolicy::Manual)
            .await
            .unwrap();
        assert_eq!(resolution, Resolution::Defer);

        // The retained tombstone carries the conflict state.
        let record = store.get_record(&entry.resource_id).await.unwrap().unwrap();
        assert!(record.in_conflict());
        assert_eq!(record.conflict_payload, Some(remote()));
        assert!(store.dequeue_batch(10).await.unwrap().is_empty());

        resolver
            .resolve_manual(&entry.id, ConflictOutcome::PreferRemote)
            .await
            .unwrap();

        let reloaded = store.get_entry(&entry.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, EntryStatus::Completed);
        let record = store.get_record(&entry.resource_id).await.unwrap().unwrap();
        assert_eq!(record.sync_status, SyncStatus::Synced);
        assert_eq!(record.payload, remote());
    }

    #[tokio::test]
    async fn resolve_manual_rejects_records_not_in_conflict() {
        let (resolver, store) = setup().await;
        let entry = syncing_entry(&store).await;

        let err = resolver
            .resolve_manual(&entry.id, ConflictOutcome::PreferLocal)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
