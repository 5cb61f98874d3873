use crate::application::ports::offline_store::OfflineStore;
use crate::application::services::{ConflictResolver, NetworkMonitor, StorageQuotaManager, SyncCoordinator};
use crate::application::services::quota::Admission;
use crate::domain::entities::offline::{
    ConflictOutcome, MutationDraft, OfflineRecord, SyncQueueEntry, SyncSettings,
};
use crate::domain::value_objects::offline::{
    EntryId, EntryStatus, OfflinePayload, Priority, QueueOperation, RecordId, ResourceType,
};
use crate::presentation::dto::offline::{
    ClearOfflineDataRequest, ClearOfflineDataResponse, GetOfflineDataRequest, GetSyncQueueRequest,
    NetworkStateResponse, OfflineDataResponse, OfflineRecordDto, ResolveConflictRequest,
    SaveMutationRequest, SaveMutationResponse, SyncProgressResponse, SyncQueueEntryDto,
    TriggerSyncRequest, TriggerSyncResponse, UpdateSyncSettingsRequest,
};
use crate::presentation::dto::Validate;
use crate::shared::config::SyncConfig;
use crate::shared::AppError;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

/// Transport-agnostic boundary over the offline services. Each method
/// validates its DTO, parses into domain types, calls a service, and maps
/// the result back.
pub struct OfflineHandler {
    store: Arc<dyn OfflineStore>,
    quota: Arc<StorageQuotaManager>,
    resolver: Arc<ConflictResolver>,
    coordinator: Arc<SyncCoordinator>,
    monitor: Arc<NetworkMonitor>,
    sync_config: SyncConfig,
}

impl OfflineHandler {
    pub fn new(
        store: Arc<dyn OfflineStore>,
        quota: Arc<StorageQuotaManager>,
        resolver: Arc<ConflictResolver>,
        coordinator: Arc<SyncCoordinator>,
        monitor: Arc<NetworkMonitor>,
        sync_config: SyncConfig,
    ) -> Self {
        Self {
            store,
            quota,
            resolver,
            coordinator,
            monitor,
            sync_config,
        }
    }

    /// Accepts a local mutation: reserves quota, then commits the cache
    /// write and the queue append atomically. Returns once the durable
    /// write lands; nothing blocks on sync.
    pub async fn save_mutation(
        &self,
        request: SaveMutationRequest,
    ) -> Result<SaveMutationResponse, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let operation =
            QueueOperation::parse(&request.operation).map_err(AppError::validation_mapper)?;
        let resource_type =
            ResourceType::parse(&request.resource_type).map_err(AppError::validation_mapper)?;
        let resource_id =
            RecordId::new(request.resource_id.clone()).map_err(AppError::validation_mapper)?;
        let priority = match request.priority.as_deref() {
            Some(value) => Priority::parse(value).map_err(AppError::validation_mapper)?,
            None => Priority::default(),
        };
        let payload = OfflinePayload::new(request.payload).map_err(AppError::validation_mapper)?;

        let settings = self.store.load_settings().await?;
        if !settings.enable_offline_mode {
            return Err(AppError::Validation(
                "Offline mode is disabled in settings".to_string(),
            ));
        }
        let size_bytes = payload.approximate_size();

        // Deletes shrink the cache; only additive mutations reserve space.
        let evicted = if operation == QueueOperation::Delete {
            Vec::new()
        } else {
            match self
                .quota
                .reserve(size_bytes, Some(&resource_id), &settings)
                .await?
            {
                Admission::Evicted(ids) => {
                    ids.into_iter().map(|id| id.to_string()).collect()
                }
                Admission::Accepted | Admission::Skipped => Vec::new(),
            }
        };

        let expires_at = if settings.retention_days > 0 {
            Some(Utc::now() + Duration::days(i64::from(settings.retention_days)))
        } else {
            None
        };

        let entry = self
            .store
            .enqueue_mutation(MutationDraft {
                operation,
                resource_type,
                resource_id,
                payload,
                priority,
                size_bytes,
                max_attempts: self.sync_config.max_attempts,
                expires_at,
            })
            .await?;

        info!(
            target: "offline::handler",
            entry = %entry.id,
            resource = %entry.resource_id,
            operation = entry.operation.as_str(),
            "mutation queued"
        );
        Ok(SaveMutationResponse {
            entry: map_entry(&entry),
            evicted,
        })
    }

    pub async fn get_offline_data(
        &self,
        request: GetOfflineDataRequest,
    ) -> Result<OfflineDataResponse, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let filter = match request.resource_type.as_deref() {
            Some(value) => Some(ResourceType::parse(value).map_err(AppError::validation_mapper)?),
            None => None,
        };

        let mut records = self.store.list_records().await?;
        if let Some(resource_type) = filter {
            records.retain(|record| record.resource_type == resource_type);
        }
        if let Some(limit) = request.limit {
            records.truncate(limit as usize);
        }

        let usage = self.store.storage_usage().await?;
        let last_synced_at = self.store.last_sync_time().await?;

        Ok(OfflineDataResponse {
            records: records.iter().map(map_record).collect(),
            used_bytes: usage.used_bytes,
            record_count: usage.record_count,
            last_synced_at: last_synced_at.map(|at| at.timestamp()),
        })
    }

    pub async fn get_sync_queue(
        &self,
        request: GetSyncQueueRequest,
    ) -> Result<Vec<SyncQueueEntryDto>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let filter = match request.status.as_deref() {
            Some(value) => Some(EntryStatus::parse(value).map_err(AppError::validation_mapper)?),
            None => None,
        };

        let mut entries = self.store.list_entries().await?;
        if let Some(status) = filter {
            entries.retain(|entry| entry.status == status);
        }
        Ok(entries.iter().map(map_entry).collect())
    }

    pub async fn get_settings(&self) -> Result<SyncSettings, AppError> {
        self.store.load_settings().await
    }

    /// Settings persist synchronously and take effect on the next cycle,
    /// never mid-cycle.
    pub async fn update_settings(
        &self,
        request: UpdateSyncSettingsRequest,
    ) -> Result<SyncSettings, AppError> {
        request.validate().map_err(AppError::Validation)?;
        self.store.save_settings(&request.settings).await?;
        Ok(request.settings)
    }

    /// Starts a cycle for the given subset (or everything eligible) and
    /// returns its handle without waiting.
    pub async fn trigger_sync(
        &self,
        request: TriggerSyncRequest,
    ) -> Result<TriggerSyncResponse, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let ids = match request.entry_ids {
            Some(raw) => Some(
                raw.into_iter()
                    .map(|id| EntryId::new(id).map_err(AppError::validation_mapper))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };

        let cycle_id = self.coordinator.spawn_cycle(ids);
        Ok(TriggerSyncResponse { cycle_id })
    }

    pub async fn sync_progress(&self) -> Result<SyncProgressResponse, AppError> {
        let progress = self.coordinator.progress();
        let queue = self.store.unsynced_count().await?;
        let usage = self.store.storage_usage().await?;

        Ok(SyncProgressResponse {
            cycle_id: progress.cycle_id.clone(),
            progress: progress.percent(),
            queue,
            data: usage.record_count,
            completed: progress.finished,
            total: progress.total,
            synced: progress.completed,
            failed: progress.failed,
            conflicts: progress.conflicts,
            current: progress.current.map(|id| id.to_string()),
        })
    }

    pub fn network_state(&self) -> NetworkStateResponse {
        let state = self.monitor.current();
        NetworkStateResponse {
            is_online: state.is_online,
            connection_type: state.connection_type.as_str().to_string(),
            effective_speed: state.effective_speed.as_str().to_string(),
            metered: state.metered,
        }
    }

    /// Clears cache and queue. Refused while unsynced work exists unless
    /// `force` is set.
    pub async fn clear_offline_data(
        &self,
        request: ClearOfflineDataRequest,
    ) -> Result<ClearOfflineDataResponse, AppError> {
        let pending = self.store.unsynced_count().await?;
        if pending > 0 && !request.force {
            return Err(AppError::UnsyncedWorkPresent { pending });
        }

        self.store.clear_all().await?;
        info!(target: "offline::handler", discarded = pending, "offline data cleared");
        Ok(ClearOfflineDataResponse { cleared: true })
    }

    pub async fn resolve_conflict(&self, request: ResolveConflictRequest) -> Result<(), AppError> {
        request.validate().map_err(AppError::Validation)?;

        let entry_id = EntryId::new(request.entry_id).map_err(AppError::validation_mapper)?;
        let outcome =
            ConflictOutcome::parse(&request.outcome).map_err(AppError::validation_mapper)?;
        self.resolver.resolve_manual(&entry_id, outcome).await
    }
}

fn map_record(record: &OfflineRecord) -> OfflineRecordDto {
    OfflineRecordDto {
        id: record.id.to_string(),
        resource_type: record.resource_type.as_str().to_string(),
        payload: record.payload.as_json().clone(),
        last_modified: record.last_modified.timestamp(),
        size_bytes: record.size_bytes,
        sync_status: record.sync_status.as_str().to_string(),
        priority: record.priority.as_str().to_string(),
        expires_at: record.expires_at.map(|at| at.timestamp()),
        conflict_payload: record
            .conflict_payload
            .as_ref()
            .map(|payload| payload.as_json().clone()),
    }
}

fn map_entry(entry: &SyncQueueEntry) -> SyncQueueEntryDto {
    SyncQueueEntryDto {
        id: entry.id.to_string(),
        operation: entry.operation.as_str().to_string(),
        resource_type: entry.resource_type.as_str().to_string(),
        resource_id: entry.resource_id.to_string(),
        payload: entry.payload.as_json().clone(),
        created_at: entry.created_at.timestamp(),
        attempts: entry.attempts,
        max_attempts: entry.max_attempts,
        status: entry.status.as_str().to_string(),
        error_message: entry.error.clone(),
        priority: entry.priority.as_str().to_string(),
        next_attempt_at: entry.next_attempt_at.map(|at| at.timestamp()),
        force_apply: entry.force_apply,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::connectivity::ConnectivityProbe;
    use crate::application::ports::remote_store::{ApplyMode, RemoteError, RemoteStore};
    use crate::domain::entities::offline::NetworkState;
    use crate::infrastructure::offline::SqliteOfflineStore;
    use async_trait::async_trait;
    use serde_json::json;

    struct AlwaysOnline;

    #[async_trait]
    impl ConnectivityProbe for AlwaysOnline {
        async fn sample(&self) -> Option<NetworkState> {
            Some(NetworkState::default())
        }
    }

    struct AcceptingRemote;

    #[async_trait]
    impl RemoteStore for AcceptingRemote {
        async fn apply(
            &self,
            _entry: &SyncQueueEntry,
            _mode: ApplyMode,
        ) -> Result<(), RemoteError> {
            Ok(())
        }
    }

    async fn handler() -> OfflineHandler {
        let store: Arc<SqliteOfflineStore> =
            Arc::new(SqliteOfflineStore::connect("sqlite::memory:", 1).await.unwrap());
        let monitor = Arc::new(NetworkMonitor::new(Arc::new(AlwaysOnline)));
        let resolver = Arc::new(ConflictResolver::new(store.clone()));
        let quota = Arc::new(StorageQuotaManager::new(store.clone()));
        let sync_config = crate::shared::config::AppConfig::default().sync;
        let coordinator = Arc::new(SyncCoordinator::new(
            store.clone(),
            Arc::new(AcceptingRemote),
            resolver.clone(),
            monitor.clone(),
            sync_config.clone(),
        ));
        OfflineHandler::new(store, quota, resolver, coordinator, monitor, sync_config)
    }

    fn mutation(resource_id: &str) -> SaveMutationRequest {
        SaveMutationRequest {
            operation: "update".into(),
            resource_type: "notes".into(),
            resource_id: resource_id.into(),
            payload: json!({"body": "hello"}),
            priority: Some("high".into()),
        }
    }

    #[tokio::test]
    async fn save_mutation_round_trips_through_queue_and_cache() {
        let handler = handler().await;

        let saved = handler.save_mutation(mutation("note-1")).await.unwrap();
        assert_eq!(saved.entry.status, "pending");
        assert_eq!(saved.entry.priority, "high");
        assert!(saved.evicted.is_empty());

        let data = handler
            .get_offline_data(GetOfflineDataRequest {
                resource_type: Some("notes".into()),
                limit: None,
            })
            .await
            .unwrap();
        assert_eq!(data.record_count, 1);
        assert_eq!(data.records[0].sync_status, "pending");

        let queue = handler
            .get_sync_queue(GetSyncQueueRequest {
                status: Some("pending".into()),
            })
            .await
            .unwrap();
        assert_eq!(queue.len(), 1);
    }

    #[tokio::test]
    async fn save_mutation_rejects_malformed_input() {
        let handler = handler().await;

        let mut request = mutation("note-1");
        request.operation = "upsert".into();
        let err = handler.save_mutation(request).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut request = mutation("note-1");
        request.payload = serde_json::Value::Null;
        let err = handler.save_mutation(request).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn clear_refuses_unsynced_work_unless_forced() {
        let handler = handler().await;
        handler.save_mutation(mutation("note-1")).await.unwrap();

        let err = handler
            .clear_offline_data(ClearOfflineDataRequest { force: false })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnsyncedWorkPresent { pending: 1 }));

        let cleared = handler
            .clear_offline_data(ClearOfflineDataRequest { force: true })
            .await
            .unwrap();
        assert!(cleared.cleared);

        let data = handler
            .get_offline_data(GetOfflineDataRequest {
                resource_type: None,
                limit: None,
            })
            .await
            .unwrap();
        assert_eq!(data.record_count, 0);
    }

    #[tokio::test]
    async fn settings_update_validates_and_persists() {
        let handler = handler().await;

        let mut settings = SyncSettings::default();
        settings.max_storage_bytes = 0;
        let err = handler
            .update_settings(UpdateSyncSettingsRequest { settings })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut settings = SyncSettings::default();
        settings.retention_days = 7;
        handler
            .update_settings(UpdateSyncSettingsRequest {
                settings: settings.clone(),
            })
            .await
            .unwrap();
        assert_eq!(handler.get_settings().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn mutations_refused_while_offline_mode_disabled() {
        let handler = handler().await;

        let mut settings = SyncSettings::default();
        settings.enable_offline_mode = false;
        handler
            .update_settings(UpdateSyncSettingsRequest { settings })
            .await
            .unwrap();

        let err = handler.save_mutation(mutation("note-1")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn sync_progress_reports_queue_depth() {
        let handler = handler().await;
        handler.save_mutation(mutation("note-1")).await.unwrap();

        let progress = handler.sync_progress().await.unwrap();
        assert_eq!(progress.queue, 1);
        assert_eq!(progress.data, 1);
        assert!(progress.completed);
    }
}
