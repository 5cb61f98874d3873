use crate::application::ports::offline_store::OfflineStore;
use crate::domain::entities::offline::{OfflineRecordDraft, SyncSettings};
use crate::domain::value_objects::offline::{RecordId, SyncStatus};
use crate::shared::error::{AppError, Result};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Payloads above this size are skipped when `cache_large_payloads` is off.
const LARGE_PAYLOAD_BYTES: u64 = 1024 * 1024;

/// Result of a storage reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    /// Space was freed by evicting these records before admission.
    Evicted(Vec<RecordId>),
    /// Not cached: the payload exceeds the large-payload threshold and the
    /// settings opt out of caching those.
    Skipped,
}

/// Enforces the configured storage ceiling.
///
/// Eviction runs before the ceiling is crossed, never after: the sum of all
/// retained records' `size_bytes` stays within `max_storage_bytes` at every
/// point. Candidates go lowest priority first, then oldest-modified, with
/// critical resource types shielded while any other candidate exists, and
/// unsynced or conflicted records never touched at all — when only protected
/// records remain the reservation fails with `QuotaExceeded` instead.
pub struct StorageQuotaManager {
    store: Arc<dyn OfflineStore>,
}

impl StorageQuotaManager {
    pub fn new(store: Arc<dyn OfflineStore>) -> Self {
        Self { store }
    }

    /// Admits a record for offline caching, evicting under pressure.
    pub async fn admit(
        &self,
        mut draft: OfflineRecordDraft,
        settings: &SyncSettings,
    ) -> Result<Admission> {
        if !settings.cache_large_payloads && draft.size_bytes > LARGE_PAYLOAD_BYTES {
            return Ok(Admission::Skipped);
        }
        if draft.expires_at.is_none() && settings.retention_days > 0 {
            draft.expires_at =
                Some(Utc::now() + Duration::days(i64::from(settings.retention_days)));
        }

        let admission = self
            .reserve(draft.size_bytes, Some(&draft.id), settings)
            .await?;
        self.store.upsert_record(draft, SyncStatus::Synced).await?;
        Ok(admission)
    }

    /// Frees enough space for `size_bytes` or fails without side effects.
    /// When the write replaces an existing record (`replacing`), the bytes
    /// that record already holds are credited and it is never picked as an
    /// eviction victim.
    pub async fn reserve(
        &self,
        size_bytes: u64,
        replacing: Option<&RecordId>,
        settings: &SyncSettings,
    ) -> Result<Admission> {
        let ceiling = settings.max_storage_bytes;
        if size_bytes > ceiling {
            return Err(AppError::QuotaExceeded {
                requested: size_bytes,
                available: ceiling,
            });
        }

        self.store.purge_expired(Utc::now()).await?;

        let usage = self.store.storage_usage().await?;
        let credit = match replacing {
            Some(id) => self
                .store
                .get_record(id)
                .await?
                .map(|record| record.size_bytes)
                .unwrap_or(0),
            None => 0,
        };
        let free = ceiling.saturating_sub(usage.used_bytes.saturating_sub(credit));
        if size_bytes <= free {
            return Ok(Admission::Accepted);
        }
        let needed = size_bytes - free;

        let mut candidates = self.store.eviction_candidates().await?;
        if let Some(id) = replacing {
            candidates.retain(|record| record.id != *id);
        }
        let (shielded, open): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|record| {
            settings.prioritize_critical_data && record.resource_type.is_critical()
        });

        let mut victims = Vec::new();
        let mut freed: u64 = 0;
        for record in open.iter().chain(shielded.iter()) {
            if freed >= needed {
                break;
            }
            freed += record.size_bytes;
            victims.push(record.id.clone());
        }

        if freed < needed {
            warn!(
                target: "offline::quota",
                requested = size_bytes,
                free,
                "reservation refused; remaining records are protected"
            );
            return Err(AppError::QuotaExceeded {
                requested: size_bytes,
                available: free,
            });
        }

        for id in &victims {
            self.store.delete_record(id).await?;
        }
        info!(
            target: "offline::quota",
            evicted = victims.len(),
            freed,
            "evicted records to stay under the storage ceiling"
        );
        Ok(Admission::Evicted(victims))
    }

    /// Drops records whose `expires_at` elapsed. Unsynced and conflicted
    /// records are retained regardless of expiry.
    pub async fn purge_expired(&self) -> Result<u32> {
        self.store.purge_expired(Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::offline::MutationDraft;
    use crate::domain::value_objects::offline::{
        OfflinePayload, Priority, QueueOperation, ResourceType,
    };
    use crate::infrastructure::offline::SqliteOfflineStore;

    async fn setup() -> (StorageQuotaManager, Arc<SqliteOfflineStore>) {
        let store = Arc::new(SqliteOfflineStore::connect("sqlite::memory:", 1).await.unwrap());
        (StorageQuotaManager::new(store.clone()), store)
    }

    fn record(id: &str, resource_type: ResourceType, priority: Priority, size: u64) -> OfflineRecordDraft {
        OfflineRecordDraft {
            id: RecordId::new(id.to_string()).unwrap(),
            resource_type,
            payload: OfflinePayload::from_json_str(r#"{"k":"v"}"#).unwrap(),
            size_bytes: size,
            priority,
            expires_at: None,
        }
    }

    fn settings(ceiling: u64) -> SyncSettings {
        SyncSettings {
            max_storage_bytes: ceiling,
            ..SyncSettings::default()
        }
    }

    #[tokio::test]
    async fn accepts_when_under_ceiling() {
        let (quota, store) = setup().await;

        let admission = quota
            .admit(record("a", ResourceType::Notes, Priority::Medium, 100), &settings(1000))
            .await
            .unwrap();
        assert_eq!(admission, Admission::Accepted);
        assert_eq!(store.storage_usage().await.unwrap().used_bytes, 100);
    }

    #[tokio::test]
    async fn evicts_lowest_priority_oldest_first() {
        let (quota, store) = setup().await;
        let cfg = settings(250);

        store
            .upsert_record(record("low-old", ResourceType::Notes, Priority::Low, 100), SyncStatus::Synced)
            .await
            .unwrap();
        store
            .upsert_record(record("high", ResourceType::Notes, Priority::High, 100), SyncStatus::Synced)
            .await
            .unwrap();

        let admission = quota.reserve(100, None, &cfg).await.unwrap();
        assert_eq!(
            admission,
            Admission::Evicted(vec![RecordId::new("low-old".into()).unwrap()])
        );

        // The high-priority record survived.
        assert!(store
            .get_record(&RecordId::new("high".into()).unwrap())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn quota_exceeded_when_all_records_protected() {
        let (quota, store) = setup().await;
        let cfg = settings(200);

        // A record with pending queue work is never an eviction candidate.
        store
            .enqueue_mutation(MutationDraft {
                operation: QueueOperation::Create,
                resource_type: ResourceType::Notes,
                resource_id: RecordId::new("unsynced".into()).unwrap(),
                payload: OfflinePayload::from_json_str(r#"{"k":"v"}"#).unwrap(),
                priority: Priority::Low,
                size_bytes: 150,
                max_attempts: 3,
                expires_at: None,
            })
            .await
            .unwrap();

        let err = quota.reserve(100, None, &cfg).await.unwrap_err();
        assert!(matches!(err, AppError::QuotaExceeded { .. }));

        // No eviction occurred.
        assert_eq!(store.storage_usage().await.unwrap().record_count, 1);
    }

    #[tokio::test]
    async fn critical_records_evicted_only_as_last_resort() {
        let (quota, store) = setup().await;
        let cfg = settings(200);

        store
            .upsert_record(
                record("crisis", ResourceType::CrisisPlans, Priority::Low, 100),
                SyncStatus::Synced,
            )
            .await
            .unwrap();
        store
            .upsert_record(record("note", ResourceType::Notes, Priority::High, 100), SyncStatus::Synced)
            .await
            .unwrap();

        // The non-critical record goes first despite higher priority.
        let admission = quota.reserve(100, None, &cfg).await.unwrap();
        assert_eq!(
            admission,
            Admission::Evicted(vec![RecordId::new("note".into()).unwrap()])
        );

        // With only the critical record left, it becomes the last resort.
        let admission = quota.reserve(200, None, &cfg).await.unwrap();
        assert_eq!(
            admission,
            Admission::Evicted(vec![RecordId::new("crisis".into()).unwrap()])
        );
    }

    #[tokio::test]
    async fn large_payloads_skipped_when_caching_disabled() {
        let (quota, store) = setup().await;
        let mut cfg = settings(10 * 1024 * 1024);
        cfg.cache_large_payloads = false;

        let admission = quota
            .admit(
                record("big", ResourceType::Documents, Priority::Medium, 2 * 1024 * 1024),
                &cfg,
            )
            .await
            .unwrap();
        assert_eq!(admission, Admission::Skipped);
        assert_eq!(store.storage_usage().await.unwrap().record_count, 0);
    }

    #[tokio::test]
    async fn rewriting_a_record_credits_its_current_size() {
        let (quota, store) = setup().await;
        let cfg = settings(100);

        store
            .upsert_record(record("a", ResourceType::Notes, Priority::Low, 100), SyncStatus::Synced)
            .await
            .unwrap();

        // A same-size rewrite fits: the bytes being replaced count as free.
        let id = RecordId::new("a".into()).unwrap();
        let admission = quota.reserve(100, Some(&id), &cfg).await.unwrap();
        assert_eq!(admission, Admission::Accepted);
        assert!(store.get_record(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn oversized_request_fails_before_any_eviction() {
        let (quota, store) = setup().await;
        let cfg = settings(100);

        store
            .upsert_record(record("a", ResourceType::Notes, Priority::Low, 50), SyncStatus::Synced)
            .await
            .unwrap();

        let err = quota.reserve(500, None, &cfg).await.unwrap_err();
        assert!(matches!(err, AppError::QuotaExceeded { .. }));
        assert_eq!(store.storage_usage().await.unwrap().record_count, 1);
    }
}
