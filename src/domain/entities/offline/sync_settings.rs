use crate::domain::value_objects::offline::ConflictPolicy;
use serde::{Deserialize, Serialize};

/// Operator-controlled sync policy. Immutable during a cycle; the
/// coordinator snapshots it at cycle start and changes apply on the next one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    pub enable_offline_mode: bool,
    pub auto_sync: bool,
    pub sync_on_unmetered_only: bool,
    pub max_storage_bytes: u64,
    pub retention_days: u32,
    pub prioritize_critical_data: bool,
    pub background_sync: bool,
    pub conflict_resolution: ConflictPolicy,
    pub cache_large_payloads: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            enable_offline_mode: true,
            auto_sync: true,
            sync_on_unmetered_only: false,
            max_storage_bytes: 100 * 1024 * 1024,
            retention_days: 30,
            prioritize_critical_data: true,
            background_sync: true,
            conflict_resolution: ConflictPolicy::default(),
            cache_large_payloads: true,
        }
    }
}
