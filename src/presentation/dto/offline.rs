use crate::domain::entities::offline::SyncSettings;
use crate::presentation::dto::Validate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineRecordDto {
    pub id: String,
    pub resource_type: String,
    pub payload: Value,
    pub last_modified: i64,
    pub size_bytes: u64,
    pub sync_status: String,
    pub priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict_payload: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncQueueEntryDto {
    pub id: String,
    pub operation: String,
    pub resource_type: String,
    pub resource_id: String,
    pub payload: Value,
    pub created_at: i64,
    pub attempts: u32,
    pub max_attempts: u32,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_attempt_at: Option<i64>,
    pub force_apply: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetOfflineDataRequest {
    pub resource_type: Option<String>,
    pub limit: Option<i32>,
}

impl Validate for GetOfflineDataRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(limit) = self.limit {
            if limit <= 0 || limit > 1000 {
                return Err("Limit must be between 1 and 1000".to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineDataResponse {
    pub records: Vec<OfflineRecordDto>,
    pub used_bytes: u64,
    pub record_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_synced_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMutationRequest {
    pub operation: String,
    pub resource_type: String,
    pub resource_id: String,
    pub payload: Value,
    pub priority: Option<String>,
}

impl Validate for SaveMutationRequest {
    fn validate(&self) -> Result<(), String> {
        if self.operation.is_empty() {
            return Err("Operation is required".to_string());
        }
        if self.resource_type.is_empty() {
            return Err("Resource type is required".to_string());
        }
        if self.resource_id.is_empty() {
            return Err("Resource ID is required".to_string());
        }
        if self.payload.is_null() {
            return Err("Payload is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMutationResponse {
    pub entry: SyncQueueEntryDto,
    /// Records evicted to make room, empty when none were.
    pub evicted: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSyncQueueRequest {
    pub status: Option<String>,
}

impl Validate for GetSyncQueueRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(status) = self.status.as_deref() {
            if !matches!(status, "pending" | "syncing" | "completed" | "failed") {
                return Err(format!("Unknown queue status: {status}"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerSyncRequest {
    pub entry_ids: Option<Vec<String>>,
}

impl Validate for TriggerSyncRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(ids) = &self.entry_ids {
            if ids.is_empty() {
                return Err("Entry ID list must not be empty when present".to_string());
            }
            if ids.iter().any(|id| id.is_empty()) {
                return Err("Entry IDs must not be empty".to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerSyncResponse {
    pub cycle_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncProgressResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_id: Option<String>,
    /// 0..=100.
    pub progress: u8,
    /// Unsynced queue entries remaining.
    pub queue: u64,
    /// Records currently cached.
    pub data: u64,
    pub completed: bool,
    pub total: u32,
    pub synced: u32,
    pub failed: u32,
    pub conflicts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSyncSettingsRequest {
    pub settings: SyncSettings,
}

impl Validate for UpdateSyncSettingsRequest {
    fn validate(&self) -> Result<(), String> {
        if self.settings.max_storage_bytes == 0 {
            return Err("Storage ceiling must be positive".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearOfflineDataRequest {
    /// When false, the request is refused while unsynced queue work exists.
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearOfflineDataResponse {
    pub cleared: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveConflictRequest {
    pub entry_id: String,
    /// `preferLocal` or `preferRemote`.
    pub outcome: String,
}

impl Validate for ResolveConflictRequest {
    fn validate(&self) -> Result<(), String> {
        if self.entry_id.is_empty() {
            return Err("Entry ID is required".to_string());
        }
        if self.outcome.is_empty() {
            return Err("Outcome is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStateResponse {
    pub is_online: bool,
    pub connection_type: String,
    pub effective_speed: String,
    pub metered: bool,
}
