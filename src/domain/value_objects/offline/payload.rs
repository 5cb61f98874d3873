use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque resource payload. The core never inspects its shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfflinePayload(Value);

impl OfflinePayload {
    pub fn new(value: Value) -> Result<Self, String> {
        if value.is_null() {
            return Err("Offline payload cannot be null".to_string());
        }
        Ok(Self(value))
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| format!("Invalid JSON payload: {e}"))?;
        Self::new(value)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Serialized length in bytes, used when the caller does not supply an
    /// explicit size for quota accounting.
    pub fn approximate_size(&self) -> u64 {
        serde_json::to_string(&self.0).map(|s| s.len() as u64).unwrap_or(0)
    }
}

impl From<OfflinePayload> for Value {
    fn from(payload: OfflinePayload) -> Self {
        payload.0
    }
}
