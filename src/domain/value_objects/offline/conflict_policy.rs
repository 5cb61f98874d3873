use serde::{Deserialize, Serialize};

/// Operator-configured conflict resolution policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictPolicy {
    PreferLocal,
    #[default]
    PreferRemote,
    Manual,
}

impl ConflictPolicy {
    pub fn as_str(&self) -> &str {
        match self {
            ConflictPolicy::PreferLocal => "preferLocal",
            ConflictPolicy::PreferRemote => "preferRemote",
            ConflictPolicy::Manual => "manual",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "preferLocal" => Ok(ConflictPolicy::PreferLocal),
            "preferRemote" => Ok(ConflictPolicy::PreferRemote),
            "manual" => Ok(ConflictPolicy::Manual),
            other => Err(format!("Unknown conflict policy: {other}")),
        }
    }
}
