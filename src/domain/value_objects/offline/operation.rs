use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of remote mutation a queue entry carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueOperation {
    Create,
    Update,
    Delete,
}

impl QueueOperation {
    pub fn as_str(&self) -> &str {
        match self {
            QueueOperation::Create => "create",
            QueueOperation::Update => "update",
            QueueOperation::Delete => "delete",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "create" => Ok(QueueOperation::Create),
            "update" => Ok(QueueOperation::Update),
            "delete" => Ok(QueueOperation::Delete),
            other => Err(format!("Unknown queue operation: {other}")),
        }
    }
}

impl fmt::Display for QueueOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
