use crate::domain::entities::offline::SyncQueueEntry;
use crate::domain::value_objects::offline::OfflinePayload;
use async_trait::async_trait;
use thiserror::Error;

/// Failure taxonomy reported by the authoritative remote service. The
/// coordinator maps these onto retry, terminal-failure and conflict paths;
/// a version conflict must be distinguishable from a transient error.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Remote version conflict")]
    Conflict {
        remote_payload: OfflinePayload,
        remote_version: Option<i64>,
    },

    #[error("Transient remote failure: {0}")]
    Transient(String),

    #[error("Permanent remote failure: {0}")]
    Permanent(String),
}

/// How a mutation is applied against the remote version check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Normal versioned apply; diverged remote state yields `Conflict`.
    Checked,
    /// Overwrite regardless of remote version (prefer-local resolution).
    Forced,
}

/// The authoritative store the coordinator drains the queue against. The
/// core only requires idempotent-or-versioned create/update/delete per
/// resource.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn apply(&self, entry: &SyncQueueEntry, mode: ApplyMode) -> Result<(), RemoteError>;
}
