pub mod offline;

pub use offline::{
    ConflictPolicy, ConnectionType, EntryId, EntryStatus, OfflinePayload, Priority,
    QueueOperation, RecordId, ResourceType, SpeedTier, SyncStatus,
};
