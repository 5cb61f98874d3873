mod conflict_policy;
mod connection;
mod entry_id;
mod entry_status;
mod operation;
mod payload;
mod priority;
mod record_id;
mod resource_type;
mod sync_status;

pub use conflict_policy::ConflictPolicy;
pub use connection::{ConnectionType, SpeedTier};
pub use entry_id::EntryId;
pub use entry_status::EntryStatus;
pub use operation::QueueOperation;
pub use payload::OfflinePayload;
pub use priority::Priority;
pub use record_id::RecordId;
pub use resource_type::ResourceType;
pub use sync_status::SyncStatus;
