mod network_state;
mod offline_record;
mod resolution;
mod sync_progress;
mod sync_queue_entry;
mod sync_settings;

pub use network_state::NetworkState;
pub use offline_record::{OfflineRecord, OfflineRecordDraft, StorageUsage};
pub use resolution::{ConflictOutcome, Resolution};
pub use sync_progress::{SyncCycleSummary, SyncProgress};
pub use sync_queue_entry::{MutationDraft, SyncQueueEntry};
pub use sync_settings::SyncSettings;
