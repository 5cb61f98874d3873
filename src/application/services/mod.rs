pub mod conflict_resolver;
pub mod network_monitor;
pub mod quota;
pub mod sync_coordinator;

pub use conflict_resolver::ConflictResolver;
pub use network_monitor::NetworkMonitor;
pub use quota::{Admission, StorageQuotaManager};
pub use sync_coordinator::{retry_delay, SyncCoordinator};
