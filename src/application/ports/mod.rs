pub mod connectivity;
pub mod offline_store;
pub mod remote_store;

pub use connectivity::ConnectivityProbe;
pub use offline_store::OfflineStore;
pub use remote_store::{ApplyMode, RemoteError, RemoteStore};
