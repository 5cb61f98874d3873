use crate::domain::entities::offline::NetworkState;
use async_trait::async_trait;

/// Injected connectivity capability. Platform-specific detection (OS
/// signals, browser events, interface polling) lives behind this seam.
///
/// `None` means the platform signal is unavailable; the monitor then falls
/// back to the optimistic online default.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn sample(&self) -> Option<NetworkState>;
}
