use crate::application::ports::connectivity::ConnectivityProbe;
use crate::application::ports::remote_store::RemoteStore;
use crate::application::services::{
    ConflictResolver, NetworkMonitor, StorageQuotaManager, SyncCoordinator,
};
use crate::infrastructure::offline::SqliteOfflineStore;
use crate::presentation::handlers::OfflineHandler;
use crate::shared::AppConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Composition root: owns every service and the background tasks that
/// drive them.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SqliteOfflineStore>,
    pub monitor: Arc<NetworkMonitor>,
    pub quota: Arc<StorageQuotaManager>,
    pub resolver: Arc<ConflictResolver>,
    pub coordinator: Arc<SyncCoordinator>,
    pub handler: Arc<OfflineHandler>,
    pub config: AppConfig,
}

impl AppState {
    /// Connects storage and wires the services. Fails closed when the
    /// offline store is unreadable so queued mutations are never silently
    /// lost.
    pub async fn new(
        config: AppConfig,
        probe: Arc<dyn ConnectivityProbe>,
        remote: Arc<dyn RemoteStore>,
    ) -> anyhow::Result<Self> {
        config.validate().map_err(anyhow::Error::msg)?;
        std::fs::create_dir_all(&config.storage.data_dir)?;

        let store = Arc::new(
            SqliteOfflineStore::connect(&config.database.url, config.database.max_connections)
                .await?,
        );

        let monitor = Arc::new(NetworkMonitor::new(probe));
        let quota = Arc::new(StorageQuotaManager::new(store.clone()));
        let resolver = Arc::new(ConflictResolver::new(store.clone()));
        let coordinator = Arc::new(SyncCoordinator::new(
            store.clone(),
            remote,
            resolver.clone(),
            monitor.clone(),
            config.sync.clone(),
        ));
        let handler = Arc::new(OfflineHandler::new(
            store.clone(),
            quota.clone(),
            resolver.clone(),
            coordinator.clone(),
            monitor.clone(),
            config.sync.clone(),
        ));

        info!(database = %config.database.url, "offline sync core initialized");
        Ok(Self {
            store,
            monitor,
            quota,
            resolver,
            coordinator,
            handler,
            config,
        })
    }

    /// Starts the connectivity poller, the reconnect trigger, and the
    /// periodic background sync.
    pub fn spawn_background_tasks(&self) {
        self.monitor
            .clone()
            .spawn_polling(Duration::from_secs(self.config.network.probe_interval_secs));
        self.coordinator.spawn_auto_sync();
        self.coordinator.spawn_background(Duration::from_secs(
            self.config.sync.background_interval_secs,
        ));
    }
}
