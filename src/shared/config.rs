use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
    pub storage: StorageConfig,
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub batch_size: u32,
    pub max_attempts: u32,
    pub base_retry_delay_ms: u64,
    pub max_retry_delay_ms: u64,
    pub remote_timeout_secs: u64,
    pub max_cycle_duration_secs: u64,
    pub background_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    pub max_storage_bytes: u64,
    pub retention_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub probe_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite:data/tsunagi.db?mode=rwc".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            sync: SyncConfig {
                batch_size: 50,
                max_attempts: 3,
                base_retry_delay_ms: 1_000,
                max_retry_delay_ms: 300_000, // 5 minutes
                remote_timeout_secs: 30,
                max_cycle_duration_secs: 600,
                background_interval_secs: 300,
            },
            storage: StorageConfig {
                data_dir: "./data".to_string(),
                max_storage_bytes: 100 * 1024 * 1024, // 100MB
                retention_days: 30,
            },
            network: NetworkConfig {
                probe_interval_secs: 15,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("TSUNAGI_DATABASE_URL") {
            if !v.trim().is_empty() {
                cfg.database.url = v;
            }
        }
        if let Ok(v) = std::env::var("TSUNAGI_DATA_DIR") {
            if !v.trim().is_empty() {
                cfg.storage.data_dir = v;
            }
        }
        if let Ok(v) = std::env::var("TSUNAGI_MAX_STORAGE_BYTES") {
            if let Some(value) = parse_u64(&v) {
                cfg.storage.max_storage_bytes = value;
            }
        }
        if let Ok(v) = std::env::var("TSUNAGI_RETENTION_DAYS") {
            if let Some(value) = parse_u64(&v) {
                cfg.storage.retention_days = value as u32;
            }
        }
        if let Ok(v) = std::env::var("TSUNAGI_SYNC_BATCH_SIZE") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.batch_size = (value.max(1)) as u32;
            }
        }
        if let Ok(v) = std::env::var("TSUNAGI_SYNC_MAX_ATTEMPTS") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.max_attempts = (value.max(1)) as u32;
            }
        }
        if let Ok(v) = std::env::var("TSUNAGI_SYNC_BACKGROUND_INTERVAL_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.background_interval_secs = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("TSUNAGI_NETWORK_PROBE_INTERVAL_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.network.probe_interval_secs = value.max(1);
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.sync.batch_size == 0 {
            return Err("Sync batch_size must be greater than 0".to_string());
        }
        if self.sync.max_attempts == 0 {
            return Err("Sync max_attempts must be greater than 0".to_string());
        }
        if self.sync.max_retry_delay_ms < self.sync.base_retry_delay_ms {
            return Err("Sync max_retry_delay_ms must be >= base_retry_delay_ms".to_string());
        }
        if self.storage.max_storage_bytes == 0 {
            return Err("Storage max_storage_bytes must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_inverted_retry_delays() {
        let mut cfg = AppConfig::default();
        cfg.sync.base_retry_delay_ms = 10_000;
        cfg.sync.max_retry_delay_ms = 1_000;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_batch_size() {
        let mut cfg = AppConfig::default();
        cfg.sync.batch_size = 0;
        assert!(cfg.validate().is_err());
    }
}
