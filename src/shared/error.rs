use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage quota exceeded: {requested} bytes requested, {available} bytes free")]
    QuotaExceeded { requested: u64, available: u64 },

    #[error("{pending} unsynced queue entries present")]
    UnsyncedWorkPresent { pending: u64 },

    #[error("Offline storage is corrupted: {0}")]
    StorageCorruption(String),

    #[error("A sync cycle is already running")]
    SyncCycleActive,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Internal(err)
    }
}

impl AppError {
    /// Maps a value-object validation message into a `Validation` error.
    pub fn validation_mapper(message: String) -> Self {
        AppError::Validation(message)
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            AppError::UnsyncedWorkPresent { .. } => "UNSYNCED_WORK_PRESENT",
            AppError::StorageCorruption(_) => "STORAGE_CORRUPTION",
            AppError::SyncCycleActive => "SYNC_CYCLE_ACTIVE",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
