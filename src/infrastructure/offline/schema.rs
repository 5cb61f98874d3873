use crate::shared::error::AppError;
use sqlx::{Executor, Pool, Sqlite};

const CREATE_OFFLINE_RECORDS: &str = r#"
CREATE TABLE IF NOT EXISTS offline_records (
    id TEXT PRIMARY KEY,
    resource_type TEXT NOT NULL,
    payload TEXT NOT NULL,
    last_modified INTEGER NOT NULL,
    size_bytes INTEGER NOT NULL,
    sync_status TEXT NOT NULL,
    priority TEXT NOT NULL,
    expires_at INTEGER,
    conflict_payload TEXT
)
"#;

const CREATE_SYNC_QUEUE: &str = r#"
CREATE TABLE IF NOT EXISTS sync_queue (
    id TEXT PRIMARY KEY,
    operation TEXT NOT NULL,
    resource_type TEXT NOT NULL,
    resource_id TEXT NOT NULL,
    payload TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    attempts INTEGER NOT NULL DEFAULT 0,
    max_attempts INTEGER NOT NULL DEFAULT 3,
    status TEXT NOT NULL DEFAULT 'pending',
    error_message TEXT,
    next_attempt_at INTEGER,
    force_apply INTEGER NOT NULL DEFAULT 0
)
"#;

const CREATE_SYNC_QUEUE_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_sync_queue_status ON sync_queue(status, created_at)";

const CREATE_SYNC_META: &str = r#"
CREATE TABLE IF NOT EXISTS sync_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
"#;

const CREATE_SYNC_SETTINGS: &str = r#"
CREATE TABLE IF NOT EXISTS sync_settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    settings TEXT NOT NULL
)
"#;

pub async fn initialize(pool: &Pool<Sqlite>) -> Result<(), AppError> {
    pool.execute(CREATE_OFFLINE_RECORDS).await?;
    pool.execute(CREATE_SYNC_QUEUE).await?;
    pool.execute(CREATE_SYNC_QUEUE_STATUS_INDEX).await?;
    pool.execute(CREATE_SYNC_META).await?;
    pool.execute(CREATE_SYNC_SETTINGS).await?;
    Ok(())
}

/// Startup sanity read of the queue and cache tables. An unreadable store
/// fails closed as `StorageCorruption` instead of silently losing queued
/// mutations.
pub async fn verify_readable(pool: &Pool<Sqlite>) -> Result<(), AppError> {
    for table in ["sync_queue", "offline_records"] {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .map_err(|e| AppError::StorageCorruption(format!("{table} unreadable: {e}")))?;
    }
    Ok(())
}
