use crate::application::ports::offline_store::OfflineStore;
use crate::application::ports::remote_store::{ApplyMode, RemoteError, RemoteStore};
use crate::application::services::conflict_resolver::ConflictResolver;
use crate::application::services::network_monitor::NetworkMonitor;
use crate::domain::entities::offline::{
    Resolution, SyncCycleSummary, SyncProgress, SyncQueueEntry, SyncSettings,
};
use crate::domain::value_objects::offline::{EntryId, QueueOperation, SyncStatus};
use crate::shared::config::SyncConfig;
use crate::shared::error::{AppError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Retry delay for a failing entry: `min(base * 2^attempts, max)`.
/// Monotonically non-decreasing in `attempts` and capped at `max`.
pub fn retry_delay(attempts: u32, base: Duration, max: Duration) -> Duration {
    let factor = 2u128.saturating_pow(attempts);
    let delay_ms = (base.as_millis().saturating_mul(factor)).min(max.as_millis());
    Duration::from_millis(delay_ms as u64)
}

/// Drives the mutation queue against the remote store.
///
/// One cycle at a time per instance: a trigger while a cycle runs coalesces
/// to a no-op instead of queueing, so the same queue is never drained twice
/// concurrently. Entries are processed sequentially to preserve the
/// priority/age ordering and keep writes to the same resource in order.
pub struct SyncCoordinator {
    store: Arc<dyn OfflineStore>,
    remote: Arc<dyn RemoteStore>,
    resolver: Arc<ConflictResolver>,
    monitor: Arc<NetworkMonitor>,
    config: SyncConfig,
    progress_tx: watch::Sender<SyncProgress>,
    cycle_guard: Arc<Mutex<()>>,
}

impl SyncCoordinator {
    pub fn new(
        store: Arc<dyn OfflineStore>,
        remote: Arc<dyn RemoteStore>,
        resolver: Arc<ConflictResolver>,
        monitor: Arc<NetworkMonitor>,
        config: SyncConfig,
    ) -> Self {
        let (progress_tx, _rx) = watch::channel(SyncProgress::idle());
        Self {
            store,
            remote,
            resolver,
            monitor,
            config,
            progress_tx,
            cycle_guard: Arc::new(Mutex::new(())),
        }
    }

    pub fn progress(&self) -> SyncProgress {
        self.progress_tx.borrow().clone()
    }

    pub fn subscribe_progress(&self) -> watch::Receiver<SyncProgress> {
        self.progress_tx.subscribe()
    }

    /// Runs one cycle inline. Fails with `SyncCycleActive` when another
    /// cycle holds the guard.
    pub async fn run_cycle(&self, ids: Option<Vec<EntryId>>) -> Result<SyncCycleSummary> {
        let _guard = self
            .cycle_guard
            .clone()
            .try_lock_owned()
            .map_err(|_| AppError::SyncCycleActive)?;
        self.run_cycle_locked(Uuid::new_v4().to_string(), ids).await
    }

    /// Starts a cycle in the background and returns its handle immediately.
    /// A trigger during a running cycle returns that cycle's handle instead.
    pub fn spawn_cycle(self: &Arc<Self>, ids: Option<Vec<EntryId>>) -> String {
        match self.cycle_guard.clone().try_lock_owned() {
            Ok(guard) => {
                let cycle_id = Uuid::new_v4().to_string();
                // Published before the task runs so a coalesced trigger can
                // always read the in-flight handle.
                self.progress_tx.send_replace(SyncProgress {
                    cycle_id: Some(cycle_id.clone()),
                    finished: false,
                    ..SyncProgress::idle()
                });
                let this = Arc::clone(self);
                let handle = cycle_id.clone();
                tokio::spawn(async move {
                    let _guard = guard;
                    if let Err(e) = this.run_cycle_locked(handle, ids).await {
                        error!(target: "offline::coordinator", error = %e, "sync cycle failed");
                    }
                });
                cycle_id
            }
            Err(_) => {
                debug!(target: "offline::coordinator", "sync trigger coalesced into running cycle");
                self.progress_tx
                    .borrow()
                    .cycle_id
                    .clone()
                    .unwrap_or_default()
            }
        }
    }

    /// Re-triggers on every offline-to-online transition while
    /// `auto_sync` is enabled.
    pub fn spawn_auto_sync(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let this = Arc::clone(self);
        let mut rx = self.monitor.subscribe();
        tokio::spawn(async move {
            let mut was_online = rx.borrow().is_online;
            while rx.changed().await.is_ok() {
                let now_online = rx.borrow().is_online;
                if now_online && !was_online {
                    match this.store.load_settings().await {
                        Ok(settings) if settings.auto_sync => {
                            info!(target: "offline::coordinator", "back online; starting sync");
                            this.spawn_cycle(None);
                        }
                        Ok(_) => {}
                        Err(e) => {
                            warn!(target: "offline::coordinator", error = %e, "settings unavailable on reconnect");
                        }
                    }
                }
                was_online = now_online;
            }
        })
    }

    /// Periodic background tick; each tick is gated again inside the cycle.
    pub fn spawn_background(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so startup is quiet.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match this.store.load_settings().await {
                    Ok(settings) if settings.background_sync => {
                        this.spawn_cycle(None);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(target: "offline::coordinator", error = %e, "settings unavailable for background sync");
                    }
                }
            }
        })
    }

    async fn run_cycle_locked(
        &self,
        cycle_id: String,
        ids: Option<Vec<EntryId>>,
    ) -> Result<SyncCycleSummary> {
        // Settings snapshot: changes made mid-cycle apply to the next one.
        let settings = self.store.load_settings().await?;

        let mut summary = SyncCycleSummary {
            cycle_id: cycle_id.clone(),
            ..SyncCycleSummary::default()
        };

        self.progress_tx.send_replace(SyncProgress {
            cycle_id: Some(cycle_id.clone()),
            finished: false,
            ..SyncProgress::idle()
        });

        if !self.cycle_allowed(&settings) {
            summary.aborted = true;
            self.progress_tx.send_replace(SyncProgress {
                cycle_id: Some(cycle_id),
                ..SyncProgress::idle()
            });
            return Ok(summary);
        }

        // Entries stranded in `syncing` by a crash or a cancelled cycle are
        // replayed (at-least-once; the remote side is idempotent-or-versioned).
        let recovered = self.store.recover_interrupted().await?;
        if recovered > 0 {
            info!(
                target: "offline::coordinator",
                recovered,
                "recovered interrupted queue entries"
            );
        }

        let batch = match &ids {
            Some(ids) => self.store.entries_by_ids(ids).await?,
            None => self.store.dequeue_batch(self.config.batch_size).await?,
        };

        let total = batch.len() as u32;
        let mut progress = SyncProgress {
            cycle_id: Some(cycle_id),
            total,
            completed: 0,
            failed: 0,
            conflicts: 0,
            current: None,
            finished: false,
        };
        self.progress_tx.send_replace(progress.clone());

        let deadline =
            Instant::now() + Duration::from_secs(self.config.max_cycle_duration_secs);

        for entry in batch {
            if !self.monitor.current().is_online {
                // Remaining dequeued work is preserved for the next cycle.
                info!(target: "offline::coordinator", "network dropped mid-cycle; aborting");
                summary.aborted = true;
                break;
            }
            if Instant::now() >= deadline {
                warn!(target: "offline::coordinator", "cycle deadline reached; aborting");
                summary.aborted = true;
                break;
            }

            progress.current = Some(entry.id.clone());
            self.progress_tx.send_replace(progress.clone());

            self.process_entry(&entry, &settings, &mut summary).await?;

            progress.completed = summary.completed;
            progress.failed = summary.failed;
            progress.conflicts = summary.conflicts;
            self.progress_tx.send_replace(progress.clone());
        }

        self.store.prune_completed().await?;
        self.store.set_last_sync_time(chrono::Utc::now()).await?;

        progress.current = None;
        progress.finished = true;
        self.progress_tx.send_replace(progress);

        info!(
            target: "offline::coordinator",
            completed = summary.completed,
            failed = summary.failed,
            conflicts = summary.conflicts,
            aborted = summary.aborted,
            "sync cycle finished"
        );
        Ok(summary)
    }

    fn cycle_allowed(&self, settings: &SyncSettings) -> bool {
        let network = self.monitor.current();
        if !network.is_online {
            debug!(target: "offline::coordinator", "offline; cycle skipped");
            return false;
        }
        if settings.sync_on_unmetered_only && network.metered {
            debug!(target: "offline::coordinator", "metered connection; cycle skipped");
            return false;
        }
        true
    }

    async fn process_entry(
        &self,
        entry: &SyncQueueEntry,
        settings: &SyncSettings,
        summary: &mut SyncCycleSummary,
    ) -> Result<()> {
        self.store.mark_syncing(&entry.id).await?;

        let mode = if entry.force_apply {
            ApplyMode::Forced
        } else {
            ApplyMode::Checked
        };

        match self.apply_with_timeout(entry, mode).await {
            Ok(()) => {
                self.complete_entry(entry).await?;
                summary.completed += 1;
            }
            Err(RemoteError::Conflict { remote_payload, .. }) => {
                let resolution = self
                    .resolver
                    .resolve(entry, &remote_payload, settings.conflict_resolution)
                    .await?;
                match resolution {
                    Resolution::ApplyLocal => {
                        // Overwrite the diverged remote in the same cycle.
                        match self.apply_with_timeout(entry, ApplyMode::Forced).await {
                            Ok(()) => {
                                self.complete_entry(entry).await?;
                                summary.completed += 1;
                            }
                            Err(RemoteError::Permanent(msg)) => {
                                self.fail_permanently(entry, &msg).await?;
                                summary.failed += 1;
                            }
                            Err(other) => {
                                self.fail_transiently(entry, &other.to_string()).await?;
                                summary.failed += 1;
                            }
                        }
                    }
                    Resolution::AcceptRemote => summary.completed += 1,
                    Resolution::Defer => summary.conflicts += 1,
                }
            }
            Err(RemoteError::Transient(msg)) => {
                self.fail_transiently(entry, &msg).await?;
                summary.failed += 1;
            }
            Err(RemoteError::Permanent(msg)) => {
                self.fail_permanently(entry, &msg).await?;
                summary.failed += 1;
            }
        }
        Ok(())
    }

    async fn apply_with_timeout(
        &self,
        entry: &SyncQueueEntry,
        mode: ApplyMode,
    ) -> std::result::Result<(), RemoteError> {
        let timeout = Duration::from_secs(self.config.remote_timeout_secs);
        match tokio::time::timeout(timeout, self.remote.apply(entry, mode)).await {
            Ok(result) => result,
            Err(_) => Err(RemoteError::Transient("remote operation timed out".into())),
        }
    }

    async fn complete_entry(&self, entry: &SyncQueueEntry) -> Result<()> {
        self.store.mark_completed(&entry.id).await?;
        match entry.operation {
            // The tombstone kept at enqueue time is finally dropped.
            QueueOperation::Delete => self.store.delete_record(&entry.resource_id).await?,
            QueueOperation::Create | QueueOperation::Update => {
                self.store
                    .set_record_status(&entry.resource_id, SyncStatus::Synced)
                    .await?;
            }
        }
        Ok(())
    }

    async fn fail_transiently(&self, entry: &SyncQueueEntry, message: &str) -> Result<()> {
        let delay = retry_delay(
            entry.attempts,
            Duration::from_millis(self.config.base_retry_delay_ms),
            Duration::from_millis(self.config.max_retry_delay_ms),
        );
        let next_attempt_at =
            chrono::Utc::now() + chrono::Duration::milliseconds(delay.as_millis() as i64);
        let updated = self
            .store
            .mark_failed(&entry.id, message, Some(next_attempt_at))
            .await?;

        if updated.is_terminal() {
            warn!(
                target: "offline::coordinator",
                entry = %entry.id,
                attempts = updated.attempts,
                error = message,
                "entry failed terminally after exhausting retries"
            );
            self.store
                .set_record_status(&entry.resource_id, SyncStatus::Failed)
                .await?;
        } else {
            debug!(
                target: "offline::coordinator",
                entry = %entry.id,
                attempts = updated.attempts,
                delay_ms = delay.as_millis() as u64,
                "transient failure; retry scheduled"
            );
        }
        Ok(())
    }

    async fn fail_permanently(&self, entry: &SyncQueueEntry, message: &str) -> Result<()> {
        warn!(
            target: "offline::coordinator",
            entry = %entry.id,
            error = message,
            "permanent remote failure; entry will not be retried"
        );
        self.store.mark_permanently_failed(&entry.id, message).await?;
        self.store
            .set_record_status(&entry.resource_id, SyncStatus::Failed)
            .await?;
        Ok(())
    }
}
