//! Cron scheduler driving periodic drains and expiry reclamation.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{debug, error, info};

use courier_core::config::DispatchConfig;
use courier_core::error::AppError;
use courier_store::NotificationStore;

use crate::processor::Dispatcher;

/// Cron-based scheduler for the dispatch subsystem.
///
/// Two periodic tasks: the drain tick (every few seconds, default 5) and
/// expiry reclamation (hourly by default). Both fire regardless of load;
/// the dispatcher's own guard keeps overlapping drains out.
pub struct DispatchScheduler {
    scheduler: JobScheduler,
    dispatcher: Arc<Dispatcher>,
    store: Arc<dyn NotificationStore>,
    config: DispatchConfig,
}

impl std::fmt::Debug for DispatchScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchScheduler").finish()
    }
}

impl DispatchScheduler {
    /// Create a new scheduler.
    pub async fn new(
        config: DispatchConfig,
        dispatcher: Arc<Dispatcher>,
        store: Arc<dyn NotificationStore>,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::scheduler(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            dispatcher,
            store,
            config,
        })
    }

    /// Register the drain tick and the reclamation task.
    pub async fn register_tasks(&self) -> Result<(), AppError> {
        self.register_drain_tick().await?;
        self.register_reclamation().await?;

        info!("All dispatch tasks registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::scheduler(format!("Failed to start scheduler: {e}")))?;

        info!("Dispatch scheduler started");
        Ok(())
    }

    /// Shut the scheduler down. Queue contents are dropped; the records
    /// they referenced stay persisted as pending.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::scheduler(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Dispatch scheduler shut down");
        Ok(())
    }

    /// Drain tick — every `drain_interval_seconds`.
    async fn register_drain_tick(&self) -> Result<(), AppError> {
        let dispatcher = Arc::clone(&self.dispatcher);
        let schedule = format!("*/{} * * * * *", self.config.drain_interval_seconds);

        let job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let dispatcher = Arc::clone(&dispatcher);
            Box::pin(async move {
                let processed = dispatcher.drain().await;
                if processed > 0 {
                    debug!(processed, "Drain tick completed");
                }
            })
        })
        .map_err(|e| AppError::scheduler(format!("Failed to create drain schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::scheduler(format!("Failed to add drain schedule: {e}")))?;

        info!(
            interval_seconds = self.config.drain_interval_seconds,
            "Registered: drain tick"
        );
        Ok(())
    }

    /// Expiry reclamation — hourly by default.
    async fn register_reclamation(&self) -> Result<(), AppError> {
        let store = Arc::clone(&self.store);

        let job = CronJob::new_async(
            self.config.reclamation_schedule.as_str(),
            move |_uuid, _lock| {
                let store = Arc::clone(&store);
                Box::pin(async move {
                    match store.delete_expired(chrono::Utc::now()).await {
                        Ok(deleted) if deleted > 0 => {
                            info!(deleted, "Reclaimed expired notifications");
                        }
                        Ok(_) => {
                            debug!("No expired notifications to reclaim");
                        }
                        Err(e) => {
                            error!(error = %e, "Expiry reclamation failed");
                        }
                    }
                })
            },
        )
        .map_err(|e| AppError::scheduler(format!("Failed to create reclamation schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::scheduler(format!("Failed to add reclamation schedule: {e}")))?;

        info!(
            schedule = %self.config.reclamation_schedule,
            "Registered: expiry reclamation"
        );
        Ok(())
    }
}
