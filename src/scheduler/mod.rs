//! Periodic driver for the finalizer.
//! One batch per tick; a batch never overlaps the next one and is never cut short.
// region:    --- Imports
use crate::finalizer::{FinalizeReport, Finalizer, FinalizerError};
use crate::notifier::WinnerNotifier;
use crate::repository::AuctionRepository;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

// endregion: --- Imports

// region:    --- Auction Scheduler
pub struct AuctionScheduler<R, N> {
    finalizer: Arc<Finalizer<R, N>>,
    period: Duration,
}

/// Running scheduler loop
pub struct SchedulerHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop after the batch in progress, if any, has finished
    pub async fn stop(self) -> Result<(), JoinError> {
        // The loop also stops when every receiver is gone, so a send error is fine.
        let _ = self.stop.send(true);
        self.task.await
    }
}

impl<R, N> AuctionScheduler<R, N>
where
    R: AuctionRepository + 'static,
    N: WinnerNotifier + 'static,
{
    pub fn new(finalizer: Arc<Finalizer<R, N>>, period: Duration) -> Self {
        Self { finalizer, period }
    }

    /// Spawn the loop
    pub fn start(&self) -> SchedulerHandle {
        let finalizer = Arc::clone(&self.finalizer);
        let period = self.period;
        let (stop, mut stopped) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut interval = interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // Only the wait between batches is cancellable.
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = stopped.changed() => break,
                }
                if let Err(e) = Self::run_once(&finalizer).await {
                    error!("{:<12} --> Finalization batch failed: {}", "Scheduler", e);
                }
            }
            info!("{:<12} --> Scheduler stopped", "Scheduler");
        });

        SchedulerHandle { stop, task }
    }

    /// One batch
    pub async fn run_once(
        finalizer: &Finalizer<R, N>,
    ) -> Result<FinalizeReport, FinalizerError> {
        let report = finalizer.finalize_expired_auctions().await?;
        debug!(
            "{:<12} --> Finalization batch processed {} auctions",
            "Scheduler",
            report.outcomes.len()
        );
        Ok(report)
    }
}
// endregion: --- Auction Scheduler
