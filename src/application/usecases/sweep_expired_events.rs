// Use case: sweep_expired_events.

use crate::application::context::AppContext;
use crate::domain::value_objects::timestamps::Timestamp;
use metrics::counter;
use time::Duration;
use tracing::{info, warn};

/// Deletes webhook event records that are past the retention window.
pub struct SweepExpiredEventsUseCase;

#[derive(Debug, PartialEq, Eq)]
pub enum SweepExpiredEventsError {
    Storage(String),
}

impl SweepExpiredEventsUseCase {
    /// Run one sweep pass and return the number of records deleted.
    pub async fn run_once(
        ctx: &AppContext,
        now: Timestamp,
    ) -> Result<u64, SweepExpiredEventsError> {
        // Step 1: Everything created before the cutoff has expired.
        let cutoff = now.cutoff(ctx.retention.ttl());

        // Step 2: Delete expired records.
        let deleted = ctx
            .repos
            .webhook_event
            .delete_created_before(cutoff)
            .await
            .map_err(|e| SweepExpiredEventsError::Storage(format!("{e:?}")))?;

        // Step 3: Report the deletion count.
        counter!("webhook_events_swept_total").increment(deleted);
        if deleted > 0 {
            info!(deleted, "webhook_events_swept");
        }
        Ok(deleted)
    }

    /// Sweep at a fixed interval until shutdown is signalled. Failed passes are logged
    /// and retried on the next tick.
    pub async fn run_loop(
        ctx: &AppContext,
        interval: Duration,
        mut shutdown: tokio::sync::watch::Receiver<bool>,
    ) {
        let sleep_duration =
            std::time::Duration::from_millis(interval.whole_milliseconds().max(0) as u64);

        // Step 1: Loop until shutdown is triggered.
        loop {
            if *shutdown.borrow() {
                break;
            }

            // Step 2: Sweep with the current wall clock.
            if let Err(e) = Self::run_once(ctx, Timestamp::now_utc()).await {
                warn!(error = ?e, "webhook_event_sweep_failed");
            }

            // Step 3: Wait for the next tick or shutdown.
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
                _ = tokio::time::sleep(sleep_duration) => {}
            }
        }
    }
}
