//! Periodic cleanup of stale correlation records.
//!
//! Records are normally left behind once a translation is served or has
//! failed, and pending ones are abandoned when a client stops polling. This
//! task deletes every record not updated within the retention period. Runs on
//! a fixed interval using `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use cadview_db::store::CorrelationStore;
use chrono::Utc;
use tokio_util::sync::CancellationToken;

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the correlation retention loop until `cancel` is triggered.
pub async fn run(
    store: Arc<dyn CorrelationStore>,
    retention_hours: i64,
    cancel: CancellationToken,
) {
    run_every(store, retention_hours, CLEANUP_INTERVAL, cancel).await;
}

/// [`run`] with an explicit interval. The first purge happens immediately.
pub async fn run_every(
    store: Arc<dyn CorrelationStore>,
    retention_hours: i64,
    every: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        retention_hours,
        interval_secs = every.as_secs(),
        "Correlation retention job started"
    );

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Correlation retention job stopping");
                break;
            }
            _ = interval.tick() => {
                let cutoff = Utc::now() - chrono::Duration::hours(retention_hours);
                match store.purge_older_than(cutoff).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Correlation retention: purged stale records");
                        } else {
                            tracing::debug!("Correlation retention: no records to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Correlation retention: cleanup failed");
                    }
                }
            }
        }
    }
}
