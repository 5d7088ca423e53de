//! Drift-corrected collection scheduling
//!
//! Ticks are spaced from the start of the previous cycle, so a 10 s cycle on
//! a 300 s interval still yields 300 s between cycle starts. At most one
//! cycle is in flight; a tick that fires while one is running is skipped and
//! counted, never queued.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::Collector;

/// Starts the background collection loop
///
/// The first collection runs immediately so the exporter is not empty at
/// boot. On shutdown the loop stops ticking, waits up to `grace` for an
/// in-flight cycle, then abandons it.
pub fn start_collection_loop(
    mut shutdown_rx: watch::Receiver<bool>,
    collector: Arc<Collector>,
    interval: Duration,
    grace: Duration,
) -> JoinHandle<()> {
    tracing::info!(
        "Starting background collection loop every {}s",
        interval.as_secs()
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // An overdue tick fires once immediately instead of stacking
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut in_flight: Option<JoinHandle<()>> = None;

        loop {
            tokio::select! {
                _ = ticker.tick() => {},
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!("Stopping collection loop");
                        break;
                    }
                    continue;
                }
            }

            if let Some(handle) = &in_flight {
                if !handle.is_finished() {
                    collector.note_skipped_tick();
                    continue;
                }
            }

            let cycle = collector.clone();
            in_flight = Some(tokio::spawn(async move { cycle.run_cycle().await }));
        }

        if let Some(mut handle) = in_flight.take() {
            if !handle.is_finished() {
                tracing::info!(
                    "Waiting up to {}s for in-flight collection cycle",
                    grace.as_secs()
                );
                if tokio::time::timeout(grace, &mut handle).await.is_err() {
                    tracing::warn!("In-flight collection cycle exceeded grace period, aborting");
                    handle.abort();
                }
            }
        }
    })
}
