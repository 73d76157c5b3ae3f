//! Background task closing ballots once their deadline passes
//!
//! Deadlines are enforced on every vote regardless; the sweeper only makes the
//! Closed state explicit so summaries and logs reflect it without waiting for
//! the next request.

use crate::ballot::BallotStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawn the sweeper on the current tokio runtime.
///
/// Runs until the returned handle is aborted.
pub fn spawn_deadline_sweeper(store: Arc<BallotStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval_ms = every.as_millis() as u64, "deadline sweeper started");

        loop {
            ticker.tick().await;
            match store.close_expired() {
                Ok(0) => {}
                Ok(closed) => tracing::debug!(closed, "deadline sweep closed ballots"),
                Err(e) => tracing::error!(error = %e, "deadline sweep failed"),
            }
        }
    })
}

/// Spawn the sweeper with the store's configured interval.
pub fn spawn_configured_sweeper(store: Arc<BallotStore>) -> JoinHandle<()> {
    let every = store.limits().sweep_interval();
    spawn_deadline_sweeper(store, every)
}
