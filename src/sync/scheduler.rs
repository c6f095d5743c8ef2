use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};

use crate::common::AppState;
use crate::sync::worker;

/// Run the dashboard refresh loop forever.
///
/// Every tick runs as its own task tagged with a sequence number, so a slow
/// backend never delays the schedule. A tick that finishes after a newer one
/// has been applied is discarded by the dashboard.
pub async fn run_refresh_loop(state: AppState) {
    let period: Duration = state.config.refresh_interval();

    tracing::info!(
        interval_ms = state.config.refresh_interval_ms,
        discard_stale_ticks = state.config.discard_stale_ticks,
        "Starting refresh loop"
    );

    worker::initialize(&state).await;

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // The first tick completes immediately; startup already fetched a frame.
    ticker.tick().await;

    let mut sequence: u64 = 0;
    loop {
        ticker.tick().await;
        sequence += 1;

        let state = state.clone();
        tokio::spawn(async move {
            if !worker::run_tick(&state, sequence).await {
                tracing::debug!(tick = sequence, "Tick superseded");
            }
        });
    }
}
