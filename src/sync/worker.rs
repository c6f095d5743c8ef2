//! One refresh step each: talk to the backend without holding the dashboard
//! lock, then apply the result under a short write lock.

use crate::common::AppState;
use crate::dashboard::{ControlAlert, FrameData, gather_connections, gather_frame};
use crate::error::AppResult;

/// Fetch a frame from every device.
pub async fn fetch_frame(state: &AppState, tick: u64) -> FrameData {
    let endpoints = state.dashboard.read().await.endpoints();
    gather_frame(&endpoints, state.backend.as_ref(), tick).await
}

/// Query every device's connection and store the replies that are still current.
pub async fn refresh_connections(state: &AppState) {
    let targets = state.dashboard.read().await.connection_targets();
    let checks = gather_connections(&targets, state.backend.as_ref()).await;

    let connected = checks
        .iter()
        .filter(|c| c.reply.as_ref().is_some_and(|r| r.success))
        .count();
    tracing::debug!(devices = checks.len(), connected, "Connection status refreshed");

    state.dashboard.write().await.apply_connections(&checks);
}

/// Run one tick of the refresh loop.
///
/// Returns whether the tick was applied.
pub async fn run_tick(state: &AppState, tick: u64) -> bool {
    let frame = fetch_frame(state, tick).await;
    let failed = frame.failed.len();

    let applied = state.dashboard.write().await.apply_frame(&frame);
    if !applied {
        return false;
    }
    tracing::debug!(tick, failed, "Applied tick");

    refresh_connections(state).await;
    true
}

/// Repopulate every chart from a fresh frame.
pub async fn reinitialize_plots(state: &AppState) {
    let frame = fetch_frame(state, 0).await;
    state.dashboard.write().await.initialize_plots(&frame);
    tracing::info!(failed = frame.failed.len(), "Plots reinitialized");
}

/// Read the control mode from the backend and update the alert.
///
/// # Errors
///
/// Returns `AppError::Backend` if the backend cannot be reached.
pub async fn refresh_control(state: &AppState) -> AppResult<ControlAlert> {
    let control = state.backend.current_control().await?;
    let alert = state.dashboard.write().await.apply_control(&control).clone();
    Ok(alert)
}

/// Startup sequence: connection status, initial charts, control mode.
pub async fn initialize(state: &AppState) {
    refresh_connections(state).await;
    reinitialize_plots(state).await;

    if let Err(e) = refresh_control(state).await {
        tracing::warn!(error = %e, "Failed to read current control mode");
    }
}
