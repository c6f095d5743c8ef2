use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Sequence number of the newest tick shown on the dashboard.
    pub last_applied_tick: u64,
}

/// Health check endpoint
///
/// Returns 200 OK while the service runs, whether or not the rig backend is reachable.
/// This endpoint is not rate-limited.
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    ),
    tag = "health"
)]
pub async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    let last_applied_tick = state.dashboard.read().await.last_applied_tick();
    Json(HealthResponse {
        status: "ok".to_string(),
        last_applied_tick,
    })
}
