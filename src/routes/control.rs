use axum::{Json, extract::State};

use crate::backend::models::ControlRequest;
use crate::common::AppState;
use crate::dashboard::ControlAlert;
use crate::error::AppResult;
use crate::sync::worker;

/// Get the control mode
///
/// Reads the active control mode from the rig backend.
#[utoipa::path(
    get,
    path = "/api/control",
    responses(
        (status = 200, description = "Current control mode", body = ControlAlert),
        (status = 502, description = "Rig backend unreachable"),
    ),
    tag = "control"
)]
pub async fn get_control(State(state): State<AppState>) -> AppResult<Json<ControlAlert>> {
    worker::refresh_control(&state).await.map(Json)
}

/// Set the control mode
///
/// The backend clamps parameters to its ranges; the alert shows what it accepted.
#[utoipa::path(
    post,
    path = "/api/control",
    request_body = ControlRequest,
    responses(
        (status = 200, description = "Control mode applied", body = ControlAlert),
        (status = 502, description = "Rig backend unreachable"),
    ),
    tag = "control"
)]
pub async fn set_control(
    State(state): State<AppState>,
    Json(request): Json<ControlRequest>,
) -> AppResult<Json<ControlAlert>> {
    tracing::info!(mode = ?request.control_mode, "Setting control mode");

    let control = state.backend.set_control(&request).await?;
    let alert = state.dashboard.write().await.apply_control(&control).clone();
    Ok(Json(alert))
}
