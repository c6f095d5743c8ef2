use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::AppState;
use crate::dashboard::RecordingStatus;
use crate::error::AppResult;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StartRecordingBody {
    /// Target directory on the rig host. Empty uses the backend default.
    #[serde(default)]
    pub directory: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecordingResponse {
    pub status: RecordingStatus,
    /// Raw reply of the rig backend
    #[schema(value_type = Object)]
    pub reply: serde_json::Value,
}

/// Get the recording status
#[utoipa::path(
    get,
    path = "/api/recording",
    responses(
        (status = 200, description = "Recording status", body = RecordingStatus),
    ),
    tag = "recording"
)]
pub async fn get_recording(State(state): State<AppState>) -> Json<RecordingStatus> {
    Json(state.dashboard.read().await.recording().clone())
}

/// Start recording data
#[utoipa::path(
    post,
    path = "/api/recording/start",
    request_body = StartRecordingBody,
    responses(
        (status = 200, description = "Recording started", body = RecordingResponse),
        (status = 502, description = "Rig backend unreachable"),
    ),
    tag = "recording"
)]
pub async fn start_recording(
    State(state): State<AppState>,
    Json(body): Json<StartRecordingBody>,
) -> AppResult<Json<RecordingResponse>> {
    let reply = state.backend.start_recording(&body.directory).await?;
    tracing::info!(directory = %body.directory, "Recording started");

    let status = RecordingStatus::recording(&body.directory);
    state.dashboard.write().await.set_recording(status.clone());
    Ok(Json(RecordingResponse { status, reply }))
}

/// Stop recording data
#[utoipa::path(
    post,
    path = "/api/recording/stop",
    responses(
        (status = 200, description = "Recording stopped", body = RecordingResponse),
        (status = 502, description = "Rig backend unreachable"),
    ),
    tag = "recording"
)]
pub async fn stop_recording(State(state): State<AppState>) -> AppResult<Json<RecordingResponse>> {
    let reply = state.backend.stop_recording().await?;
    tracing::info!("Recording stopped");

    let status = RecordingStatus::stopped();
    state.dashboard.write().await.set_recording(status.clone());
    Ok(Json(RecordingResponse { status, reply }))
}
