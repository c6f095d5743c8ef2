use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::backend::models::ConnectionReply;
use crate::common::AppState;
use crate::dashboard::DeviceStatus;
use crate::error::{AppError, AppResult};

/// Connection form of a device.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConnectBody {
    pub port: String,
    /// Bus address of a sensor, decimal or `0x`-prefixed hex.
    pub address: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectResponse {
    pub reply: ConnectionReply,
    pub device: DeviceStatus,
}

/// Parse a user-entered bus address, decimal (`68`) or hex (`0x44`).
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the value is not a byte.
pub fn parse_address(raw: &str) -> AppResult<u8> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => raw.parse::<u8>(),
    };
    parsed.map_err(|_| AppError::BadRequest(format!("invalid address '{raw}'")))
}

/// List all devices
#[utoipa::path(
    get,
    path = "/api/devices",
    responses(
        (status = 200, description = "Devices retrieved successfully", body = Vec<DeviceStatus>),
    ),
    tag = "devices"
)]
pub async fn list_devices(State(state): State<AppState>) -> Json<Vec<DeviceStatus>> {
    Json(state.dashboard.read().await.device_statuses())
}

/// Get one device
#[utoipa::path(
    get,
    path = "/api/devices/{device_id}",
    params(
        ("device_id" = String, Path, description = "Device key, e.g. MFC1"),
    ),
    responses(
        (status = 200, description = "Device retrieved successfully", body = DeviceStatus),
        (status = 404, description = "Device not found"),
    ),
    tag = "devices"
)]
pub async fn get_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> AppResult<Json<DeviceStatus>> {
    state
        .dashboard
        .read()
        .await
        .device_status(&device_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Device '{device_id}' not found")))
}

/// Connect a device
///
/// Forwards the connection parameter to the rig backend and stores its reply.
#[utoipa::path(
    post,
    path = "/api/devices/{device_id}/connect",
    params(
        ("device_id" = String, Path, description = "Device key, e.g. SHT1"),
    ),
    request_body = ConnectBody,
    responses(
        (status = 200, description = "Backend reply applied", body = ConnectResponse),
        (status = 400, description = "Invalid port or address"),
        (status = 404, description = "Device not found"),
        (status = 502, description = "Rig backend unreachable"),
    ),
    tag = "devices"
)]
pub async fn connect_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    Json(body): Json<ConnectBody>,
) -> AppResult<Json<ConnectResponse>> {
    if body.port.trim().is_empty() {
        return Err(AppError::BadRequest("port must not be empty".to_string()));
    }
    let address = body.address.as_deref().map(parse_address).transpose()?;

    let (endpoint, param) = state
        .dashboard
        .read()
        .await
        .connect_target(&device_id, body.port.trim().to_string(), address)?;

    let reply = endpoint
        .request_connect(state.backend.as_ref(), &param)
        .await
        .ok_or_else(|| AppError::Backend(format!("connect to '{device_id}' failed")))?;

    let mut dashboard = state.dashboard.write().await;
    dashboard.apply_connect_reply(&device_id, &reply)?;
    let device = dashboard
        .device_status(&device_id)
        .ok_or_else(|| AppError::NotFound(format!("Device '{device_id}' not found")))?;

    Ok(Json(ConnectResponse { reply, device }))
}
