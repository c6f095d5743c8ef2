pub mod charts;
pub mod control;
pub mod devices;
pub mod diagram;
pub mod health;
pub mod rate_limit;
pub mod recording;

use axum::{
    Router,
    routing::{get, post},
};
use tower_governor::GovernorLayer;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use crate::error::AppResult;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        diagram::get_diagram,
        charts::list_charts,
        charts::get_chart,
        charts::reinitialize_charts,
        devices::list_devices,
        devices::get_device,
        devices::connect_device,
        control::get_control,
        control::set_control,
        recording::get_recording,
        recording::start_recording,
        recording::stop_recording,
    ),
    components(
        schemas(
            health::HealthResponse,
            charts::ChartResponse,
            devices::ConnectBody,
            devices::ConnectResponse,
            recording::StartRecordingBody,
            recording::RecordingResponse,
            crate::dashboard::DeviceStatus,
            crate::dashboard::ControlAlert,
            crate::dashboard::RecordingStatus,
            crate::backend::models::ControlRequest,
            crate::backend::models::ConnectionReply,
            crate::surface::SceneGraph,
            crate::surface::ChartState,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "diagram", description = "Rig schematic"),
        (name = "charts", description = "Live scrolling charts"),
        (name = "devices", description = "Device status and connections"),
        (name = "control", description = "Control mode of the rig"),
        (name = "recording", description = "Data recording"),
    ),
    info(
        title = "Rig Dashboard API",
        description = "Monitoring and control dashboard for the humidity rig",
        version = "0.1.0"
    )
)]
struct ApiDoc;

/// Build the HTTP router.
///
/// # Errors
///
/// Returns `AppError::Internal` if the rate limiter configuration is invalid.
pub fn build_router(state: AppState) -> AppResult<Router> {
    let config = &state.config;

    if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
    } else {
        tracing::info!(
            command_rate = %format!(
                "{}/s burst {}",
                config.rate_limit_commands_per_second, config.rate_limit_commands_burst
            ),
            "Rate limiting configured"
        );
    }

    let read_routes = Router::new()
        .route("/diagram", get(diagram::get_diagram))
        .route("/charts", get(charts::list_charts))
        .route("/charts/{chart_id}", get(charts::get_chart))
        .route("/devices", get(devices::list_devices))
        .route("/devices/{device_id}", get(devices::get_device))
        .route("/control", get(control::get_control))
        .route("/recording", get(recording::get_recording));

    // Routes that send commands to the rig
    let command_routes_base = Router::new()
        .route("/charts/reinitialize", post(charts::reinitialize_charts))
        .route("/devices/{device_id}/connect", post(devices::connect_device))
        .route("/control", post(control::set_control))
        .route("/recording/start", post(recording::start_recording))
        .route("/recording/stop", post(recording::stop_recording));

    let command_routes = if config.disable_rate_limiting {
        command_routes_base
    } else {
        command_routes_base.layer(GovernorLayer {
            config: rate_limit::command_limiter(config)?,
        })
    };

    let api_routes = Router::new()
        .merge(read_routes)
        .merge(command_routes)
        .layer(RequestBodyLimitLayer::new(64 * 1024)); // 64KB body limit

    // Health check routes (NO rate limiting)
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Ok(Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
