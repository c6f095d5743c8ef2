use axum::{Json, extract::State};

use crate::common::AppState;
use crate::surface::SceneGraph;

/// Get the rig schematic
///
/// Returns every primitive of the flow diagram with its current colour and text.
#[utoipa::path(
    get,
    path = "/api/diagram",
    responses(
        (status = 200, description = "Scene graph of the schematic", body = SceneGraph),
    ),
    tag = "diagram"
)]
pub async fn get_diagram(State(state): State<AppState>) -> Json<SceneGraph> {
    Json(state.dashboard.read().await.scene().clone())
}
