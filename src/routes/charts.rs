use axum::{
    Json,
    extract::{Path, Query, State},
    http::{
        HeaderMap,
        header::{self, HeaderValue},
    },
    response::{IntoResponse, Response},
};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::surface::ChartState;
use crate::sync::worker;

fn default_format() -> String {
    "json".to_string()
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ChartQuery {
    /// Response format: json (default) or csv
    #[serde(default = "default_format")]
    pub format: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChartResponse {
    pub key: String,
    pub title: String,
    pub surface_id: String,
    /// Null until the chart has been populated
    pub state: Option<ChartState>,
}

fn wants_csv(query_format: &str, headers: &HeaderMap) -> bool {
    if !query_format.eq_ignore_ascii_case("json") {
        return query_format.eq_ignore_ascii_case("csv");
    }

    headers
        .get(header::ACCEPT)
        .and_then(|accept| accept.to_str().ok())
        .is_some_and(|accept| accept.contains("text/csv"))
}

/// One row per point: `trace,datetime,value`, traces in chart order.
///
/// # Errors
///
/// Returns `AppError::Internal` if the CSV writer fails.
pub fn chart_csv(chart: &ChartState) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let csv_error = |e: csv::Error| AppError::Internal(format!("CSV export failed: {e}"));

    writer
        .write_record(["trace", "datetime", "value"])
        .map_err(csv_error)?;
    for trace in &chart.traces {
        for (time, value) in trace.x.iter().zip(&trace.y) {
            writer
                .write_record([
                    trace.name.as_str(),
                    &time.to_rfc3339_opts(SecondsFormat::Millis, true),
                    &value.to_string(),
                ])
                .map_err(csv_error)?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV export failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(e.to_string()))
}

/// List all charts
#[utoipa::path(
    get,
    path = "/api/charts",
    responses(
        (status = 200, description = "Charts retrieved successfully", body = Vec<ChartResponse>),
    ),
    tag = "charts"
)]
pub async fn list_charts(State(state): State<AppState>) -> Json<Vec<ChartResponse>> {
    let dashboard = state.dashboard.read().await;
    let charts = dashboard
        .chart_keys()
        .into_iter()
        .filter_map(|key| {
            let entry = dashboard.chart_entry(&key)?;
            Some(ChartResponse {
                title: entry.plot.title().to_string(),
                surface_id: entry.plot.surface_id().to_string(),
                state: dashboard.chart(&key).cloned(),
                key,
            })
        })
        .collect();
    Json(charts)
}

/// Get one chart
///
/// Returns the rendered traces and axis ranges, or CSV with `format=csv`.
#[utoipa::path(
    get,
    path = "/api/charts/{chart_id}",
    params(
        ("chart_id" = String, Path, description = "Chart key, e.g. main_plot"),
        ChartQuery
    ),
    responses(
        (status = 200, description = "Chart retrieved successfully", body = ChartResponse),
        (status = 400, description = "Unknown format"),
        (status = 404, description = "Chart not found"),
    ),
    tag = "charts"
)]
pub async fn get_chart(
    State(state): State<AppState>,
    Path(chart_id): Path<String>,
    Query(query): Query<ChartQuery>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let format = query.format.to_lowercase();
    if format != "json" && format != "csv" {
        return Err(AppError::BadRequest(format!("unsupported format '{format}'")));
    }

    let dashboard = state.dashboard.read().await;
    let entry = dashboard
        .chart_entry(&chart_id)
        .ok_or_else(|| AppError::NotFound(format!("Chart '{chart_id}' not found")))?;
    let chart = dashboard.chart(&chart_id);

    if wants_csv(&format, &headers) {
        let body = match chart {
            Some(chart) => chart_csv(chart)?,
            None => "trace,datetime,value\n".to_string(),
        };
        return Ok((
            [(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"))],
            body,
        )
            .into_response());
    }

    Ok(Json(ChartResponse {
        key: chart_id.clone(),
        title: entry.plot.title().to_string(),
        surface_id: entry.plot.surface_id().to_string(),
        state: chart.cloned(),
    })
    .into_response())
}

/// Reinitialize all charts
///
/// Fetches a fresh frame and replaces every chart's content.
#[utoipa::path(
    post,
    path = "/api/charts/reinitialize",
    responses(
        (status = 200, description = "Charts reinitialized", body = Vec<ChartResponse>),
    ),
    tag = "charts"
)]
pub async fn reinitialize_charts(State(state): State<AppState>) -> Json<Vec<ChartResponse>> {
    worker::reinitialize_plots(&state).await;
    list_charts(State(state)).await
}
