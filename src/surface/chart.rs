use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Marker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// One named series as held by a [`ChartSurface`].
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Trace {
    pub name: String,
    pub x: Vec<DateTime<Utc>>,
    pub y: Vec<f64>,
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

impl Trace {
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len().min(self.y.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
    pub pad: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PlotLayout {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub show_legend: bool,
    pub margin: Margin,
}

impl PlotLayout {
    #[must_use]
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            x_axis_title: "Time".to_string(),
            y_axis_title: String::new(),
            show_legend: true,
            margin: Margin {
                l: 50,
                r: 50,
                t: 50,
                b: 50,
                pad: 5,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct AxisRanges {
    #[schema(value_type = Option<Vec<String>>)]
    pub x: Option<(DateTime<Utc>, DateTime<Utc>)>,
    #[schema(value_type = Option<Vec<f64>>)]
    pub y: Option<(f64, f64)>,
}

/// Charting capability driven by [`crate::plot::ScrollingPlot`].
///
/// The surface owns the trace data; callers address traces by index.
pub trait ChartSurface: Send + Sync {
    /// Replace everything on `surface_id`.
    fn render(&mut self, surface_id: &str, traces: Vec<Trace>, layout: &PlotLayout);

    /// Append points to an existing trace.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Surface` if the surface or trace does not exist.
    fn extend(
        &mut self,
        surface_id: &str,
        x: &[DateTime<Utc>],
        y: &[f64],
        trace_index: usize,
    ) -> AppResult<()>;

    /// # Errors
    ///
    /// Returns `AppError::Surface` if the surface has not been rendered.
    fn add_trace(&mut self, surface_id: &str, trace: Trace) -> AppResult<()>;

    /// # Errors
    ///
    /// Returns `AppError::Surface` if the surface has not been rendered.
    fn relayout(&mut self, surface_id: &str, ranges: AxisRanges) -> AppResult<()>;

    /// Drop the `count` oldest points of one trace.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Surface` if the surface or trace does not exist.
    fn trim_front(&mut self, surface_id: &str, trace_index: usize, count: usize)
        -> AppResult<()>;

    /// Traces currently on `surface_id`, `None` if never rendered.
    fn traces(&self, surface_id: &str) -> Option<&[Trace]>;
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartState {
    pub layout: PlotLayout,
    pub ranges: AxisRanges,
    pub traces: Vec<Trace>,
}

/// In-memory [`ChartSurface`] keyed by surface id.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ChartBoard {
    charts: BTreeMap<String, ChartState>,
}

impl ChartBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn chart(&self, surface_id: &str) -> Option<&ChartState> {
        self.charts.get(surface_id)
    }

    fn chart_mut(&mut self, surface_id: &str) -> AppResult<&mut ChartState> {
        self.charts
            .get_mut(surface_id)
            .ok_or_else(|| AppError::Surface(format!("chart '{surface_id}' not rendered")))
    }

    fn trace_mut(&mut self, surface_id: &str, trace_index: usize) -> AppResult<&mut Trace> {
        self.chart_mut(surface_id)?
            .traces
            .get_mut(trace_index)
            .ok_or_else(|| {
                AppError::Surface(format!("chart '{surface_id}' has no trace {trace_index}"))
            })
    }
}

impl ChartSurface for ChartBoard {
    fn render(&mut self, surface_id: &str, traces: Vec<Trace>, layout: &PlotLayout) {
        self.charts.insert(
            surface_id.to_string(),
            ChartState {
                layout: layout.clone(),
                ranges: AxisRanges::default(),
                traces,
            },
        );
    }

    fn extend(
        &mut self,
        surface_id: &str,
        x: &[DateTime<Utc>],
        y: &[f64],
        trace_index: usize,
    ) -> AppResult<()> {
        let trace = self.trace_mut(surface_id, trace_index)?;
        trace.x.extend_from_slice(x);
        trace.y.extend_from_slice(y);
        Ok(())
    }

    fn add_trace(&mut self, surface_id: &str, trace: Trace) -> AppResult<()> {
        self.chart_mut(surface_id)?.traces.push(trace);
        Ok(())
    }

    fn relayout(&mut self, surface_id: &str, ranges: AxisRanges) -> AppResult<()> {
        self.chart_mut(surface_id)?.ranges = ranges;
        Ok(())
    }

    fn trim_front(
        &mut self,
        surface_id: &str,
        trace_index: usize,
        count: usize,
    ) -> AppResult<()> {
        let trace = self.trace_mut(surface_id, trace_index)?;
        let x_count = count.min(trace.x.len());
        let y_count = count.min(trace.y.len());
        trace.x.drain(..x_count);
        trace.y.drain(..y_count);
        Ok(())
    }

    fn traces(&self, surface_id: &str) -> Option<&[Trace]> {
        self.charts.get(surface_id).map(|c| c.traces.as_slice())
    }
}
