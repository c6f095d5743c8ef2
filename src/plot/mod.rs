//! Scrolling charts.
//!
//! A [`ScrollingPlot`] holds configuration only. The trace data lives on the
//! [`ChartSurface`]; every update extends it in place and then trims it back
//! to the configured window.

use chrono::{DateTime, Duration, Utc};

use crate::error::AppResult;
use crate::surface::{AxisRanges, ChartSurface, Marker, PlotLayout, Trace};

/// How much history a chart keeps visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowPolicy {
    /// Keep the newest `max_points` points of each trace and autoscale y.
    PointCount { max_points: usize },
    /// Keep the points within `max_time_window_ms` of each trace's newest
    /// point. The y range is fixed, or left to the chart when `None`.
    TimeWindow {
        max_time_window_ms: i64,
        y_range: Option<(f64, f64)>,
    },
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::PointCount { max_points: 100 }
    }
}

/// One series handed to a plot: parallel timestamps and values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesInput {
    pub datetime: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
    pub marker: Option<Marker>,
}

impl SeriesInput {
    #[must_use]
    pub fn new(datetime: Vec<DateTime<Utc>>, values: Vec<f64>) -> Self {
        Self {
            datetime,
            values,
            marker: None,
        }
    }

    fn is_aligned(&self) -> bool {
        self.datetime.len() == self.values.len()
    }
}

/// Trace key to series, in display order. `None` marks a series whose
/// source had nothing this tick.
pub type SeriesMapping = Vec<(String, Option<SeriesInput>)>;

pub struct ScrollingPlot {
    title: String,
    surface_id: String,
    layout: PlotLayout,
    policy: WindowPolicy,
}

impl ScrollingPlot {
    #[must_use]
    pub fn new(title: &str, surface_id: &str, policy: WindowPolicy) -> Self {
        Self {
            title: title.to_string(),
            surface_id: surface_id.to_string(),
            layout: PlotLayout::titled(title),
            policy,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }

    #[must_use]
    pub fn layout(&self) -> &PlotLayout {
        &self.layout
    }

    #[must_use]
    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    /// Build one trace per usable key. Missing or misaligned series are skipped.
    #[must_use]
    pub fn make_traces(&self, data: &SeriesMapping) -> Vec<Trace> {
        data.iter()
            .filter_map(|(key, series)| match series {
                Some(series) if series.is_aligned() => Some(Trace {
                    name: key.to_uppercase(),
                    x: series.datetime.clone(),
                    y: series.values.clone(),
                    mode: "lines+markers".to_string(),
                    marker: series.marker.clone(),
                }),
                _ => {
                    tracing::debug!(
                        plot = %self.title,
                        key = %key,
                        "Could not make trace, likely no data found"
                    );
                    None
                }
            })
            .collect()
    }

    /// Replace everything on the chart. Does nothing when no trace could be
    /// built, so a transient empty poll never clears a populated chart.
    pub fn initialize_plot(&self, surface: &mut dyn ChartSurface, data: &SeriesMapping) {
        let traces = self.make_traces(data);
        if traces.is_empty() {
            return;
        }
        surface.render(&self.surface_id, traces, &self.layout);
    }

    /// Append new points to same-named traces, add unknown traces, then trim
    /// the chart back to the window.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Surface` if the chart surface rejects an operation.
    pub fn update_plot(&self, surface: &mut dyn ChartSurface, data: &SeriesMapping) -> AppResult<()> {
        if data.is_empty() {
            return Ok(());
        }

        let traces = self.make_traces(data);
        if traces.is_empty() {
            tracing::debug!(plot = %self.title, "Could not update traces");
            return Ok(());
        }

        let Some(existing) = surface.traces(&self.surface_id) else {
            surface.render(&self.surface_id, traces, &self.layout);
            return Ok(());
        };
        let names: Vec<String> = existing.iter().map(|t| t.name.clone()).collect();

        for trace in traces {
            match names.iter().position(|name| *name == trace.name) {
                Some(index) => surface.extend(&self.surface_id, &trace.x, &trace.y, index)?,
                None => surface.add_trace(&self.surface_id, trace)?,
            }
        }

        match self.policy {
            WindowPolicy::PointCount { max_points } => self.trim_to_points(surface, max_points),
            WindowPolicy::TimeWindow {
                max_time_window_ms,
                y_range,
            } => self.trim_to_time(surface, max_time_window_ms, y_range),
        }
    }

    fn trim_to_points(&self, surface: &mut dyn ChartSurface, max_points: usize) -> AppResult<()> {
        let lengths: Vec<usize> = match surface.traces(&self.surface_id) {
            Some(traces) => traces.iter().map(|t| t.x.len().max(t.y.len())).collect(),
            None => return Ok(()),
        };
        if lengths.iter().all(|len| *len <= max_points) {
            return Ok(());
        }

        for (index, len) in lengths.into_iter().enumerate() {
            if len > max_points {
                surface.trim_front(&self.surface_id, index, len - max_points)?;
            }
        }

        let ranges = surface
            .traces(&self.surface_id)
            .map(|traces| AxisRanges {
                x: time_span(traces),
                y: buffered_value_span(traces),
            })
            .unwrap_or_default();
        surface.relayout(&self.surface_id, ranges)
    }

    fn trim_to_time(
        &self,
        surface: &mut dyn ChartSurface,
        max_time_window_ms: i64,
        y_range: Option<(f64, f64)>,
    ) -> AppResult<()> {
        let window = Duration::milliseconds(max_time_window_ms);
        let stale: Vec<usize> = match surface.traces(&self.surface_id) {
            Some(traces) => traces
                .iter()
                .map(|trace| match trace.x.iter().max() {
                    Some(latest) => {
                        let cutoff = *latest - window;
                        trace.x.iter().take_while(|t| **t < cutoff).count()
                    }
                    None => 0,
                })
                .collect(),
            None => return Ok(()),
        };

        for (index, count) in stale.into_iter().enumerate() {
            if count > 0 {
                surface.trim_front(&self.surface_id, index, count)?;
            }
        }

        let latest = surface
            .traces(&self.surface_id)
            .and_then(|traces| traces.iter().filter_map(|t| t.x.iter().max()).max().copied());
        let Some(latest) = latest else {
            return Ok(());
        };

        surface.relayout(
            &self.surface_id,
            AxisRanges {
                x: Some((latest - window, latest)),
                y: y_range,
            },
        )
    }
}

/// Earliest first point to latest last point across all traces.
fn time_span(traces: &[Trace]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = traces.iter().filter_map(|t| t.x.first()).min()?;
    let last = traces.iter().filter_map(|t| t.x.last()).max()?;
    Some((*first, *last))
}

/// Combined min/max of every trace widened by 10% of the range. NaN is ignored.
fn buffered_value_span(traces: &[Trace]) -> Option<(f64, f64)> {
    let (min, max) = traces
        .iter()
        .flat_map(|t| t.y.iter().copied())
        .filter(|v| v.is_finite())
        .fold(None, |span: Option<(f64, f64)>, v| match span {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })?;
    let buffer = 0.1 * (max - min);
    Some((min - buffer, max + buffer))
}
