//! Rendering capabilities and their in-memory implementations.
//!
//! The diagram and chart code only ever talk to [`DrawingSurface`] and
//! [`ChartSurface`]. [`SceneGraph`] and [`ChartBoard`] record the calls as
//! plain data which the HTTP API hands to the browser.

pub mod chart;
pub mod geometry;
pub mod scene;

pub use chart::{AxisRanges, ChartBoard, ChartState, ChartSurface, Marker, PlotLayout, Trace};
pub use geometry::{Point, Rect, Size};
pub use scene::{DrawingSurface, Geometry, Justification, SceneGraph, ShapeId, Style};
