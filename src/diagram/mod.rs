//! Schematic shapes of the rig.
//!
//! Every shape is built from a top-left `position` and a `bounds` size. The
//! placement of its parts is a pure layout function of those two values (see
//! the `*Layout` types), so geometry can be checked without a surface. After
//! construction only colour and text change.

mod mfc;
mod passive;
mod sensor;

pub use mfc::{MfcLayout, MfcShape};
pub use passive::{GasCylinderLayout, GasCylinderShape, HumidifierLayout, HumidifierShape};
pub(crate) use passive::HUMIDIFIER_COLOR;
pub use sensor::{SensorLayout, SensorShape};

use crate::error::AppResult;
use crate::surface::{DrawingSurface, Geometry, Point, Rect, ShapeId, Size, Style};

/// Fill of a connected device display.
pub const ACTIVE_COLOR: &str = "green";
/// Fill of a disconnected device display.
pub const ALARM_COLOR: &str = "red";
/// Placeholder shown instead of a measurement.
pub const PLACEHOLDER: &str = "--";

pub(crate) const LINE_COLOR: &str = "black";
pub(crate) const FLOW_LINE_WIDTH: f64 = 5.0;
pub(crate) const OUTLINE_WIDTH: f64 = 2.0;
pub(crate) const TITLE_FONT_SIZE: f64 = 20.0;

/// Geometry shared by all shapes, resolved at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeFrame {
    pub bounds: Rect,
    pub inlet: Point,
    pub outlet: Point,
    /// Group holding every primitive of the shape.
    pub group: ShapeId,
    /// Outline of `bounds`, hidden unless [`DiagramShape::show_bounding_box`] is called.
    pub bounding_box: ShapeId,
}

impl ShapeFrame {
    pub(crate) fn bounding_box(surface: &mut dyn DrawingSurface, bounds: Rect) -> ShapeId {
        surface.create_shape(
            Geometry::Rectangle { rect: bounds },
            Style::stroked(LINE_COLOR, OUTLINE_WIDTH).hidden(),
        )
    }
}

/// Resolve `position` and `bounds` into the outer rectangle of a shape.
#[must_use]
pub fn outer_rect(position: impl Into<Point>, bounds: impl Into<Size>) -> Rect {
    Rect::new(position.into(), bounds.into())
}

pub trait DiagramShape: Send + Sync {
    fn frame(&self) -> &ShapeFrame;

    fn inlet(&self) -> Point {
        self.frame().inlet
    }

    fn outlet(&self) -> Point {
        self.frame().outlet
    }

    /// Current state colour of the shape, if it has one.
    fn color(&self) -> Option<&str> {
        None
    }

    /// Recolour the state indicator. Passive shapes ignore it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Surface` if the surface lost the shape.
    fn update_color(&mut self, _surface: &mut dyn DrawingSurface, _color: &str) -> AppResult<()> {
        Ok(())
    }

    /// Replace the live label texts, in the shape's field order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Surface` if the surface lost the shape.
    fn update_text(
        &mut self,
        _surface: &mut dyn DrawingSurface,
        _fields: &[String],
    ) -> AppResult<()> {
        Ok(())
    }

    /// Draw a flow line from this outlet through `waypoints` to `other`'s inlet.
    fn route_line_to(
        &self,
        surface: &mut dyn DrawingSurface,
        other: &dyn DiagramShape,
        waypoints: &[Point],
    ) -> ShapeId {
        let mut points = Vec::with_capacity(waypoints.len() + 2);
        points.push(self.outlet());
        points.extend_from_slice(waypoints);
        points.push(other.inlet());

        surface.create_shape(
            Geometry::Polyline { points },
            Style::stroked(LINE_COLOR, FLOW_LINE_WIDTH),
        )
    }

    /// Mark the inlet (blue) and outlet (red) anchors.
    fn make_inlet_outlet_markers(&self, surface: &mut dyn DrawingSurface) -> [ShapeId; 2] {
        let inlet = surface.create_shape(
            Geometry::Circle {
                center: self.inlet(),
                radius: 5.0,
            },
            Style::filled("blue"),
        );
        let outlet = surface.create_shape(
            Geometry::Circle {
                center: self.outlet(),
                radius: 5.0,
            },
            Style::filled(ALARM_COLOR),
        );
        [inlet, outlet]
    }

    /// # Errors
    ///
    /// Returns `AppError::Surface` if the surface lost the shape.
    fn show_bounding_box(&self, surface: &mut dyn DrawingSurface) -> AppResult<()> {
        surface.set_visible(self.frame().bounding_box, true)
    }
}

/// Apply `fields` to `labels` pairwise. Extra fields are ignored, missing ones
/// leave the label untouched.
pub(crate) fn set_labels(
    surface: &mut dyn DrawingSurface,
    labels: &[ShapeId],
    fields: &[String],
) -> AppResult<()> {
    for (label, text) in labels.iter().zip(fields) {
        surface.set_text(*label, text)?;
    }
    Ok(())
}

pub(crate) fn text(
    anchor: Point,
    content: &str,
    justification: crate::surface::Justification,
    font_size: f64,
) -> Geometry {
    Geometry::Text {
        anchor,
        content: content.to_string(),
        justification,
        font_size,
        bold: true,
    }
}
