use crate::diagram::{
    DiagramShape, LINE_COLOR, OUTLINE_WIDTH, PLACEHOLDER, ShapeFrame, TITLE_FONT_SIZE, outer_rect,
    set_labels, text,
};
use crate::error::AppResult;
use crate::surface::{DrawingSurface, Geometry, Justification, Point, Rect, ShapeId, Size, Style};

const CYLINDER_COLOR: &str = "green";
pub(crate) const HUMIDIFIER_COLOR: &str = "blue";

#[derive(Debug, Clone, PartialEq)]
pub struct GasCylinderLayout {
    pub body: Rect,
    pub caption: Point,
    pub valve_center: Point,
    pub valve_radius: f64,
}

impl GasCylinderLayout {
    #[must_use]
    pub fn new(position: impl Into<Point>, bounds: impl Into<Size>) -> Self {
        let body = outer_rect(position, bounds);
        Self {
            body,
            caption: Point::new(body.center().x, body.bottom() + 20.0),
            valve_center: Point::new(body.center().x, body.top()),
            valve_radius: 0.25 * body.size.width,
        }
    }
}

/// Gas supply. Gas enters and leaves through the valve, so inlet and outlet
/// are both the valve centre.
pub struct GasCylinderShape {
    frame: ShapeFrame,
    layout: GasCylinderLayout,
}

impl GasCylinderShape {
    pub fn draw(
        surface: &mut dyn DrawingSurface,
        position: impl Into<Point>,
        bounds: impl Into<Size>,
    ) -> Self {
        let layout = GasCylinderLayout::new(position, bounds);

        let bounding_box = ShapeFrame::bounding_box(surface, layout.body);
        // Valve first so the body paints over its lower half.
        let valve = surface.create_shape(
            Geometry::Circle {
                center: layout.valve_center,
                radius: layout.valve_radius,
            },
            Style::filled(LINE_COLOR),
        );
        let body = surface.create_shape(
            Geometry::Rectangle { rect: layout.body },
            Style::filled(CYLINDER_COLOR).with_stroke(LINE_COLOR, OUTLINE_WIDTH),
        );
        let caption = surface.create_shape(
            text(layout.caption, "O2 Cylinder", Justification::Center, TITLE_FONT_SIZE),
            Style::filled(LINE_COLOR),
        );
        let group = surface.group(&[valve, body, caption]);

        Self {
            frame: ShapeFrame {
                bounds: layout.body,
                inlet: layout.valve_center,
                outlet: layout.valve_center,
                group,
                bounding_box,
            },
            layout,
        }
    }

    #[must_use]
    pub fn layout(&self) -> &GasCylinderLayout {
        &self.layout
    }
}

impl DiagramShape for GasCylinderShape {
    fn frame(&self) -> &ShapeFrame {
        &self.frame
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HumidifierLayout {
    pub body: Rect,
    pub caption: Point,
    pub setpoint_label: Point,
    pub inlet: Point,
    pub outlet: Point,
}

impl HumidifierLayout {
    #[must_use]
    pub fn new(position: impl Into<Point>, bounds: impl Into<Size>) -> Self {
        let body = outer_rect(position, bounds);
        Self {
            body,
            caption: body.point_at([0.5, -0.2]),
            setpoint_label: body.point_at([0.5, 1.7]),
            inlet: body.left_center(),
            outlet: body.right_center(),
        }
    }
}

/// Humidifier. Its body colour and single text field belong to the humidity
/// setpoint device when one owns it.
pub struct HumidifierShape {
    frame: ShapeFrame,
    layout: HumidifierLayout,
    color: String,
    body: ShapeId,
    setpoint: ShapeId,
}

impl HumidifierShape {
    pub fn draw(
        surface: &mut dyn DrawingSurface,
        position: impl Into<Point>,
        bounds: impl Into<Size>,
        label: &str,
    ) -> Self {
        let layout = HumidifierLayout::new(position, bounds);
        let color = HUMIDIFIER_COLOR.to_string();

        let bounding_box = ShapeFrame::bounding_box(surface, layout.body);
        let body = surface.create_shape(
            Geometry::Rectangle { rect: layout.body },
            Style::filled(&color).with_stroke(LINE_COLOR, OUTLINE_WIDTH),
        );
        let caption = surface.create_shape(
            text(layout.caption, label, Justification::Center, TITLE_FONT_SIZE),
            Style::filled(LINE_COLOR),
        );
        let setpoint = surface.create_shape(
            text(
                layout.setpoint_label,
                &format!("SP {PLACEHOLDER}"),
                Justification::Center,
                16.0,
            ),
            Style::filled(LINE_COLOR),
        );
        let group = surface.group(&[body, caption, setpoint]);

        Self {
            frame: ShapeFrame {
                bounds: layout.body,
                inlet: layout.inlet,
                outlet: layout.outlet,
                group,
                bounding_box,
            },
            layout,
            color,
            body,
            setpoint,
        }
    }

    #[must_use]
    pub fn layout(&self) -> &HumidifierLayout {
        &self.layout
    }

    #[must_use]
    pub fn setpoint_label(&self) -> ShapeId {
        self.setpoint
    }
}

impl DiagramShape for HumidifierShape {
    fn frame(&self) -> &ShapeFrame {
        &self.frame
    }

    fn color(&self) -> Option<&str> {
        Some(&self.color)
    }

    fn update_color(&mut self, surface: &mut dyn DrawingSurface, color: &str) -> AppResult<()> {
        surface.set_fill(self.body, color)?;
        color.clone_into(&mut self.color);
        Ok(())
    }

    fn update_text(&mut self, surface: &mut dyn DrawingSurface, fields: &[String]) -> AppResult<()> {
        set_labels(surface, &[self.setpoint], fields)
    }
}
