use crate::diagram::{
    ALARM_COLOR, DiagramShape, LINE_COLOR, OUTLINE_WIDTH, ShapeFrame, TITLE_FONT_SIZE, outer_rect,
    set_labels, text,
};
use crate::error::AppResult;
use crate::surface::{DrawingSurface, Geometry, Justification, Point, Rect, ShapeId, Size, Style};

const BASE_POS: [f64; 2] = [0.05, 0.85];
const BASE_SIZE: [f64; 2] = [0.9, 0.15];
const DISPLAY_SIZE: [f64; 2] = [0.7, 0.7];
const DISPLAY_POS: [f64; 2] = [0.1, BASE_POS[1] - DISPLAY_SIZE[1]];
const LABEL_FONT_SIZE: f64 = 20.0;

/// Resolved geometry of an MFC: a base bar with a display box on top.
#[derive(Debug, Clone, PartialEq)]
pub struct MfcLayout {
    pub bounds: Rect,
    pub base: Rect,
    pub display: Rect,
    pub title: Point,
    pub pressure_label: Point,
    pub flow_label: Point,
    pub temperature_label: Point,
    pub inlet: Point,
    pub outlet: Point,
}

impl MfcLayout {
    #[must_use]
    pub fn new(position: impl Into<Point>, bounds: impl Into<Size>) -> Self {
        let outer = outer_rect(position, bounds);
        let base = outer.fraction(BASE_POS, BASE_SIZE);
        let display = outer.fraction(DISPLAY_POS, DISPLAY_SIZE);

        let labels_left = DISPLAY_POS[0] + 0.05 * DISPLAY_SIZE[0];
        let label_at = |row: f64| outer.point_at([labels_left, DISPLAY_POS[1] + row * DISPLAY_SIZE[1]]);

        Self {
            bounds: outer,
            base,
            display,
            title: outer.point_at([DISPLAY_POS[0], 0.1]),
            pressure_label: label_at(0.2),
            flow_label: label_at(0.5),
            temperature_label: label_at(0.8),
            inlet: base.left_center(),
            outlet: base.right_center(),
        }
    }
}

/// Mass-flow controller drawing.
///
/// Text fields, in order: mass flow, pressure, temperature.
pub struct MfcShape {
    frame: ShapeFrame,
    layout: MfcLayout,
    color: String,
    display: ShapeId,
    labels: [ShapeId; 3],
}

impl MfcShape {
    pub fn draw(
        surface: &mut dyn DrawingSurface,
        position: impl Into<Point>,
        bounds: impl Into<Size>,
        label: &str,
    ) -> Self {
        let layout = MfcLayout::new(position, bounds);
        let color = ALARM_COLOR.to_string();

        let bounding_box = ShapeFrame::bounding_box(surface, layout.bounds);
        let base = surface.create_shape(
            Geometry::Rectangle { rect: layout.base },
            Style::filled(LINE_COLOR),
        );
        let display = surface.create_shape(
            Geometry::Rectangle {
                rect: layout.display,
            },
            Style::filled(&color).with_stroke(LINE_COLOR, OUTLINE_WIDTH),
        );
        let title = surface.create_shape(
            text(layout.title, label, Justification::Left, TITLE_FONT_SIZE),
            Style::filled(LINE_COLOR),
        );
        let flow = surface.create_shape(
            text(layout.flow_label, "XX.XX sccm", Justification::Left, LABEL_FONT_SIZE),
            Style::filled(LINE_COLOR),
        );
        let pressure = surface.create_shape(
            text(layout.pressure_label, "XX.XX psi", Justification::Left, LABEL_FONT_SIZE),
            Style::filled(LINE_COLOR),
        );
        let temperature = surface.create_shape(
            text(
                layout.temperature_label,
                "XX.XX °C",
                Justification::Left,
                LABEL_FONT_SIZE,
            ),
            Style::filled(LINE_COLOR),
        );

        let group = surface.group(&[base, display, title, pressure, flow, temperature]);

        Self {
            frame: ShapeFrame {
                bounds: layout.bounds,
                inlet: layout.inlet,
                outlet: layout.outlet,
                group,
                bounding_box,
            },
            layout,
            color,
            display,
            labels: [flow, pressure, temperature],
        }
    }

    #[must_use]
    pub fn layout(&self) -> &MfcLayout {
        &self.layout
    }

    /// Label primitives: mass flow, pressure, temperature.
    #[must_use]
    pub fn labels(&self) -> [ShapeId; 3] {
        self.labels
    }

    #[must_use]
    pub fn display(&self) -> ShapeId {
        self.display
    }
}

impl DiagramShape for MfcShape {
    fn frame(&self) -> &ShapeFrame {
        &self.frame
    }

    fn color(&self) -> Option<&str> {
        Some(&self.color)
    }

    fn update_color(&mut self, surface: &mut dyn DrawingSurface, color: &str) -> AppResult<()> {
        surface.set_fill(self.display, color)?;
        color.clone_into(&mut self.color);
        Ok(())
    }

    fn update_text(&mut self, surface: &mut dyn DrawingSurface, fields: &[String]) -> AppResult<()> {
        set_labels(surface, &self.labels, fields)
    }
}
