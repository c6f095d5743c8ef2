use crate::diagram::{
    ALARM_COLOR, DiagramShape, LINE_COLOR, OUTLINE_WIDTH, ShapeFrame, TITLE_FONT_SIZE, outer_rect,
    set_labels, text,
};
use crate::error::AppResult;
use crate::surface::{DrawingSurface, Geometry, Justification, Point, Rect, ShapeId, Size, Style};

const LABEL_FONT_SIZE: f64 = 18.0;

/// Resolved geometry of a humidity/temperature sensor: a round display
/// with the readings stacked under it.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorLayout {
    pub bounds: Rect,
    pub display_center: Point,
    pub display_radius: f64,
    pub title: Point,
    pub address_label: Point,
    pub humidity_label: Point,
    pub temperature_label: Point,
    pub inlet: Point,
    pub outlet: Point,
}

impl SensorLayout {
    #[must_use]
    pub fn new(position: impl Into<Point>, bounds: impl Into<Size>) -> Self {
        let outer = outer_rect(position, bounds);
        let radius = outer.size.width / 2.0;
        let display_center = outer.origin.offset(radius, radius);

        Self {
            bounds: outer,
            display_center,
            display_radius: radius,
            title: outer.point_at([0.5, -0.05]),
            address_label: outer.point_at([0.5, 0.3]),
            humidity_label: outer.point_at([0.5, 0.7]),
            temperature_label: outer.point_at([0.5, 0.9]),
            inlet: Point::new(outer.left(), display_center.y),
            outlet: Point::new(outer.right(), display_center.y),
        }
    }
}

/// Sensor drawing.
///
/// Text fields, in order: bus address, humidity, temperature.
pub struct SensorShape {
    frame: ShapeFrame,
    layout: SensorLayout,
    color: String,
    display: ShapeId,
    labels: [ShapeId; 3],
}

impl SensorShape {
    pub fn draw(
        surface: &mut dyn DrawingSurface,
        position: impl Into<Point>,
        bounds: impl Into<Size>,
        label: &str,
    ) -> Self {
        let layout = SensorLayout::new(position, bounds);
        let color = ALARM_COLOR.to_string();

        let bounding_box = ShapeFrame::bounding_box(surface, layout.bounds);
        let display = surface.create_shape(
            Geometry::Circle {
                center: layout.display_center,
                radius: layout.display_radius,
            },
            Style::filled(&color).with_stroke(LINE_COLOR, OUTLINE_WIDTH),
        );
        let title = surface.create_shape(
            text(layout.title, label, Justification::Center, TITLE_FONT_SIZE),
            Style::filled(LINE_COLOR),
        );
        let address = surface.create_shape(
            text(layout.address_label, "", Justification::Center, LABEL_FONT_SIZE),
            Style::filled(LINE_COLOR),
        );
        let humidity = surface.create_shape(
            text(layout.humidity_label, "XX.XX %RH", Justification::Center, LABEL_FONT_SIZE),
            Style::filled(LINE_COLOR),
        );
        let temperature = surface.create_shape(
            text(
                layout.temperature_label,
                "XX.XX °C",
                Justification::Center,
                LABEL_FONT_SIZE,
            ),
            Style::filled(LINE_COLOR),
        );

        let group = surface.group(&[bounding_box, display, title, address, humidity, temperature]);

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
            labels: [address, humidity, temperature],
        }
    }

    #[must_use]
    pub fn layout(&self) -> &SensorLayout {
        &self.layout
    }

    /// Label primitives: address, humidity, temperature.
    #[must_use]
    pub fn labels(&self) -> [ShapeId; 3] {
        self.labels
    }

    #[must_use]
    pub fn display(&self) -> ShapeId {
        self.display
    }
}

impl DiagramShape for SensorShape {
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
