use crate::devices::{ConnectionState, Daq, DeviceEndpoint, DeviceKind, LastValues, measurement};
use crate::diagram::{ACTIVE_COLOR, ALARM_COLOR, DiagramShape, MfcShape, PLACEHOLDER};
use crate::error::AppResult;
use crate::surface::{DrawingSurface, Point, Size};

/// Mass-flow controller.
pub struct Mfc {
    endpoint: DeviceEndpoint,
    connection: ConnectionState,
    diagram: Option<MfcShape>,
}

impl Mfc {
    #[must_use]
    pub fn new(label: &str, access_point: &str) -> Self {
        Self {
            endpoint: DeviceEndpoint::new(label, access_point),
            connection: ConnectionState::default(),
            diagram: None,
        }
    }

    /// Label texts for `last_values`: mass flow, pressure, temperature.
    #[must_use]
    pub fn diagram_text(&self, last_values: &LastValues) -> [String; 3] {
        if !self.connection.is_connected {
            return placeholders();
        }
        [
            measurement(last_values, "mass_flow", "sccm"),
            measurement(last_values, "pressure", "psi"),
            measurement(last_values, "temperature", "°C"),
        ]
    }

    #[must_use]
    pub fn shape(&self) -> Option<&MfcShape> {
        self.diagram.as_ref()
    }

    fn render_disconnected(&mut self, surface: &mut dyn DrawingSurface) -> AppResult<()> {
        if let Some(diagram) = self.diagram.as_mut() {
            diagram.update_color(surface, ALARM_COLOR)?;
            diagram.update_text(surface, &placeholders())?;
        }
        Ok(())
    }
}

fn placeholders() -> [String; 3] {
    std::array::from_fn(|_| PLACEHOLDER.to_string())
}

impl Daq for Mfc {
    fn kind(&self) -> DeviceKind {
        DeviceKind::Mfc
    }

    fn endpoint(&self) -> &DeviceEndpoint {
        &self.endpoint
    }

    fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    fn connection_mut(&mut self) -> &mut ConnectionState {
        &mut self.connection
    }

    fn diagram(&self) -> Option<&dyn DiagramShape> {
        self.diagram.as_ref().map(|d| d as &dyn DiagramShape)
    }

    fn draw_diagram(&mut self, surface: &mut dyn DrawingSurface, position: Point, bounds: Size) {
        self.diagram = Some(MfcShape::draw(surface, position, bounds, &self.endpoint.label));
    }

    fn update_diagram(&mut self, surface: &mut dyn DrawingSurface) -> AppResult<()> {
        if !self.connection.is_connected {
            return self.render_disconnected(surface);
        }
        if let Some(diagram) = self.diagram.as_mut() {
            diagram.update_color(surface, ACTIVE_COLOR)?;
        }
        Ok(())
    }

    fn update_diagram_text(
        &mut self,
        surface: &mut dyn DrawingSurface,
        last_values: &LastValues,
    ) -> AppResult<()> {
        let fields = self.diagram_text(last_values);
        if let Some(diagram) = self.diagram.as_mut() {
            diagram.update_text(surface, &fields)?;
        }
        Ok(())
    }

    fn show_offline(&mut self, surface: &mut dyn DrawingSurface) -> AppResult<()> {
        self.render_disconnected(surface)
    }
}
