use crate::devices::{ConnectionState, Daq, DeviceEndpoint, DeviceKind, LastValues, fixed2};
use crate::diagram::{DiagramShape, HUMIDIFIER_COLOR, HumidifierShape, PLACEHOLDER};
use crate::error::AppResult;
use crate::surface::{DrawingSurface, Point, Size};

pub(crate) const IDLE_COLOR: &str = "lightgray";

/// Virtual device reporting the humidity setpoint applied to the humidifier.
pub struct HumiditySetpoint {
    endpoint: DeviceEndpoint,
    connection: ConnectionState,
    diagram: Option<HumidifierShape>,
}

impl HumiditySetpoint {
    #[must_use]
    pub fn new(label: &str, access_point: &str) -> Self {
        Self {
            endpoint: DeviceEndpoint::new(label, access_point),
            connection: ConnectionState::default(),
            diagram: None,
        }
    }

    #[must_use]
    pub fn diagram_text(&self, last_values: &LastValues) -> String {
        match last_values.get("humidity") {
            Some(h) if self.connection.is_connected => format!("SP {} %RH", fixed2(*h)),
            _ => format!("SP {PLACEHOLDER}"),
        }
    }

    #[must_use]
    pub fn shape(&self) -> Option<&HumidifierShape> {
        self.diagram.as_ref()
    }
}

impl Daq for HumiditySetpoint {
    fn kind(&self) -> DeviceKind {
        DeviceKind::HumiditySetpoint
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
        self.diagram = Some(HumidifierShape::draw(surface, position, bounds, "Humidifier"));
    }

    fn update_diagram(&mut self, surface: &mut dyn DrawingSurface) -> AppResult<()> {
        let Some(diagram) = self.diagram.as_mut() else {
            return Ok(());
        };
        if self.connection.is_connected {
            diagram.update_color(surface, HUMIDIFIER_COLOR)
        } else {
            diagram.update_color(surface, IDLE_COLOR)?;
            diagram.update_text(surface, &[format!("SP {PLACEHOLDER}")])
        }
    }

    fn update_diagram_text(
        &mut self,
        surface: &mut dyn DrawingSurface,
        last_values: &LastValues,
    ) -> AppResult<()> {
        let text = self.diagram_text(last_values);
        if let Some(diagram) = self.diagram.as_mut() {
            diagram.update_text(surface, &[text])?;
        }
        Ok(())
    }

    fn show_offline(&mut self, surface: &mut dyn DrawingSurface) -> AppResult<()> {
        if let Some(diagram) = self.diagram.as_mut() {
            diagram.update_color(surface, IDLE_COLOR)?;
        }
        Ok(())
    }
}
