use crate::backend::models::PortSetting;
use crate::devices::{
    ConnectionState, Daq, DeviceEndpoint, DeviceKind, DeviceModal, LastValues, measurement,
};
use crate::diagram::{ACTIVE_COLOR, ALARM_COLOR, DiagramShape, PLACEHOLDER, SensorShape};
use crate::error::AppResult;
use crate::surface::{DrawingSurface, Point, Size};

/// Humidity/temperature sensor on a shared bus, addressed by `address`.
pub struct Sensor {
    endpoint: DeviceEndpoint,
    connection: ConnectionState,
    address: u8,
    diagram: Option<SensorShape>,
}

impl Sensor {
    #[must_use]
    pub fn new(label: &str, access_point: &str, address: u8) -> Self {
        Self {
            endpoint: DeviceEndpoint::new(label, access_point),
            connection: ConnectionState::default(),
            address,
            diagram: None,
        }
    }

    #[must_use]
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Label texts for `last_values`: address, humidity, temperature.
    ///
    /// The address is taken from the reported `sensor_addr` when present.
    #[must_use]
    pub fn diagram_text(&self, last_values: &LastValues) -> [String; 3] {
        if !self.connection.is_connected || last_values.is_empty() {
            return blank_fields();
        }

        let address = last_values
            .get("sensor_addr")
            .filter(|a| a.is_finite() && (0.0..=255.0).contains(*a))
            .map_or(self.address, |a| *a as u8);

        [
            format!("{address:02x}"),
            measurement(last_values, "humidity", "%RH"),
            measurement(last_values, "temperature", "°C"),
        ]
    }

    #[must_use]
    pub fn shape(&self) -> Option<&SensorShape> {
        self.diagram.as_ref()
    }

    fn render(&mut self, surface: &mut dyn DrawingSurface, connected: bool) -> AppResult<()> {
        let Some(diagram) = self.diagram.as_mut() else {
            return Ok(());
        };
        if connected {
            diagram.update_color(surface, ACTIVE_COLOR)
        } else {
            diagram.update_color(surface, ALARM_COLOR)?;
            diagram.update_text(surface, &blank_fields())
        }
    }
}

fn blank_fields() -> [String; 3] {
    [
        String::new(),
        PLACEHOLDER.to_string(),
        PLACEHOLDER.to_string(),
    ]
}

impl Daq for Sensor {
    fn kind(&self) -> DeviceKind {
        DeviceKind::Sensor
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
        self.diagram = Some(SensorShape::draw(surface, position, bounds, &self.endpoint.label));
    }

    fn connection_param(&self, port: String, address: Option<u8>) -> PortSetting {
        PortSetting::Addressed(port, address.unwrap_or(self.address))
    }

    fn update_diagram(&mut self, surface: &mut dyn DrawingSurface) -> AppResult<()> {
        if let Some(PortSetting::Addressed(_, address)) = &self.connection.port {
            self.address = *address;
        }
        let connected = self.connection.is_connected;
        self.render(surface, connected)
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
        self.render(surface, false)
    }

    fn update_modal(&self) -> DeviceModal {
        let port = match &self.connection.port {
            Some(PortSetting::Addressed(port, _)) => port.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        DeviceModal {
            label: self.endpoint.label.clone(),
            port,
            address: Some(format!("0x{:02X}", self.address)),
        }
    }
}
