use crate::devices::{ConnectionState, Daq, DeviceEndpoint, DeviceKind};

/// Plain data source with no schematic shape, e.g. the dummy test channels.
pub struct GenericDaq {
    endpoint: DeviceEndpoint,
    connection: ConnectionState,
}

impl GenericDaq {
    #[must_use]
    pub fn new(label: &str, access_point: &str) -> Self {
        Self {
            endpoint: DeviceEndpoint::new(label, access_point),
            connection: ConnectionState::default(),
        }
    }
}

impl Daq for GenericDaq {
    fn kind(&self) -> DeviceKind {
        DeviceKind::Daq
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
}
