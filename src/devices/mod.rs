//! Data sources of the rig.
//!
//! A device pairs a backend endpoint with a cached connection state and,
//! for the kinds that appear on the schematic, the shape that shows it.
//! Talking to the backend is split from applying the result so callers can
//! do the I/O without holding the dashboard lock.

mod generic;
mod mfc;
mod sensor;
mod setpoint;

pub use generic::GenericDaq;
pub use mfc::Mfc;
pub use sensor::Sensor;
pub use setpoint::HumiditySetpoint;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::backend::RigBackend;
use crate::backend::models::{ConnectionReply, PortSetting, RawSample};
use crate::diagram::{DiagramShape, PLACEHOLDER};
use crate::error::AppResult;
use crate::surface::{DrawingSurface, Point, Size};

/// Parallel time series of one quantity, in backend order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuantitySeries {
    pub datetime: Vec<DateTime<Utc>>,
    pub timestamp: Vec<f64>,
    pub values: Vec<f64>,
}

impl QuantitySeries {
    #[must_use]
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Quantity name to series, as produced by [`DeviceEndpoint::fetch_data`].
pub type DeviceSamples = BTreeMap<String, QuantitySeries>;

/// Quantity name to its most recent reading.
pub type LastValues = BTreeMap<String, f64>;

/// Turn a flat record sequence into one series per quantity.
///
/// A quantity that only appears in some records only gets those records'
/// points, so each series stays internally aligned.
#[must_use]
pub fn reshape_samples(records: Vec<RawSample>) -> DeviceSamples {
    let mut samples = DeviceSamples::new();
    for record in records {
        for (quantity, value) in record.values {
            let series = samples.entry(quantity).or_default();
            series.datetime.push(record.datetime);
            series.timestamp.push(record.timestamp);
            series.values.push(value);
        }
    }
    samples
}

#[must_use]
pub fn last_values(samples: &DeviceSamples) -> LastValues {
    samples
        .iter()
        .filter_map(|(quantity, series)| series.last().map(|v| (quantity.clone(), v)))
        .collect()
}

/// Two-decimal rendering. Non-finite values pass through as-is.
#[must_use]
pub fn fixed2(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        value.to_string()
    }
}

/// `"{value:.2} {unit}"`, or the placeholder when the quantity is absent.
#[must_use]
pub fn measurement(values: &LastValues, quantity: &str, unit: &str) -> String {
    values
        .get(quantity)
        .map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{} {unit}", fixed2(*v)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Daq,
    Mfc,
    Sensor,
    HumiditySetpoint,
}

/// Identity of a device on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEndpoint {
    pub label: String,
    pub access_point: String,
}

impl DeviceEndpoint {
    #[must_use]
    pub fn new(label: &str, access_point: &str) -> Self {
        Self {
            label: label.to_string(),
            access_point: access_point.to_string(),
        }
    }

    /// Fetch the sample history and reshape it per quantity.
    ///
    /// # Errors
    ///
    /// Returns the backend error unchanged; the caller decides how to isolate it.
    pub async fn fetch_data(&self, backend: &dyn RigBackend) -> AppResult<DeviceSamples> {
        let records = backend.fetch_samples(&self.access_point).await?;
        Ok(reshape_samples(records))
    }

    /// Ask the backend to connect on `port`. Failures are logged and yield `None`.
    pub async fn request_connect(
        &self,
        backend: &dyn RigBackend,
        port: &PortSetting,
    ) -> Option<ConnectionReply> {
        match backend.connect(&self.access_point, port).await {
            Ok(reply) => {
                tracing::info!(
                    device = %self.label,
                    port = %port,
                    success = reply.success,
                    message = reply.message.as_deref().unwrap_or_default(),
                    "Connect reply"
                );
                Some(reply)
            }
            Err(e) => {
                tracing::error!(device = %self.label, error = %e, "Error connecting");
                None
            }
        }
    }

    /// Read the backend's connection state. Failures are logged and yield `None`.
    pub async fn query_connection(&self, backend: &dyn RigBackend) -> Option<ConnectionReply> {
        match backend.connection_status(&self.access_point).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                tracing::warn!(device = %self.label, error = %e, "Error checking connection");
                None
            }
        }
    }
}

/// Cached connection state. Mirrors the backend; writing it connects nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionState {
    pub is_connected: bool,
    pub port: Option<PortSetting>,
    /// Bumped every time a user connect reply is applied.
    pub revision: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusBadge {
    pub text: String,
    pub class: String,
}

/// Content of a device's edit dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DeviceModal {
    pub label: String,
    pub port: String,
    pub address: Option<String>,
}

pub trait Daq: Send + Sync {
    fn kind(&self) -> DeviceKind;

    fn endpoint(&self) -> &DeviceEndpoint;

    fn connection(&self) -> &ConnectionState;

    fn connection_mut(&mut self) -> &mut ConnectionState;

    fn label(&self) -> &str {
        &self.endpoint().label
    }

    fn is_connected(&self) -> bool {
        self.connection().is_connected
    }

    fn port(&self) -> Option<&PortSetting> {
        self.connection().port.as_ref()
    }

    fn diagram(&self) -> Option<&dyn DiagramShape> {
        None
    }

    /// Create this device's shape on `surface`. Kinds without one ignore it.
    fn draw_diagram(&mut self, _surface: &mut dyn DrawingSurface, _position: Point, _bounds: Size) {}

    /// Build the connect parameter for this kind from user input.
    fn connection_param(&self, port: String, _address: Option<u8>) -> PortSetting {
        PortSetting::Path(port)
    }

    /// Reflect the cached connection state on the shape.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Surface` if the surface lost the shape.
    fn update_diagram(&mut self, _surface: &mut dyn DrawingSurface) -> AppResult<()> {
        Ok(())
    }

    /// Show the latest readings on the shape.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Surface` if the surface lost the shape.
    fn update_diagram_text(
        &mut self,
        _surface: &mut dyn DrawingSurface,
        _last_values: &LastValues,
    ) -> AppResult<()> {
        Ok(())
    }

    /// Disconnected styling for a tick where this device could not be read.
    /// The cached connection state is left alone.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Surface` if the surface lost the shape.
    fn show_offline(&mut self, _surface: &mut dyn DrawingSurface) -> AppResult<()> {
        Ok(())
    }

    fn update_modal(&self) -> DeviceModal {
        DeviceModal {
            label: self.label().to_string(),
            port: self.port().map(ToString::to_string).unwrap_or_default(),
            address: None,
        }
    }

    fn status_badge(&self) -> StatusBadge {
        if self.is_connected() {
            StatusBadge {
                text: "Status: Connected".to_string(),
                class: "bg-success".to_string(),
            }
        } else {
            StatusBadge {
                text: "Status: Disconnected".to_string(),
                class: "bg-danger".to_string(),
            }
        }
    }

    /// Store a backend connection reply and redraw. Returns the new state.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Surface` if the redraw fails; the state is stored regardless.
    fn apply_connection(
        &mut self,
        reply: &ConnectionReply,
        surface: &mut dyn DrawingSurface,
    ) -> AppResult<bool> {
        let state = self.connection_mut();
        state.is_connected = reply.success;
        if let Some(port) = &reply.port {
            state.port = Some(port.clone());
        }
        self.update_diagram(surface)?;
        Ok(self.is_connected())
    }

    /// Store the reply of a user connect, superseding any status query
    /// issued before it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Surface` if the redraw fails.
    fn apply_connect_reply(
        &mut self,
        reply: &ConnectionReply,
        surface: &mut dyn DrawingSurface,
    ) -> AppResult<bool> {
        self.connection_mut().revision += 1;
        self.apply_connection(reply, surface)
    }
}

/// Query the backend and refresh `device`. Never fails: on a failed query
/// the previous state is kept and returned.
pub async fn check_connection(
    device: &mut dyn Daq,
    backend: &dyn RigBackend,
    surface: &mut dyn DrawingSurface,
) -> bool {
    let endpoint = device.endpoint().clone();
    let Some(reply) = endpoint.query_connection(backend).await else {
        return device.is_connected();
    };

    match device.apply_connection(&reply, surface) {
        Ok(connected) => connected,
        Err(e) => {
            tracing::warn!(device = %endpoint.label, error = %e, "Failed to redraw device");
            device.is_connected()
        }
    }
}

/// Send a connect command for `device` and apply the reply.
pub async fn connect(
    device: &mut dyn Daq,
    backend: &dyn RigBackend,
    surface: &mut dyn DrawingSurface,
    port: &PortSetting,
) -> Option<ConnectionReply> {
    let endpoint = device.endpoint().clone();
    let reply = endpoint.request_connect(backend, port).await?;
    if let Err(e) = device.apply_connect_reply(&reply, surface) {
        tracing::warn!(device = %endpoint.label, error = %e, "Failed to redraw device");
    }
    Some(reply)
}
