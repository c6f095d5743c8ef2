use std::collections::BTreeMap;

use futures::future::join_all;

use crate::backend::RigBackend;
use crate::backend::models::ConnectionReply;
use crate::devices::{DeviceEndpoint, DeviceSamples, LastValues, last_values};
use crate::plot::{SeriesInput, SeriesMapping};

/// Samples of every device for one tick.
#[derive(Debug, Clone, Default)]
pub struct FrameData {
    /// Sequence number of the tick that produced this frame. 0 for frames
    /// gathered outside the refresh loop.
    pub tick: u64,
    pub samples: BTreeMap<String, DeviceSamples>,
    /// Devices whose fetch failed this tick.
    pub failed: Vec<String>,
}

impl FrameData {
    #[must_use]
    pub fn has_failed(&self, device: &str) -> bool {
        self.failed.iter().any(|d| d == device)
    }

    /// One quantity of one device as plot input, `None` if absent this tick.
    #[must_use]
    pub fn series(&self, device: &str, quantity: &str) -> Option<SeriesInput> {
        let series = self.samples.get(device)?.get(quantity)?;
        Some(SeriesInput::new(series.datetime.clone(), series.values.clone()))
    }

    #[must_use]
    pub fn last_values(&self, device: &str) -> LastValues {
        self.samples.get(device).map(last_values).unwrap_or_default()
    }
}

/// Fetch every device concurrently. A failed device is logged and recorded in
/// [`FrameData::failed`]; the others are unaffected.
pub async fn gather_frame(
    endpoints: &[(String, DeviceEndpoint)],
    backend: &dyn RigBackend,
    tick: u64,
) -> FrameData {
    let results = join_all(
        endpoints
            .iter()
            .map(|(_, endpoint)| endpoint.fetch_data(backend)),
    )
    .await;

    let mut frame = FrameData {
        tick,
        ..FrameData::default()
    };
    for ((key, _), result) in endpoints.iter().zip(results) {
        match result {
            Ok(samples) => {
                frame.samples.insert(key.clone(), samples);
            }
            Err(e) => {
                tracing::warn!(device = %key, tick, error = %e, "Failed to fetch device data");
                frame.failed.push(key.clone());
            }
        }
    }
    frame
}

/// Outcome of one connection-status query.
#[derive(Debug, Clone)]
pub struct ConnectionCheck {
    pub device: String,
    /// Connection revision of the device when the query was issued.
    pub revision: u64,
    pub reply: Option<ConnectionReply>,
}

/// Query the connection status of every device concurrently.
pub async fn gather_connections(
    endpoints: &[(String, DeviceEndpoint, u64)],
    backend: &dyn RigBackend,
) -> Vec<ConnectionCheck> {
    let replies = join_all(
        endpoints
            .iter()
            .map(|(_, endpoint, _)| endpoint.query_connection(backend)),
    )
    .await;

    endpoints
        .iter()
        .zip(replies)
        .map(|((device, _, revision), reply)| ConnectionCheck {
            device: device.clone(),
            revision: *revision,
            reply,
        })
        .collect()
}

/// Maps a frame onto the series one chart shows.
pub type Projection = fn(&FrameData) -> SeriesMapping;

fn entry(
    frame: &FrameData,
    name: &str,
    device: &str,
    quantity: &str,
) -> (String, Option<SeriesInput>) {
    (name.to_string(), frame.series(device, quantity))
}

/// Flow rates of both MFCs plus both sensors and the test channel.
#[must_use]
pub fn project_main(frame: &FrameData) -> SeriesMapping {
    vec![
        entry(frame, "MFC1_flowrate", "MFC1", "mass_flow"),
        entry(frame, "MFC2_flowrate", "MFC2", "mass_flow"),
        entry(frame, "SHT1_temperature", "SHT1", "temperature"),
        entry(frame, "SHT1_humidity", "SHT1", "humidity"),
        entry(frame, "SHT2_temperature", "SHT2", "temperature"),
        entry(frame, "SHT2_humidity", "SHT2", "humidity"),
        entry(frame, "test1_y1", "test1", "y1"),
        entry(frame, "test1_y2", "test1", "y2"),
    ]
}

fn project_mfc(frame: &FrameData, mfc: &str) -> SeriesMapping {
    vec![
        entry(frame, &format!("{mfc}_flowrate"), mfc, "volumetric_flow"),
        entry(frame, &format!("{mfc}_setpoint"), mfc, "setpoint"),
        entry(frame, &format!("{mfc}_pressure"), mfc, "pressure"),
    ]
}

#[must_use]
pub fn project_subplot1(frame: &FrameData) -> SeriesMapping {
    project_mfc(frame, "MFC1")
}

#[must_use]
pub fn project_subplot2(frame: &FrameData) -> SeriesMapping {
    project_mfc(frame, "MFC2")
}
