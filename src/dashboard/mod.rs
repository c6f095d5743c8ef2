//! Rendered state of the whole dashboard.
//!
//! [`Dashboard`] owns the device registry, the charts, the schematic and the
//! banners. It never performs I/O itself: callers gather backend results with
//! the functions in [`frame`] and hand them to the `apply_*` methods.

mod control;
pub mod frame;
mod layout;
mod registry;

pub use control::{ControlAlert, RecordingStatus};
pub use frame::{ConnectionCheck, FrameData, Projection, gather_connections, gather_frame};
pub use layout::{RigDiagram, draw_flow_diagram};
pub use registry::DeviceRegistry;

use serde::Serialize;
use utoipa::ToSchema;

use crate::backend::models::{ConnectionReply, ControlState, PortSetting};
use crate::config::Config;
use crate::devices::{DeviceEndpoint, DeviceKind, DeviceModal, StatusBadge};
use crate::error::{AppError, AppResult};
use crate::plot::{ScrollingPlot, WindowPolicy};
use crate::surface::{ChartBoard, ChartState, SceneGraph};

/// A chart together with the projection feeding it.
pub struct ChartEntry {
    pub key: String,
    pub plot: ScrollingPlot,
    pub project: Projection,
}

/// Everything the dashboard shows about one device.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DeviceStatus {
    pub key: String,
    pub label: String,
    pub kind: DeviceKind,
    pub is_connected: bool,
    pub port: Option<String>,
    pub badge: StatusBadge,
    pub modal: DeviceModal,
}

pub struct Dashboard {
    devices: DeviceRegistry,
    charts: Vec<ChartEntry>,
    scene: SceneGraph,
    board: ChartBoard,
    rig: Option<RigDiagram>,
    control: Option<ControlAlert>,
    recording: RecordingStatus,
    discard_stale_ticks: bool,
    last_applied_tick: u64,
}

impl Dashboard {
    /// Dashboard for the humidity rig with its schematic already drawn.
    ///
    /// # Errors
    ///
    /// Returns an error if the schematic cannot be drawn.
    pub fn new(config: &Config) -> AppResult<Self> {
        let policy = config.plot_window;
        let charts = vec![
            ChartEntry {
                key: "main_plot".to_string(),
                plot: ScrollingPlot::new("Humidity", "flowPlot_main", policy),
                project: frame::project_main,
            },
            ChartEntry {
                key: "subplot1".to_string(),
                plot: ScrollingPlot::new("MFC 1 Params", "flowPlot_sub1", policy),
                project: frame::project_subplot1,
            },
            ChartEntry {
                key: "subplot2".to_string(),
                plot: ScrollingPlot::new("MFC 2 Params", "flowPlot_sub2", policy),
                project: frame::project_subplot2,
            },
        ];

        let mut dashboard =
            Self::with_parts(DeviceRegistry::rig(), charts, config.discard_stale_ticks);
        let rig = draw_flow_diagram(&mut dashboard.devices, &mut dashboard.scene)?;
        dashboard.rig = Some(rig);
        Ok(dashboard)
    }

    /// Dashboard over arbitrary devices and charts, with an empty schematic.
    #[must_use]
    pub fn with_parts(
        devices: DeviceRegistry,
        charts: Vec<ChartEntry>,
        discard_stale_ticks: bool,
    ) -> Self {
        Self {
            devices,
            charts,
            scene: SceneGraph::new(),
            board: ChartBoard::new(),
            rig: None,
            control: None,
            recording: RecordingStatus::default(),
            discard_stale_ticks,
            last_applied_tick: 0,
        }
    }

    #[must_use]
    pub fn devices(&self) -> &DeviceRegistry {
        &self.devices
    }

    pub fn devices_mut(&mut self) -> &mut DeviceRegistry {
        &mut self.devices
    }

    #[must_use]
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Mutable access to the schematic and registry together.
    pub fn scene_and_devices_mut(&mut self) -> (&mut SceneGraph, &mut DeviceRegistry) {
        (&mut self.scene, &mut self.devices)
    }

    #[must_use]
    pub fn board(&self) -> &ChartBoard {
        &self.board
    }

    #[must_use]
    pub fn rig(&self) -> Option<&RigDiagram> {
        self.rig.as_ref()
    }

    #[must_use]
    pub fn chart_keys(&self) -> Vec<String> {
        self.charts.iter().map(|c| c.key.clone()).collect()
    }

    #[must_use]
    pub fn chart_entry(&self, key: &str) -> Option<&ChartEntry> {
        self.charts.iter().find(|c| c.key == key)
    }

    /// Rendered state of the chart `key`, `None` until it has been populated.
    #[must_use]
    pub fn chart(&self, key: &str) -> Option<&ChartState> {
        self.chart_entry(key)
            .and_then(|c| self.board.chart(c.plot.surface_id()))
    }

    #[must_use]
    pub fn window_policy(&self) -> Option<WindowPolicy> {
        self.charts.first().map(|c| c.plot.policy())
    }

    #[must_use]
    pub fn last_applied_tick(&self) -> u64 {
        self.last_applied_tick
    }

    #[must_use]
    pub fn endpoints(&self) -> Vec<(String, DeviceEndpoint)> {
        self.devices.endpoints()
    }

    /// Endpoints with the connection revision each device has right now.
    #[must_use]
    pub fn connection_targets(&self) -> Vec<(String, DeviceEndpoint, u64)> {
        self.devices
            .iter()
            .map(|(key, d)| (key.to_string(), d.endpoint().clone(), d.connection().revision))
            .collect()
    }

    /// Replace every chart with the content of `frame`.
    pub fn initialize_plots(&mut self, frame: &FrameData) {
        for chart in &self.charts {
            let data = (chart.project)(frame);
            chart.plot.initialize_plot(&mut self.board, &data);
        }
    }

    /// Push one tick into the charts and the schematic.
    ///
    /// Returns `false` without touching anything when a newer tick has
    /// already been applied and stale ticks are discarded.
    pub fn apply_frame(&mut self, frame: &FrameData) -> bool {
        if self.discard_stale_ticks && frame.tick <= self.last_applied_tick {
            tracing::debug!(
                tick = frame.tick,
                last_applied = self.last_applied_tick,
                "Discarding stale tick"
            );
            return false;
        }
        self.last_applied_tick = self.last_applied_tick.max(frame.tick);

        for chart in &self.charts {
            let data = (chart.project)(frame);
            if let Err(e) = chart.plot.update_plot(&mut self.board, &data) {
                tracing::warn!(chart = %chart.key, error = %e, "Failed to update chart");
            }
        }

        for (key, device) in self.devices.iter_mut() {
            let result = if frame.has_failed(key) {
                device.show_offline(&mut self.scene)
            } else {
                device.update_diagram_text(&mut self.scene, &frame.last_values(key))
            };
            if let Err(e) = result {
                tracing::warn!(device = %key, error = %e, "Failed to update diagram");
            }
        }
        true
    }

    /// Store connection status replies. A reply is dropped when a user
    /// connect was applied to the device after the query was issued.
    pub fn apply_connections(&mut self, checks: &[ConnectionCheck]) {
        for check in checks {
            let Some(reply) = &check.reply else {
                continue;
            };
            let Some(device) = self.devices.get_mut(&check.device) else {
                continue;
            };
            if device.connection().revision != check.revision {
                tracing::debug!(
                    device = %check.device,
                    issued = check.revision,
                    current = device.connection().revision,
                    "Dropping connection status superseded by a connect"
                );
                continue;
            }
            if let Err(e) = device.apply_connection(reply, &mut self.scene) {
                tracing::warn!(device = %check.device, error = %e, "Failed to redraw device");
            }
        }
    }

    /// Connection parameter for `key` built from user input.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown device.
    pub fn connect_target(
        &self,
        key: &str,
        port: String,
        address: Option<u8>,
    ) -> AppResult<(DeviceEndpoint, PortSetting)> {
        let device = self
            .devices
            .get(key)
            .ok_or_else(|| AppError::NotFound(format!("Device '{key}' not found")))?;
        Ok((device.endpoint().clone(), device.connection_param(port, address)))
    }

    /// Store the reply of a user connect on `key`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown device.
    pub fn apply_connect_reply(&mut self, key: &str, reply: &ConnectionReply) -> AppResult<bool> {
        let device = self
            .devices
            .get_mut(key)
            .ok_or_else(|| AppError::NotFound(format!("Device '{key}' not found")))?;
        match device.apply_connect_reply(reply, &mut self.scene) {
            Ok(connected) => Ok(connected),
            Err(e) => {
                tracing::warn!(device = %key, error = %e, "Failed to redraw device");
                Ok(device.is_connected())
            }
        }
    }

    #[must_use]
    pub fn device_status(&self, key: &str) -> Option<DeviceStatus> {
        let device = self.devices.get(key)?;
        Some(DeviceStatus {
            key: key.to_string(),
            label: device.label().to_string(),
            kind: device.kind(),
            is_connected: device.is_connected(),
            port: device.port().map(ToString::to_string),
            badge: device.status_badge(),
            modal: device.update_modal(),
        })
    }

    #[must_use]
    pub fn device_statuses(&self) -> Vec<DeviceStatus> {
        self.devices
            .keys()
            .iter()
            .filter_map(|key| self.device_status(key))
            .collect()
    }

    pub fn apply_control(&mut self, state: &ControlState) -> &ControlAlert {
        self.control.insert(ControlAlert::from_state(state))
    }

    #[must_use]
    pub fn control(&self) -> Option<&ControlAlert> {
        self.control.as_ref()
    }

    #[must_use]
    pub fn recording(&self) -> &RecordingStatus {
        &self.recording
    }

    pub fn set_recording(&mut self, status: RecordingStatus) {
        self.recording = status;
    }
}
