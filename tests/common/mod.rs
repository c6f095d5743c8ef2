//! In-process stand-in for the rig backend.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

use rig_dashboard::backend::RigBackend;
use rig_dashboard::backend::models::{
    ConnectionReply, ControlMode, ControlRequest, ControlState, PortSetting, RawSample,
};
use rig_dashboard::error::{AppError, AppResult};

#[derive(Default)]
pub struct FakeBackend {
    samples: Mutex<HashMap<String, Vec<RawSample>>>,
    failing: Mutex<Vec<String>>,
    status: Mutex<HashMap<String, ConnectionReply>>,
    connects: Mutex<Vec<(String, PortSetting)>>,
    control: Mutex<Option<ControlState>>,
    recording: Mutex<Option<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_samples(&self, access_point: &str, samples: Vec<RawSample>) {
        self.samples
            .lock()
            .unwrap()
            .insert(access_point.to_string(), samples);
    }

    pub fn fail(&self, access_point: &str) {
        self.failing.lock().unwrap().push(access_point.to_string());
    }

    pub fn set_status(&self, access_point: &str, success: bool, port: Option<PortSetting>) {
        self.status.lock().unwrap().insert(
            access_point.to_string(),
            ConnectionReply {
                success,
                port,
                message: None,
            },
        );
    }

    pub fn set_control_state(&self, state: ControlState) {
        *self.control.lock().unwrap() = Some(state);
    }

    pub fn connects(&self) -> Vec<(String, PortSetting)> {
        self.connects.lock().unwrap().clone()
    }

    pub fn recording_directory(&self) -> Option<String> {
        self.recording.lock().unwrap().clone()
    }

    fn check(&self, access_point: &str) -> AppResult<()> {
        if self.failing.lock().unwrap().iter().any(|a| a == access_point) {
            return Err(AppError::Backend(format!("{access_point}: connection refused")));
        }
        Ok(())
    }
}

#[async_trait]
impl RigBackend for FakeBackend {
    async fn fetch_samples(&self, access_point: &str) -> AppResult<Vec<RawSample>> {
        self.check(access_point)?;
        Ok(self
            .samples
            .lock()
            .unwrap()
            .get(access_point)
            .cloned()
            .unwrap_or_default())
    }

    async fn connect(&self, access_point: &str, port: &PortSetting) -> AppResult<ConnectionReply> {
        self.check(access_point)?;
        self.connects
            .lock()
            .unwrap()
            .push((access_point.to_string(), port.clone()));
        let reply = ConnectionReply {
            success: true,
            port: Some(port.clone()),
            message: Some("connected".to_string()),
        };
        self.status
            .lock()
            .unwrap()
            .insert(access_point.to_string(), reply.clone());
        Ok(reply)
    }

    async fn connection_status(&self, access_point: &str) -> AppResult<ConnectionReply> {
        self.check(access_point)?;
        Ok(self
            .status
            .lock()
            .unwrap()
            .get(access_point)
            .cloned()
            .unwrap_or(ConnectionReply {
                success: false,
                port: None,
                message: None,
            }))
    }

    async fn current_control(&self) -> AppResult<ControlState> {
        self.check("/get_current_control")?;
        Ok(self.control.lock().unwrap().clone().unwrap_or(ControlState {
            control_mode: ControlMode::Manual,
            control_params: [
                ("MFC1".to_string(), json!(0)),
                ("MFC2".to_string(), json!(0)),
            ]
            .into_iter()
            .collect(),
        }))
    }

    async fn set_control(&self, request: &ControlRequest) -> AppResult<ControlState> {
        self.check("/set_control")?;
        let state = ControlState {
            control_mode: request.control_mode,
            control_params: request.params.clone(),
        };
        self.set_control_state(state.clone());
        Ok(state)
    }

    async fn start_recording(&self, directory: &str) -> AppResult<serde_json::Value> {
        self.check("/start_recording_data")?;
        *self.recording.lock().unwrap() = Some(directory.to_string());
        Ok(json!({"success": true}))
    }

    async fn stop_recording(&self) -> AppResult<serde_json::Value> {
        self.check("/stop_recording_data")?;
        *self.recording.lock().unwrap() = None;
        Ok(json!({"success": true}))
    }
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

/// `t0 + seconds`.
pub fn at(seconds: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(seconds)
}

pub fn sample(seconds: i64, values: &[(&str, f64)]) -> RawSample {
    RawSample {
        datetime: at(seconds),
        timestamp: at(seconds).timestamp() as f64,
        values: values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
    }
}
