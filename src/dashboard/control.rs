use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::backend::models::{ControlMode, ControlState};
use crate::diagram::PLACEHOLDER;

/// Banner describing the control mode the backend reports.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ControlAlert {
    pub control_mode: ControlMode,
    pub text: String,
    pub class: String,
    #[schema(value_type = Object)]
    pub params: std::collections::BTreeMap<String, Value>,
}

fn param(state: &ControlState, key: &str) -> String {
    match state.control_params.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => PLACEHOLDER.to_string(),
        Some(other) => other.to_string(),
    }
}

impl ControlAlert {
    #[must_use]
    pub fn from_state(state: &ControlState) -> Self {
        let text = match state.control_mode {
            ControlMode::Manual => format!(
                "Manual Control: MFC1 = {} sccm, MFC2 = {} sccm",
                param(state, "MFC1"),
                param(state, "MFC2")
            ),
            ControlMode::Setpoint => format!(
                "Setpoint Control: Flow rate = {} sccm, Humidity = {} RH%",
                param(state, "flowRate"),
                param(state, "humidity")
            ),
            ControlMode::Arbitrary => "Arbitrary Control mode set. The profile is executed \
                                       when the data recording is started."
                .to_string(),
        };

        Self {
            control_mode: state.control_mode,
            text,
            class: "alert-success".to_string(),
            params: state.control_params.clone(),
        }
    }
}

/// Recording banner and button states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RecordingStatus {
    pub is_recording: bool,
    pub directory: Option<String>,
    pub text: String,
    pub class: String,
    pub can_start: bool,
    pub can_abort: bool,
}

impl Default for RecordingStatus {
    fn default() -> Self {
        Self::stopped()
    }
}

impl RecordingStatus {
    #[must_use]
    pub fn recording(directory: &str) -> Self {
        Self {
            is_recording: true,
            directory: Some(directory.to_string()),
            text: "Data Recording".to_string(),
            class: "alert-success".to_string(),
            can_start: false,
            can_abort: true,
        }
    }

    #[must_use]
    pub fn stopped() -> Self {
        Self {
            is_recording: false,
            directory: None,
            text: "Data Not Recording".to_string(),
            class: "alert-secondary".to_string(),
            can_start: true,
            can_abort: false,
        }
    }
}
