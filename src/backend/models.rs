use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One record from `GET {access_point}/fetch_data`.
///
/// The backend emits `datetime` either as RFC 3339 or as a naive
/// `YYYY-MM-DD HH:MM:SS.ffffff` string; both are accepted and naive values
/// are read as UTC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSample {
    #[serde(deserialize_with = "deserialize_datetime")]
    pub datetime: DateTime<Utc>,
    #[serde(default)]
    pub timestamp: f64,
    /// Quantity name to reading. Anything that is not a JSON number is kept
    /// as NaN so one odd channel does not reject the whole batch.
    #[serde(default, deserialize_with = "deserialize_readings")]
    pub values: BTreeMap<String, f64>,
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a backend datetime string.
#[must_use]
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised datetime '{raw}'")))
}

fn deserialize_readings<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| (key, value.as_f64().unwrap_or(f64::NAN)))
        .collect())
}

/// Connection parameter sent to `POST {access_point}/connect`.
///
/// MFCs take a single serial port, sensors take `[port, address]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortSetting {
    Addressed(String, u8),
    Number(i64),
    Path(String),
}

impl fmt::Display for PortSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Addressed(port, address) => write!(f, "{port} @ 0x{address:02X}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Path(p) => f.write_str(p),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectRequest<'a> {
    pub port: &'a PortSetting,
}

/// Reply of both `GET` and `POST {access_point}/connect`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConnectionReply {
    pub success: bool,
    #[serde(default, deserialize_with = "deserialize_port")]
    #[schema(value_type = Option<Object>)]
    pub port: Option<PortSetting>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The backend reports an unset port as `""`, `[]` or `null`.
fn deserialize_port<'de, D>(deserializer: D) -> Result<Option<PortSetting>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) if s.is_empty() => None,
        Some(serde_json::Value::Array(a)) if a.is_empty() => None,
        Some(value) => serde_json::from_value(value).ok(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ControlMode {
    #[serde(rename = "MAN")]
    Manual,
    #[serde(rename = "SPT")]
    Setpoint,
    #[serde(rename = "ARB")]
    Arbitrary,
}

/// Body of `POST /set_control`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ControlRequest {
    #[serde(rename = "controlMode")]
    pub control_mode: ControlMode,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub params: BTreeMap<String, serde_json::Value>,
}

/// Reply of `GET /get_current_control` and `POST /set_control`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ControlState {
    pub control_mode: ControlMode,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub control_params: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordingRequest {
    pub directory: String,
}
