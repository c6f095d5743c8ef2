//! Unit tests for the rig backend wire format.
//!
//! Run with: cargo test --test backend_models_test

use chrono::{TimeZone, Timelike, Utc};
use serde_json::json;

use rig_dashboard::backend::models::{
    ConnectionReply, ControlMode, ControlRequest, ControlState, PortSetting, RawSample,
    parse_datetime,
};

#[test]
fn datetimes_in_every_backend_format() {
    let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 15).unwrap();

    assert_eq!(parse_datetime("2024-05-01T12:30:15Z"), Some(expected));
    assert_eq!(parse_datetime("2024-05-01T14:30:15+02:00"), Some(expected));
    assert_eq!(parse_datetime("2024-05-01 12:30:15"), Some(expected));

    let fractional = parse_datetime("2024-05-01 12:30:15.250000").unwrap();
    assert_eq!(fractional.nanosecond(), 250_000_000);

    assert_eq!(parse_datetime("yesterday"), None);
}

#[test]
fn sample_keeps_odd_readings_as_nan() {
    let sample: RawSample = serde_json::from_value(json!({
        "datetime": "2024-05-01 12:00:00.5",
        "timestamp": 1714564800.5,
        "values": {"humidity": 40.5, "sensor_addr": 68, "status": "ok", "missing": null}
    }))
    .unwrap();

    assert_eq!(sample.values["humidity"], 40.5);
    assert_eq!(sample.values["sensor_addr"], 68.0);
    assert!(sample.values["status"].is_nan());
    assert!(sample.values["missing"].is_nan());
}

#[test]
fn sample_with_bad_datetime_is_rejected() {
    let parsed = serde_json::from_value::<RawSample>(json!({
        "datetime": "not a date",
        "values": {}
    }));
    assert!(parsed.is_err());
}

#[test]
fn unset_ports_read_as_none() {
    for port in [json!(""), json!([]), json!(null)] {
        let reply: ConnectionReply =
            serde_json::from_value(json!({"success": false, "port": port})).unwrap();
        assert_eq!(reply.port, None);
    }

    let reply: ConnectionReply = serde_json::from_value(json!({"success": true})).unwrap();
    assert!(reply.success);
    assert_eq!(reply.port, None);
    assert_eq!(reply.message, None);
}

#[test]
fn port_shapes() {
    let reply: ConnectionReply =
        serde_json::from_value(json!({"success": true, "port": ["/dev/ttyUSB0", 68]})).unwrap();
    assert_eq!(
        reply.port,
        Some(PortSetting::Addressed("/dev/ttyUSB0".to_string(), 0x44))
    );

    let reply: ConnectionReply =
        serde_json::from_value(json!({"success": true, "port": "COM3"})).unwrap();
    assert_eq!(reply.port, Some(PortSetting::Path("COM3".to_string())));

    let reply: ConnectionReply =
        serde_json::from_value(json!({"success": true, "port": 4})).unwrap();
    assert_eq!(reply.port, Some(PortSetting::Number(4)));

    assert_eq!(
        serde_json::to_value(PortSetting::Addressed("/dev/ttyUSB0".to_string(), 0x45)).unwrap(),
        json!(["/dev/ttyUSB0", 69])
    );
    assert_eq!(
        PortSetting::Addressed("/dev/ttyUSB0".to_string(), 0x45).to_string(),
        "/dev/ttyUSB0 @ 0x45"
    );
}

#[test]
fn control_modes_use_backend_codes() {
    let request = ControlRequest {
        control_mode: ControlMode::Setpoint,
        params: [("humidity".to_string(), json!(45))].into_iter().collect(),
    };
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({"controlMode": "SPT", "params": {"humidity": 45}})
    );

    let state: ControlState = serde_json::from_value(json!({
        "control_mode": "ARB"
    }))
    .unwrap();
    assert_eq!(state.control_mode, ControlMode::Arbitrary);
    assert!(state.control_params.is_empty());
}
