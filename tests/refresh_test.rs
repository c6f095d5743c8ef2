//! Tests for the refresh pipeline against an in-process backend.
//!
//! Run with: cargo test --test refresh_test

mod common;

use std::sync::Arc;

use common::{FakeBackend, sample};
use rig_dashboard::backend::models::{ConnectionReply, ControlMode, ControlState, PortSetting};
use rig_dashboard::common::AppState;
use rig_dashboard::config::Config;
use rig_dashboard::dashboard::{
    ControlAlert, Dashboard, FrameData, frame, gather_connections, gather_frame,
};
use rig_dashboard::devices::reshape_samples;
use rig_dashboard::sync::worker;
use serde_json::json;

fn rig_backend() -> Arc<FakeBackend> {
    let backend = FakeBackend::new();
    backend.set_samples(
        "/MFC1",
        vec![sample(
            0,
            &[
                ("mass_flow", 10.0),
                ("volumetric_flow", 11.0),
                ("setpoint", 12.0),
                ("pressure", 14.7),
                ("temperature", 25.0),
            ],
        )],
    );
    backend.set_samples(
        "/SHT1",
        vec![
            sample(0, &[("sensor_addr", 68.0), ("humidity", 40.0), ("temperature", 21.0)]),
            sample(1, &[("sensor_addr", 68.0), ("humidity", 41.5), ("temperature", 21.2)]),
        ],
    );
    backend.set_samples("/test1", vec![sample(0, &[("y1", 1.0), ("y2", 2.0)])]);
    Arc::new(backend)
}

fn state_with(backend: Arc<FakeBackend>) -> AppState {
    let config = Config::with_backend("http://rig.local");
    let dashboard = Dashboard::new(&config).unwrap();
    AppState::new(config, backend, dashboard)
}

#[tokio::test]
async fn one_failed_device_does_not_block_the_others() {
    let backend = rig_backend();
    backend.set_status("/MFC1", true, Some(PortSetting::Path("COM3".into())));
    backend.set_status("/SHT1", true, Some(PortSetting::Addressed("/dev/ttyUSB0".into(), 0x44)));
    let state = state_with(backend.clone());

    // Both were connected before MFC1 went away
    worker::refresh_connections(&state).await;
    assert_eq!(
        state.dashboard.read().await.device_status("MFC1").map(|d| d.is_connected),
        Some(true)
    );
    backend.fail("/MFC1");

    assert!(worker::run_tick(&state, 1).await);

    let dashboard = state.dashboard.read().await;
    let main = dashboard.chart("main_plot").unwrap();
    let names: Vec<&str> = main.traces.iter().map(|t| t.name.as_str()).collect();
    assert!(names.contains(&"SHT1_HUMIDITY"));
    assert!(names.contains(&"TEST1_Y1"));
    assert!(!names.contains(&"MFC1_FLOWRATE"));

    let sht1 = main.traces.iter().find(|t| t.name == "SHT1_HUMIDITY").unwrap();
    assert_eq!(sht1.y, vec![40.0, 41.5]);

    let scene = dashboard.scene();
    let sensor = dashboard.devices().get("SHT1").unwrap().diagram().unwrap();
    assert_eq!(sensor.color(), Some("green"));

    // MFC1 shows offline styling
    let mfc = dashboard.devices().get("MFC1").unwrap().diagram().unwrap();
    assert_eq!(mfc.color(), Some("red"));
    assert!(scene.nodes().iter().any(|n| matches!(
        &n.geometry,
        rig_dashboard::surface::Geometry::Text { content, .. } if content == "41.50 %RH"
    )));
}

#[tokio::test]
async fn stale_ticks_are_discarded() {
    let state = state_with(rig_backend());

    assert!(worker::run_tick(&state, 3).await);
    assert!(!worker::run_tick(&state, 2).await);
    assert!(!worker::run_tick(&state, 3).await);
    assert!(worker::run_tick(&state, 4).await);

    assert_eq!(state.dashboard.read().await.last_applied_tick(), 4);
}

#[tokio::test]
async fn stale_ticks_apply_when_discarding_is_off() {
    let mut config = Config::with_backend("http://rig.local");
    config.discard_stale_ticks = false;
    let mut dashboard = Dashboard::new(&config).unwrap();

    let newer = FrameData {
        tick: 5,
        ..FrameData::default()
    };
    let older = FrameData {
        tick: 4,
        ..FrameData::default()
    };
    assert!(dashboard.apply_frame(&newer));
    assert!(dashboard.apply_frame(&older));
    assert_eq!(dashboard.last_applied_tick(), 5);
}

#[tokio::test]
async fn status_reply_issued_before_a_connect_is_dropped() {
    let backend = rig_backend();
    backend.set_status("/MFC2", false, None);
    let state = state_with(backend.clone());

    // Query issued while the revision is still 0
    let targets = state.dashboard.read().await.connection_targets();
    let checks = gather_connections(&targets, backend.as_ref()).await;

    // A user connect lands before the query result is applied
    state
        .dashboard
        .write()
        .await
        .apply_connect_reply(
            "MFC2",
            &ConnectionReply {
                success: true,
                port: Some(PortSetting::Path("COM4".into())),
                message: None,
            },
        )
        .unwrap();

    state.dashboard.write().await.apply_connections(&checks);

    let dashboard = state.dashboard.read().await;
    let mfc2 = dashboard.device_status("MFC2").unwrap();
    assert!(mfc2.is_connected);
    assert_eq!(mfc2.port.as_deref(), Some("COM4"));

    // The next query sees the new revision and applies normally
    drop(dashboard);
    worker::refresh_connections(&state).await;
    let mfc2 = state.dashboard.read().await.device_status("MFC2").unwrap();
    assert!(!mfc2.is_connected);
}

#[tokio::test]
async fn gather_frame_records_failures() {
    let backend = rig_backend();
    backend.fail("/SHT2");
    let state = state_with(backend.clone());
    let endpoints = state.dashboard.read().await.endpoints();

    let frame = gather_frame(&endpoints, backend.as_ref(), 7).await;

    assert_eq!(frame.tick, 7);
    assert_eq!(frame.failed, vec!["SHT2".to_string()]);
    assert!(frame.samples.contains_key("SHT1"));
    assert!(frame.samples["MFC2"].is_empty());
}

#[test]
fn projections_tolerate_missing_devices() {
    let mut frame = FrameData::default();
    frame.samples.insert(
        "MFC1".to_string(),
        reshape_samples(vec![sample(0, &[("volumetric_flow", 3.0), ("mass_flow", 2.0)])]),
    );

    let main = frame::project_main(&frame);
    assert_eq!(main.len(), 8);
    assert_eq!(main[0].0, "MFC1_flowrate");
    assert_eq!(main[0].1.as_ref().unwrap().values, vec![2.0]);
    assert!(main[2].1.is_none());

    let sub1 = frame::project_subplot1(&frame);
    assert_eq!(sub1[0].1.as_ref().unwrap().values, vec![3.0]);
    assert!(sub1[1].1.is_none());

    let sub2 = frame::project_subplot2(&frame);
    assert!(sub2.iter().all(|(_, s)| s.is_none()));
}

#[tokio::test]
async fn initialize_populates_charts_and_control() {
    let backend = rig_backend();
    backend.set_control_state(ControlState {
        control_mode: ControlMode::Setpoint,
        control_params: [
            ("flowRate".to_string(), json!(200)),
            ("humidity".to_string(), json!("45")),
        ]
        .into_iter()
        .collect(),
    });
    let state = state_with(backend);

    worker::initialize(&state).await;

    let dashboard = state.dashboard.read().await;
    assert!(dashboard.chart("main_plot").is_some());
    assert!(dashboard.chart("subplot1").is_some());
    // Nothing from MFC2 yet, so its chart stays unrendered
    assert!(dashboard.chart("subplot2").is_none());
    assert_eq!(
        dashboard.control().map(|c| c.text.as_str()),
        Some("Setpoint Control: Flow rate = 200 sccm, Humidity = 45 RH%")
    );
}

#[test]
fn control_alert_texts() {
    let manual = ControlAlert::from_state(&ControlState {
        control_mode: ControlMode::Manual,
        control_params: [
            ("MFC1".to_string(), json!(100)),
            ("MFC2".to_string(), json!("50.5")),
        ]
        .into_iter()
        .collect(),
    });
    assert_eq!(manual.text, "Manual Control: MFC1 = 100 sccm, MFC2 = 50.5 sccm");

    let arbitrary = ControlAlert::from_state(&ControlState {
        control_mode: ControlMode::Arbitrary,
        control_params: Default::default(),
    });
    assert_eq!(
        arbitrary.text,
        "Arbitrary Control mode set. The profile is executed when the data recording is started."
    );

    let missing = ControlAlert::from_state(&ControlState {
        control_mode: ControlMode::Setpoint,
        control_params: Default::default(),
    });
    assert_eq!(
        missing.text,
        "Setpoint Control: Flow rate = -- sccm, Humidity = -- RH%"
    );
}
