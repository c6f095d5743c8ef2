//! Unit tests for the schematic layout.
//!
//! Run with: cargo test --test diagram_test

use rig_dashboard::config::Config;
use rig_dashboard::dashboard::Dashboard;
use rig_dashboard::diagram::{
    DiagramShape, GasCylinderLayout, GasCylinderShape, HumidifierLayout, MfcLayout, MfcShape,
    SensorLayout,
};
use rig_dashboard::surface::{Geometry, Point, SceneGraph};

fn assert_near(actual: Point, expected: (f64, f64)) {
    assert!(
        (actual.x - expected.0).abs() < 1e-9 && (actual.y - expected.1).abs() < 1e-9,
        "expected {expected:?}, got ({}, {})",
        actual.x,
        actual.y
    );
}

#[test]
fn mfc_layout_is_fractional() {
    let layout = MfcLayout::new([250.0, 10.0], [190.0, 190.0]);

    assert_near(layout.base.origin, (259.5, 171.5));
    assert!((layout.base.size.width - 171.0).abs() < 1e-9);
    assert_near(layout.display.origin, (269.0, 38.5));
    assert!((layout.display.size.height - 133.0).abs() < 1e-9);
    assert_near(layout.title, (269.0, 29.0));
    assert_near(layout.inlet, (259.5, 185.75));
    assert_near(layout.outlet, (430.5, 185.75));

    // Labels share a left edge inside the display, stacked top to bottom
    assert!((layout.pressure_label.x - layout.flow_label.x).abs() < 1e-9);
    assert!(layout.pressure_label.y < layout.flow_label.y);
    assert!(layout.flow_label.y < layout.temperature_label.y);

    // Doubling the bounds doubles every offset
    let big = MfcLayout::new([0.0, 0.0], [380.0, 380.0]);
    let small = MfcLayout::new([0.0, 0.0], [190.0, 190.0]);
    assert!((big.outlet.x - 2.0 * small.outlet.x).abs() < 1e-9);
    assert!((big.outlet.y - 2.0 * small.outlet.y).abs() < 1e-9);
}

#[test]
fn sensor_layout_is_fractional() {
    let layout = SensorLayout::new([0.0, 0.0], [50.0, 100.0]);

    assert_near(layout.display_center, (25.0, 25.0));
    assert!((layout.display_radius - 25.0).abs() < 1e-9);
    assert_near(layout.title, (25.0, -5.0));
    assert_near(layout.address_label, (25.0, 30.0));
    assert_near(layout.humidity_label, (25.0, 70.0));
    assert_near(layout.temperature_label, (25.0, 90.0));
    assert_near(layout.inlet, (0.0, 25.0));
    assert_near(layout.outlet, (50.0, 25.0));
}

#[test]
fn passive_layouts() {
    let cylinder = GasCylinderLayout::new([50.0, 120.0], [80.0, 300.0]);
    assert_near(cylinder.valve_center, (90.0, 120.0));
    assert!((cylinder.valve_radius - 20.0).abs() < 1e-9);
    assert_near(cylinder.caption, (90.0, 440.0));

    let humidifier = HumidifierLayout::new([0.0, 0.0], [100.0, 35.0]);
    assert_near(humidifier.caption, (50.0, -7.0));
    assert_near(humidifier.inlet, (0.0, 17.5));
    assert_near(humidifier.outlet, (100.0, 17.5));
}

#[test]
fn gas_cylinder_uses_valve_for_both_anchors() {
    let mut scene = SceneGraph::new();
    let cylinder = GasCylinderShape::draw(&mut scene, [50.0, 120.0], [80.0, 300.0]);

    assert_eq!(cylinder.inlet(), cylinder.outlet());
    assert_near(cylinder.outlet(), (90.0, 120.0));
}

#[test]
fn route_line_goes_through_waypoints() {
    let mut scene = SceneGraph::new();
    let first = MfcShape::draw(&mut scene, [0.0, 0.0], [100.0, 100.0], "A");
    let second = MfcShape::draw(&mut scene, [300.0, 200.0], [100.0, 100.0], "B");

    let waypoint = Point::new(200.0, first.outlet().y);
    let line = first.route_line_to(&mut scene, &second, &[waypoint]);

    match &scene.node(line).unwrap().geometry {
        Geometry::Polyline { points } => {
            assert_eq!(points, &vec![first.outlet(), waypoint, second.inlet()]);
        }
        other => panic!("expected a polyline, got {other:?}"),
    }
    assert_eq!(
        scene.node(line).unwrap().style.stroke.as_deref(),
        Some("black")
    );
}

#[test]
fn bounding_box_is_hidden_until_shown() {
    let mut scene = SceneGraph::new();
    let mfc = MfcShape::draw(&mut scene, [0.0, 0.0], [100.0, 100.0], "A");
    let bounding_box = mfc.frame().bounding_box;

    assert!(!scene.node(bounding_box).unwrap().style.visible);
    mfc.show_bounding_box(&mut scene).unwrap();
    assert!(scene.node(bounding_box).unwrap().style.visible);

    let [inlet, outlet] = mfc.make_inlet_outlet_markers(&mut scene);
    assert_eq!(scene.fill_of(inlet), Some("blue"));
    assert_eq!(scene.fill_of(outlet), Some("red"));
}

#[test]
fn rig_shapes_are_aligned_on_upstream_anchors() {
    let dashboard = Dashboard::new(&Config::with_backend("http://rig.local")).unwrap();
    let devices = dashboard.devices();
    let shape = |key: &str| devices.get(key).unwrap().diagram().unwrap();

    assert_near(shape("MFC1").outlet(), (430.5, 185.75));
    assert_near(shape("MFC2").outlet(), (430.5, 400.75));

    // Humidifier inlet sits on MFC2's outlet line, 30 px to the right
    assert_near(shape("SPT").inlet(), (460.5, 400.75));
    assert_near(shape("SPT").outlet(), (560.5, 400.75));

    assert_near(shape("SHT1").inlet(), (750.0, 185.75));
    assert_near(shape("SHT2").inlet(), (600.5, 400.75));

    // Generic sources are not drawn
    assert!(devices.get("test1").unwrap().diagram().is_none());
}

#[test]
fn rig_flow_lines_and_outlet_arrow() {
    let dashboard = Dashboard::new(&Config::with_backend("http://rig.local")).unwrap();
    let scene = dashboard.scene();
    let rig = dashboard.rig().unwrap();

    assert_eq!(rig.flow_lines.len(), 6);

    // Gas cylinder to MFC1 rises 50 px, then runs orthogonally
    match &scene.node(rig.flow_lines[0]).unwrap().geometry {
        Geometry::Polyline { points } => {
            assert_eq!(points.len(), 5);
            assert_near(points[0], (90.0, 120.0));
            assert_near(points[1], (90.0, 70.0));
            assert_near(points[2], (174.75, 70.0));
            assert_near(points[3], (174.75, 185.75));
            assert_near(points[4], (259.5, 185.75));
        }
        other => panic!("expected a polyline, got {other:?}"),
    }

    match &scene.node(rig.output_arrow).unwrap().geometry {
        Geometry::Polyline { points } => {
            assert_near(points[0], (800.0, 185.75));
            assert_near(points[1], (900.0, 185.75));
        }
        other => panic!("expected a polyline, got {other:?}"),
    }

    let arrowhead = scene.node(rig.arrowhead).unwrap();
    assert_eq!(arrowhead.rotation.as_ref().map(|r| r.degrees), Some(90.0));

    assert_eq!(scene.text_of(rig.output_label), Some("Flow Out"));
}

#[test]
fn rig_devices_start_disconnected() {
    let dashboard = Dashboard::new(&Config::with_backend("http://rig.local")).unwrap();
    let devices = dashboard.devices();

    for key in ["MFC1", "MFC2", "SHT1", "SHT2"] {
        assert_eq!(devices.get(key).unwrap().diagram().unwrap().color(), Some("red"));
    }
}
