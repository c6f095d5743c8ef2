//! Placement of the rig schematic.
//!
//! Coordinates are drawing-surface pixels. Shapes downstream of the MFCs are
//! aligned on the anchors of the shapes already drawn.

use crate::dashboard::DeviceRegistry;
use crate::diagram::{DiagramShape, FLOW_LINE_WIDTH, GasCylinderShape, LINE_COLOR, TITLE_FONT_SIZE};
use crate::error::{AppError, AppResult};
use crate::surface::{DrawingSurface, Geometry, Justification, Point, ShapeId, Size, Style};

const ARROW_LENGTH: f64 = 100.0;
const HUMIDIFIER_HEIGHT: f64 = 35.0;
const SENSOR_SIZE: f64 = 50.0;

/// Passive parts of the schematic, owned by the dashboard rather than a device.
pub struct RigDiagram {
    pub gas_cylinder: GasCylinderShape,
    pub flow_lines: Vec<ShapeId>,
    pub output_arrow: ShapeId,
    pub arrowhead: ShapeId,
    pub output_label: ShapeId,
}

fn shape<'a>(devices: &'a DeviceRegistry, key: &str) -> AppResult<&'a dyn DiagramShape> {
    devices
        .get(key)
        .and_then(|d| d.diagram())
        .ok_or_else(|| AppError::Internal(format!("device '{key}' has no diagram")))
}

fn draw_device(
    devices: &mut DeviceRegistry,
    surface: &mut dyn DrawingSurface,
    key: &str,
    position: Point,
    bounds: Size,
) -> AppResult<()> {
    let device = devices
        .get_mut(key)
        .ok_or_else(|| AppError::Internal(format!("device '{key}' is not registered")))?;
    device.draw_diagram(surface, position, bounds);
    Ok(())
}

/// Draw the whole rig: gas cylinder feeding both MFCs, MFC2 through the
/// humidifier into SHT2, MFC1 and SHT2 merging into SHT1, and the outlet arrow.
///
/// # Errors
///
/// Returns `AppError::Internal` if a device of the rig is missing from
/// `devices`, or `AppError::Surface` if the surface rejects the arrowhead rotation.
pub fn draw_flow_diagram(
    devices: &mut DeviceRegistry,
    surface: &mut dyn DrawingSurface,
) -> AppResult<RigDiagram> {
    let gas_cylinder = GasCylinderShape::draw(surface, [50.0, 120.0], [80.0, 300.0]);

    draw_device(devices, surface, "MFC1", Point::new(250.0, 10.0), Size::new(190.0, 190.0))?;
    draw_device(devices, surface, "MFC2", Point::new(250.0, 225.0), Size::new(190.0, 190.0))?;

    let mfc1_outlet = shape(devices, "MFC1")?.outlet();
    let mfc2_outlet = shape(devices, "MFC2")?.outlet();

    draw_device(
        devices,
        surface,
        "SPT",
        Point::new(mfc2_outlet.x + 30.0, mfc2_outlet.y - HUMIDIFIER_HEIGHT / 2.0),
        Size::new(100.0, HUMIDIFIER_HEIGHT),
    )?;
    draw_device(
        devices,
        surface,
        "SHT1",
        Point::new(750.0, mfc1_outlet.y - SENSOR_SIZE / 2.0),
        Size::new(SENSOR_SIZE, 2.0 * SENSOR_SIZE),
    )?;
    let humidifier_outlet = shape(devices, "SPT")?.outlet();
    draw_device(
        devices,
        surface,
        "SHT2",
        Point::new(humidifier_outlet.x + 40.0, humidifier_outlet.y - SENSOR_SIZE / 2.0),
        Size::new(SENSOR_SIZE, 2.0 * SENSOR_SIZE),
    )?;

    let mfc1 = shape(devices, "MFC1")?;
    let mfc2 = shape(devices, "MFC2")?;
    let humidifier = shape(devices, "SPT")?;
    let sensor1 = shape(devices, "SHT1")?;
    let sensor2 = shape(devices, "SHT2")?;

    let supply = gas_cylinder.outlet();
    let riser = Point::new(supply.x, supply.y - 50.0);
    let mut flow_lines = Vec::with_capacity(6);
    for mfc in [mfc1, mfc2] {
        let elbow_x = (supply.x + mfc.inlet().x) / 2.0;
        flow_lines.push(gas_cylinder.route_line_to(
            surface,
            mfc,
            &[
                riser,
                Point::new(elbow_x, riser.y),
                Point::new(elbow_x, mfc.inlet().y),
            ],
        ));
    }
    flow_lines.push(mfc2.route_line_to(surface, humidifier, &[]));
    flow_lines.push(humidifier.route_line_to(surface, sensor2, &[]));
    flow_lines.push(mfc1.route_line_to(surface, sensor1, &[]));

    let merge_x = (sensor2.outlet().x + sensor1.inlet().x) / 2.0;
    flow_lines.push(sensor2.route_line_to(
        surface,
        sensor1,
        &[
            Point::new(merge_x, sensor2.outlet().y),
            Point::new(merge_x, sensor1.inlet().y),
        ],
    ));

    let start = sensor1.outlet();
    let tip = start.offset(ARROW_LENGTH, 0.0);
    let output_arrow = surface.create_shape(
        Geometry::Polyline {
            points: vec![start, tip],
        },
        Style::stroked(LINE_COLOR, FLOW_LINE_WIDTH),
    );
    let arrowhead = surface.create_shape(
        Geometry::RegularPolygon {
            center: tip,
            sides: 3,
            radius: 10.0,
        },
        Style::filled(LINE_COLOR),
    );
    surface.rotate(arrowhead, 90.0, tip)?;

    // The stroke widens the arrow bounds by half its width on every side.
    let half_stroke = FLOW_LINE_WIDTH / 2.0;
    let output_label = surface.create_shape(
        Geometry::Text {
            anchor: Point::new(tip.x + half_stroke - 15.0, tip.y - half_stroke - 10.0),
            content: "Flow Out".to_string(),
            justification: Justification::Left,
            font_size: TITLE_FONT_SIZE,
            bold: false,
        },
        Style::filled(LINE_COLOR),
    );

    Ok(RigDiagram {
        gas_cylinder,
        flow_lines,
        output_arrow,
        arrowhead,
        output_label,
    })
}
