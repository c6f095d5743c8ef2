//! Unit tests for the scrolling charts.
//!
//! Run with: cargo test --test plot_test

mod common;

use chrono::Duration;

use common::at;
use rig_dashboard::plot::{ScrollingPlot, SeriesInput, SeriesMapping, WindowPolicy};
use rig_dashboard::surface::{ChartBoard, ChartSurface, Marker};

const SURFACE: &str = "flowPlot_main";

fn series(start: i64, values: &[f64]) -> SeriesInput {
    SeriesInput::new(
        (0..values.len() as i64).map(|i| at(start + i)).collect(),
        values.to_vec(),
    )
}

fn mapping(entries: Vec<(&str, Option<SeriesInput>)>) -> SeriesMapping {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn point_plot(max_points: usize) -> ScrollingPlot {
    ScrollingPlot::new("Humidity", SURFACE, WindowPolicy::PointCount { max_points })
}

#[test]
fn make_traces_upper_cases_names_and_skips_bad_series() {
    let plot = point_plot(10);
    let mut marked = series(0, &[1.0, 2.0]);
    marked.marker = Some(Marker {
        color: Some("red".into()),
        ..Marker::default()
    });
    let misaligned = SeriesInput::new(vec![at(0)], vec![1.0, 2.0]);

    let traces = plot.make_traces(&mapping(vec![
        ("SHT1_humidity", Some(marked)),
        ("MFC1_flowrate", None),
        ("MFC2_flowrate", Some(misaligned)),
    ]));

    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0].name, "SHT1_HUMIDITY");
    assert_eq!(traces[0].mode, "lines+markers");
    assert_eq!(traces[0].y, vec![1.0, 2.0]);
    assert_eq!(
        traces[0].marker.as_ref().and_then(|m| m.color.as_deref()),
        Some("red")
    );
}

#[test]
fn initialize_plot_with_no_traces_keeps_existing_chart() {
    let plot = point_plot(10);
    let mut board = ChartBoard::new();

    plot.initialize_plot(&mut board, &mapping(vec![("a", Some(series(0, &[1.0])))]));
    plot.initialize_plot(&mut board, &mapping(vec![("a", None)]));

    let traces = board.traces(SURFACE).unwrap();
    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0].name, "A");
}

#[test]
fn update_plot_with_empty_input_changes_nothing() {
    let plot = point_plot(10);
    let mut board = ChartBoard::new();
    plot.initialize_plot(&mut board, &mapping(vec![("a", Some(series(0, &[1.0, 2.0])))]));
    let before = board.chart(SURFACE).cloned();

    plot.update_plot(&mut board, &SeriesMapping::new()).unwrap();
    plot.update_plot(&mut board, &mapping(vec![("a", None)])).unwrap();

    assert_eq!(board.chart(SURFACE).cloned(), before);
}

#[test]
fn update_plot_extends_by_name_and_adds_new_traces() {
    let plot = point_plot(100);
    let mut board = ChartBoard::new();
    plot.initialize_plot(&mut board, &mapping(vec![("a", Some(series(0, &[1.0])))]));

    plot.update_plot(
        &mut board,
        &mapping(vec![
            ("b", Some(series(1, &[5.0]))),
            ("a", Some(series(1, &[2.0]))),
        ]),
    )
    .unwrap();

    let traces = board.traces(SURFACE).unwrap();
    assert_eq!(traces.len(), 2);
    assert_eq!(traces[0].name, "A");
    assert_eq!(traces[0].y, vec![1.0, 2.0]);
    assert_eq!(traces[1].name, "B");
    assert_eq!(traces[1].y, vec![5.0]);
}

#[test]
fn update_plot_on_blank_surface_initializes() {
    let plot = point_plot(100);
    let mut board = ChartBoard::new();

    plot.update_plot(&mut board, &mapping(vec![("a", Some(series(0, &[1.0, 2.0])))]))
        .unwrap();

    assert_eq!(board.traces(SURFACE).unwrap()[0].y, vec![1.0, 2.0]);
}

#[test]
fn point_window_keeps_newest_points() {
    let max_points = 5;
    let plot = point_plot(max_points);
    let mut board = ChartBoard::new();
    plot.initialize_plot(
        &mut board,
        &mapping(vec![
            ("a", Some(series(0, &[0.0]))),
            ("b", Some(series(0, &[100.0]))),
        ]),
    );

    for i in 1..12 {
        plot.update_plot(
            &mut board,
            &mapping(vec![
                ("a", Some(series(i, &[i as f64]))),
                ("b", Some(series(i, &[100.0 + i as f64]))),
            ]),
        )
        .unwrap();
    }

    let chart = board.chart(SURFACE).unwrap();
    for trace in &chart.traces {
        assert_eq!(trace.x.len(), max_points);
        assert_eq!(trace.y.len(), max_points);
        assert_eq!(trace.x.first(), Some(&at(7)));
        assert_eq!(trace.x.last(), Some(&at(11)));
    }
    assert_eq!(chart.traces[0].y, vec![7.0, 8.0, 9.0, 10.0, 11.0]);

    assert_eq!(chart.ranges.x, Some((at(7), at(11))));
    // Combined span 7..111, buffered by 10%
    let (lo, hi) = chart.ranges.y.unwrap();
    assert!((lo - (7.0 - 10.4)).abs() < 1e-9);
    assert!((hi - (111.0 + 10.4)).abs() < 1e-9);
}

#[test]
fn point_window_trims_unequal_traces_independently() {
    let plot = point_plot(3);
    let mut board = ChartBoard::new();
    plot.initialize_plot(
        &mut board,
        &mapping(vec![
            ("long", Some(series(0, &[1.0, 2.0, 3.0]))),
            ("short", Some(series(2, &[9.0]))),
        ]),
    );

    plot.update_plot(&mut board, &mapping(vec![("long", Some(series(3, &[4.0, 5.0])))]))
        .unwrap();

    let traces = board.traces(SURFACE).unwrap();
    assert_eq!(traces[0].y, vec![3.0, 4.0, 5.0]);
    assert_eq!(traces[1].y, vec![9.0]);
}

#[test]
fn point_window_single_point_has_zero_buffer() {
    let plot = point_plot(1);
    let mut board = ChartBoard::new();
    plot.initialize_plot(&mut board, &mapping(vec![("a", Some(series(0, &[3.0])))]));

    plot.update_plot(&mut board, &mapping(vec![("a", Some(series(1, &[4.0])))]))
        .unwrap();

    let chart = board.chart(SURFACE).unwrap();
    assert_eq!(chart.traces[0].y, vec![4.0]);
    assert_eq!(chart.ranges.y, Some((4.0, 4.0)));
}

#[test]
fn point_window_ignores_nan_when_scaling() {
    let plot = point_plot(2);
    let mut board = ChartBoard::new();
    plot.initialize_plot(&mut board, &mapping(vec![("a", Some(series(0, &[1.0])))]));

    plot.update_plot(&mut board, &mapping(vec![("a", Some(series(1, &[f64::NAN, 11.0])))]))
        .unwrap();

    let (lo, hi) = board.chart(SURFACE).unwrap().ranges.y.unwrap();
    assert_eq!((lo, hi), (11.0, 11.0));
}

#[test]
fn time_window_drops_points_older_than_each_trace_latest() {
    let plot = ScrollingPlot::new(
        "Humidity",
        SURFACE,
        WindowPolicy::TimeWindow {
            max_time_window_ms: 10_000,
            y_range: Some((0.0, 100.0)),
        },
    );
    let mut board = ChartBoard::new();
    plot.initialize_plot(
        &mut board,
        &mapping(vec![
            ("fast", Some(series(0, &[0.0, 1.0, 2.0, 3.0, 4.0]))),
            ("slow", Some(series(0, &[50.0]))),
        ]),
    );

    plot.update_plot(
        &mut board,
        &mapping(vec![
            ("fast", Some(series(13, &[13.0, 14.0]))),
            ("slow", Some(series(5, &[55.0]))),
        ]),
    )
    .unwrap();

    let chart = board.chart(SURFACE).unwrap();
    // Latest of "fast" is t=14, so t < 4 is gone and t = 4 stays
    assert_eq!(chart.traces[0].x, vec![at(4), at(13), at(14)]);
    // "slow" is trimmed against its own latest point (t=5), not the global one
    assert_eq!(chart.traces[1].x, vec![at(0), at(5)]);

    assert_eq!(
        chart.ranges.x,
        Some((at(14) - Duration::milliseconds(10_000), at(14)))
    );
    assert_eq!(chart.ranges.y, Some((0.0, 100.0)));
}

#[test]
fn time_window_without_y_range_leaves_autoscale() {
    let plot = ScrollingPlot::new(
        "Humidity",
        SURFACE,
        WindowPolicy::TimeWindow {
            max_time_window_ms: 1_000,
            y_range: None,
        },
    );
    let mut board = ChartBoard::new();
    plot.initialize_plot(&mut board, &mapping(vec![("a", Some(series(0, &[1.0])))]));

    plot.update_plot(&mut board, &mapping(vec![("a", Some(series(5, &[2.0])))]))
        .unwrap();

    let chart = board.chart(SURFACE).unwrap();
    assert_eq!(chart.traces[0].y, vec![2.0]);
    assert_eq!(chart.ranges.y, None);
}
