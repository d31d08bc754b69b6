#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_serializes_as_pair() {
    let json = serde_json::to_string(&Point::new(1.5, -2.0)).unwrap();
    assert_eq!(json, "[1.5,-2.0]");
}

#[test]
fn point_deserializes_from_pair() {
    let p: Point = serde_json::from_str("[10, 20]").unwrap();
    assert_eq!(p, Point::new(10.0, 20.0));
}

#[test]
fn point_rejects_object_form() {
    assert!(serde_json::from_str::<Point>(r#"{"x":1,"y":2}"#).is_err());
}

// --- Camera defaults ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
    assert_eq!(cam.zoom, 1.0);
}

#[test]
fn identity_camera_maps_points_unchanged() {
    let cam = Camera::default();
    let p = Point::new(123.0, -45.0);
    assert_eq!(cam.screen_to_world(p), p);
    assert_eq!(cam.world_to_screen(p), p);
}

// --- screen_to_world / world_to_screen ---

#[test]
fn screen_to_world_applies_pan_then_zoom() {
    let cam = Camera { pan_x: 100.0, pan_y: 50.0, zoom: 2.0 };
    let w = cam.screen_to_world(Point::new(300.0, 250.0));
    assert!(point_approx_eq(w, Point::new(100.0, 100.0)));
}

#[test]
fn world_to_screen_is_forward_formula() {
    let cam = Camera { pan_x: 100.0, pan_y: 50.0, zoom: 2.0 };
    let s = cam.world_to_screen(Point::new(100.0, 100.0));
    assert!(point_approx_eq(s, Point::new(300.0, 250.0)));
}

#[test]
fn round_trip_world_screen_world() {
    let cams = [
        Camera::default(),
        Camera { pan_x: -37.5, pan_y: 812.25, zoom: 0.1 },
        Camera { pan_x: 9.0, pan_y: -3.0, zoom: 5.0 },
        Camera { pan_x: 0.333, pan_y: 0.777, zoom: 1.37 },
    ];
    let points = [Point::new(0.0, 0.0), Point::new(-500.0, 250.5), Point::new(1e4, -1e4)];
    for cam in cams {
        for p in points {
            let back = cam.screen_to_world(cam.world_to_screen(p));
            assert!((back.x - p.x).abs() < 1e-6 && (back.y - p.y).abs() < 1e-6, "{cam:?} {p:?}");
        }
    }
}

// --- clamp_zoom ---

#[test]
fn clamp_zoom_limits() {
    assert_eq!(clamp_zoom(0.01), MIN_ZOOM);
    assert_eq!(clamp_zoom(50.0), MAX_ZOOM);
    assert_eq!(clamp_zoom(1.3), 1.3);
}

// --- zoom_at ---

#[test]
fn zoom_at_keeps_anchor_fixed() {
    let mut cam = Camera { pan_x: 40.0, pan_y: -20.0, zoom: 1.0 };
    let anchor = Point::new(400.0, 300.0);
    let before = cam.screen_to_world(anchor);
    cam.zoom_at(anchor, 1.1);
    let after = cam.screen_to_world(anchor);
    assert!(point_approx_eq(before, after));
    assert!(approx_eq(cam.zoom, 1.1));
}

#[test]
fn zoom_at_repeated_steps_keep_anchor_fixed() {
    let mut cam = Camera::default();
    let anchor = Point::new(123.0, 77.0);
    let before = cam.screen_to_world(anchor);
    for _ in 0..10 {
        let z = cam.zoom * 0.9;
        cam.zoom_at(anchor, z);
    }
    let after = cam.screen_to_world(anchor);
    assert!((before.x - after.x).abs() < 1e-6);
    assert!((before.y - after.y).abs() < 1e-6);
}

#[test]
fn zoom_at_clamps_and_still_keeps_anchor() {
    let mut cam = Camera { pan_x: 5.0, pan_y: 5.0, zoom: 4.9 };
    let anchor = Point::new(200.0, 100.0);
    let before = cam.screen_to_world(anchor);
    cam.zoom_at(anchor, 100.0);
    assert_eq!(cam.zoom, MAX_ZOOM);
    assert!(point_approx_eq(before, cam.screen_to_world(anchor)));
}

#[test]
fn zoom_at_lower_bound() {
    let mut cam = Camera::default();
    cam.zoom_at(Point::new(0.0, 0.0), 0.0001);
    assert_eq!(cam.zoom, MIN_ZOOM);
}

// --- pan ---

#[test]
fn pan_to_sets_offset() {
    let mut cam = Camera::default();
    cam.pan_to(Point::new(-12.0, 34.0));
    assert_eq!(cam.pan(), Point::new(-12.0, 34.0));
    assert_eq!(cam.zoom, 1.0);
}
