#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn point_approx_eq(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
}

// --- defaults ---

#[test]
fn default_viewport_is_not_ready() {
    assert!(!Viewport::default().is_ready());
}

#[test]
fn sized_viewport_is_ready() {
    assert!(Viewport::new(800.0, 600.0).is_ready());
}

// --- client_to_normalized ---

#[test]
fn client_to_normalized_at_origin() {
    let vp = Viewport::new(800.0, 600.0);
    let p = vp.client_to_normalized(Point::new(400.0, 150.0));
    assert!(point_approx_eq(p, Point::new(0.5, 0.25)));
}

#[test]
fn client_to_normalized_subtracts_surface_offset() {
    let vp = Viewport { left: 100.0, top: 50.0, width: 200.0, height: 100.0 };
    let p = vp.client_to_normalized(Point::new(200.0, 75.0));
    assert!(point_approx_eq(p, Point::new(0.5, 0.25)));
}

#[test]
fn client_to_normalized_clamps_outside_surface() {
    let vp = Viewport { left: 10.0, top: 10.0, width: 100.0, height: 100.0 };
    assert_eq!(vp.client_to_normalized(Point::new(-50.0, 500.0)), Point::new(0.0, 1.0));
}

#[test]
fn client_to_normalized_unready_returns_origin() {
    let vp = Viewport::default();
    assert_eq!(vp.client_to_normalized(Point::new(30.0, 30.0)), Point::new(0.0, 0.0));
}

// --- pixel conversions ---

#[test]
fn to_px_and_back() {
    let vp = Viewport::new(640.0, 480.0);
    let p = Point::new(0.3, 0.7);
    assert!(point_approx_eq(vp.to_normalized(vp.to_px(p)), p));
}

#[test]
fn distance_px_uses_page_size() {
    let vp = Viewport::new(200.0, 100.0);
    let d = vp.distance_px(Point::new(0.0, 0.0), Point::new(0.5, 0.0));
    assert!((d - 100.0).abs() < EPSILON);
}

// --- contains_client ---

#[test]
fn contains_client_respects_origin_and_size() {
    let vp = Viewport { left: 50.0, top: 20.0, width: 800.0, height: 600.0 };
    assert!(vp.contains_client(Point::new(50.0, 20.0)));
    assert!(vp.contains_client(Point::new(850.0, 620.0)));
    assert!(!vp.contains_client(Point::new(49.0, 100.0)));
    assert!(!vp.contains_client(Point::new(400.0, 621.0)));
}

#[test]
fn unready_viewport_contains_nothing() {
    assert!(!Viewport::default().contains_client(Point::new(0.0, 0.0)));
}
