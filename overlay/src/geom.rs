//! Point and segment math.
//!
//! Polygons are stored normalized to `[0, 1]` against the rendered page, but
//! every threshold the editor applies is a pixel distance. The helpers here
//! take the page's pixel `width` / `height` wherever the answer depends on
//! the aspect ratio.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

use crate::consts::{PIXEL_COORD_MAX, PIXEL_COORD_MIN};

/// A point in normalized page space, or in pixels when a caller says so.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates clamped to `[0, 1]`.
    #[must_use]
    pub fn clamp_unit(self) -> Self {
        Self { x: self.x.clamp(0.0, 1.0), y: self.y.clamp(0.0, 1.0) }
    }
}

/// Normalized point to pixel space.
#[must_use]
pub fn to_px(p: Point, width: f64, height: f64) -> Point {
    Point::new(p.x * width, p.y * height)
}

/// Pixel point to normalized space. Zero-sized dimensions map to the origin.
#[must_use]
pub fn to_normalized(px: Point, width: f64, height: f64) -> Point {
    let x = if width > 0.0 { px.x / width } else { 0.0 };
    let y = if height > 0.0 { px.y / height } else { 0.0 };
    Point::new(x, y)
}

/// Euclidean distance in whatever space both points share.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Pixel distance between two normalized points.
#[must_use]
pub fn distance_px(a: Point, b: Point, width: f64, height: f64) -> f64 {
    distance(to_px(a, width, height), to_px(b, width, height))
}

#[must_use]
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

/// Arithmetic mean of the vertices. `None` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Orthogonal projection of `p` onto segment `a`–`b`.
///
/// Returns the projected point and its clamped parameter `t` in `[0, 1]`
/// (0 at `a`, 1 at `b`). A zero-length segment projects onto `a`.
#[must_use]
pub fn project_onto_segment(p: Point, a: Point, b: Point) -> (Point, f64) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return (a, 0.0);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    (Point::new(a.x + t * dx, a.y + t * dy), t)
}

/// Shortest distance from `p` to segment `a`–`b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (proj, _) = project_onto_segment(p, a, b);
    distance(p, proj)
}

/// Round a normalized point to the nearest grid intersection.
///
/// Rounding happens in pixel space so the grid stays square on non-square
/// pages; the result is renormalized and clamped to the page.
#[must_use]
pub fn snap_to_grid(p: Point, grid_px: f64, width: f64, height: f64) -> Point {
    if grid_px <= 0.0 || width <= 0.0 || height <= 0.0 {
        return p;
    }
    let px = to_px(p, width, height);
    let snapped = Point::new(round_to(px.x, grid_px), round_to(px.y, grid_px));
    to_normalized(snapped, width, height).clamp_unit()
}

/// Round a scalar to the nearest multiple of `step`.
#[must_use]
pub fn round_to(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}

/// Heuristic: a polygon with any coordinate outside `[-0.001, 1.001]` was
/// stored in pixel units rather than normalized ones.
#[must_use]
pub fn looks_like_pixels(points: &[Point]) -> bool {
    points.iter().any(|p| {
        p.x > PIXEL_COORD_MAX || p.y > PIXEL_COORD_MAX || p.x < PIXEL_COORD_MIN || p.y < PIXEL_COORD_MIN
    })
}

/// Convert a pixel-unit polygon to normalized coordinates, clamped to the page.
#[must_use]
pub fn normalize_polygon(points: &[Point], width: f64, height: f64) -> Vec<Point> {
    points
        .iter()
        .map(|&p| to_normalized(p, width, height).clamp_unit())
        .collect()
}

/// Even-odd ray-casting containment test.
#[must_use]
pub fn point_in_polygon(p: Point, poly: &[Point]) -> bool {
    if poly.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let vi = poly[i];
        let vj = poly[j];
        if (vi.y > p.y) != (vj.y > p.y) && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Unsigned shoelace area.
#[must_use]
pub fn polygon_area(poly: &[Point]) -> f64 {
    if poly.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, a) in poly.iter().enumerate() {
        let b = poly[(i + 1) % poly.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum.abs() * 0.5
}

/// Closed-loop edges as `(start_index, start, end)`, including last → first.
pub fn closed_edges(poly: &[Point]) -> impl Iterator<Item = (usize, Point, Point)> + '_ {
    let n = poly.len();
    (0..n).map(move |i| (i, poly[i], poly[(i + 1) % n]))
}
