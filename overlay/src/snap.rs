//! Snapping and vertex insertion.
//!
//! All thresholds are pixel distances, so every function takes a
//! [`SnapContext`] carrying the rendered page size alongside the
//! host-controlled toggles.
//!
//! Draw-time snapping runs as a pipeline over the raw pointer position:
//!
//! 1. Shift + at least one drafted vertex: constrain to horizontal or
//!    vertical from the last vertex, along the larger pixel delta.
//! 2. Grid enabled: round to the nearest grid intersection.
//! 3. Snap-to-first enabled + at least three drafted vertices + pointer within
//!    [`SNAP_TO_FIRST_PX`]: return the first vertex exactly (closes the loop).
//! 4. At least two drafted vertices + pointer within [`MIDPOINT_SNAP_PX`] of a
//!    draft edge midpoint: return the closest midpoint.
//! 5. Otherwise the point from steps 1–2.
//!
//! Steps 3 and 4 measure from the raw pointer, not the adjusted point.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::consts::{INSERT_MAX_DIST_PX, INSERT_T_MAX, INSERT_T_MIN, MIDPOINT_SNAP_PX, MIN_POLYGON_POINTS, SNAP_TO_FIRST_PX};
use crate::geom::{self, Point};
use crate::input::SnapTarget;
use crate::settings::EditorSettings;
use crate::viewport::Viewport;

/// Page size and toggles needed to snap in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapContext {
    pub width: f64,
    pub height: f64,
    /// Grid pitch in pixels, `None` when the grid is off.
    pub grid: Option<f64>,
    pub snap_to_first: bool,
}

impl SnapContext {
    #[must_use]
    pub fn new(viewport: &Viewport, settings: &EditorSettings) -> Self {
        Self {
            width: viewport.width,
            height: viewport.height,
            grid: settings.grid(),
            snap_to_first: settings.snap_to_first,
        }
    }

    fn distance_px(&self, a: Point, b: Point) -> f64 {
        geom::distance_px(a, b, self.width, self.height)
    }

    fn apply_grid(&self, p: Point) -> Point {
        match self.grid {
            Some(g) => geom::snap_to_grid(p, g, self.width, self.height),
            None => p,
        }
    }
}

/// Resolve where a draw-mode click at `raw` places the next vertex.
#[must_use]
pub fn snap_draft_point(raw: Point, draft: &[Point], shift: bool, ctx: &SnapContext) -> (Point, SnapTarget) {
    let mut p = raw;
    if shift {
        if let Some(&last) = draft.last() {
            p = orthogonal(last, p, ctx);
        }
    }
    p = ctx.apply_grid(p);

    if ctx.snap_to_first && draft.len() >= MIN_POLYGON_POINTS {
        let first = draft[0];
        if ctx.distance_px(raw, first) <= SNAP_TO_FIRST_PX {
            return (first, SnapTarget::First);
        }
    }

    if draft.len() >= 2 {
        let closest = draft
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let mid = geom::midpoint(pair[0], pair[1]);
                (i, mid, ctx.distance_px(raw, mid))
            })
            .min_by(|a, b| a.2.total_cmp(&b.2));
        if let Some((i, mid, d)) = closest {
            if d <= MIDPOINT_SNAP_PX {
                return (mid, SnapTarget::Midpoint(i));
            }
        }
    }

    (p, SnapTarget::Free)
}

/// Constrain `p` to a horizontal or vertical line through `anchor`.
#[must_use]
pub fn orthogonal(anchor: Point, p: Point, ctx: &SnapContext) -> Point {
    let dx = (p.x - anchor.x) * ctx.width;
    let dy = (p.y - anchor.y) * ctx.height;
    if dx.abs() >= dy.abs() { Point::new(p.x, anchor.y) } else { Point::new(anchor.x, p.y) }
}

/// Where a dragged vertex lands for pointer position `p`.
#[must_use]
pub fn snap_vertex(p: Point, ctx: &SnapContext) -> Point {
    ctx.apply_grid(p).clamp_unit()
}

/// Translate `origin` by the pointer delta `current - start`.
///
/// The delta is rounded to whole grid steps in pixel space when the grid is
/// on, so the shape moves rigidly. Each coordinate is then clamped to the page.
#[must_use]
pub fn translate_polygon(origin: &[Point], start: Point, current: Point, ctx: &SnapContext) -> Vec<Point> {
    let mut dx_px = (current.x - start.x) * ctx.width;
    let mut dy_px = (current.y - start.y) * ctx.height;
    if let Some(g) = ctx.grid {
        dx_px = geom::round_to(dx_px, g);
        dy_px = geom::round_to(dy_px, g);
    }
    let delta = geom::to_normalized(Point::new(dx_px, dy_px), ctx.width, ctx.height);
    origin
        .iter()
        .map(|p| Point::new(p.x + delta.x, p.y + delta.y).clamp_unit())
        .collect()
}

/// A vertex to insert on an existing polygon edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insertion {
    /// Position of the new vertex in the resulting polygon
    /// (one past the chosen edge's start index).
    pub index: usize,
    /// The projected point, normalized.
    pub point: Point,
    /// Pixel distance from the candidate to the edge.
    pub distance_px: f64,
}

/// Find where a modifier-click at `candidate` would insert a vertex.
///
/// Every edge, including the closing one, is considered. Projections landing
/// inside an edge's interior (`t` strictly within `0.06..0.94`) are preferred;
/// if no interior projection is close enough the best overall projection is
/// used.
/// Returns `None` when nothing lies within [`INSERT_MAX_DIST_PX`].
#[must_use]
pub fn nearest_edge_insertion(poly: &[Point], candidate: Point, ctx: &SnapContext) -> Option<Insertion> {
    if poly.len() < MIN_POLYGON_POINTS {
        return None;
    }
    let c = geom::to_px(candidate, ctx.width, ctx.height);
    let mut best_interior: Option<Insertion> = None;
    let mut best_any: Option<Insertion> = None;

    for (i, a, b) in geom::closed_edges(poly) {
        let a = geom::to_px(a, ctx.width, ctx.height);
        let b = geom::to_px(b, ctx.width, ctx.height);
        let (proj, t) = geom::project_onto_segment(c, a, b);
        let d = geom::distance(c, proj);
        let found = Insertion {
            index: i + 1,
            point: geom::to_normalized(proj, ctx.width, ctx.height).clamp_unit(),
            distance_px: d,
        };
        if t > INSERT_T_MIN && t < INSERT_T_MAX && best_interior.is_none_or(|best| d < best.distance_px) {
            best_interior = Some(found);
        }
        if best_any.is_none_or(|best| d < best.distance_px) {
            best_any = Some(found);
        }
    }

    best_interior
        .filter(|ins| ins.distance_px <= INSERT_MAX_DIST_PX)
        .or_else(|| best_any.filter(|ins| ins.distance_px <= INSERT_MAX_DIST_PX))
}

/// `poly` with `insertion` applied.
#[must_use]
pub fn insert_vertex(poly: &[Point], insertion: &Insertion) -> Vec<Point> {
    let mut out = poly.to_vec();
    out.insert(insertion.index.min(out.len()), insertion.point);
    out
}
